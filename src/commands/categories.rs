// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};

use crate::commands::confirm;
use crate::delete_flow::{DeleteCommand, DeleteFlow, DeleteState};
use crate::errors::CoreError;
use crate::ledger::CategoryLedger;
use crate::models::TxType;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &mut dyn Store, m: &clap::ArgMatches) -> Result<bool> {
    let mut ledger = CategoryLedger::load(store)?;
    match m.subcommand() {
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("type")
                .map(|t| t.parse::<TxType>())
                .transpose()?;
            let cats: Vec<_> = match kind {
                Some(kind) => ledger.list_by_type(kind),
                None => ledger.categories().iter().collect(),
            };
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                return Ok(false);
            }
            let data = cats
                .iter()
                .map(|c| {
                    vec![
                        c.icon_or_default().to_string(),
                        c.name.clone(),
                        c.r#type.label().to_string(),
                        c.id.clone(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Icon", "Name", "Type", "Id"], data));
            Ok(false)
        }
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").map(String::as_str).unwrap_or("");
            let kind: TxType = sub
                .get_one::<String>("type")
                .map(String::as_str)
                .unwrap_or("")
                .parse()?;
            let icon = sub.get_one::<String>("icon").map(String::as_str);
            let created = ledger.create(name, kind, icon)?;
            println!("Added category '{}' ({})", created.label(), created.id);
            Ok(true)
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").cloned().unwrap_or_default();
            let label = ledger
                .find(&id)
                .map(|c| c.label())
                .unwrap_or_else(|| id.clone());

            let mut flow = DeleteFlow::new();
            flow.apply(DeleteCommand::RequestDelete(id));
            if !(sub.get_flag("yes") || confirm(&format!("Delete category {}?", label))?) {
                flow.apply(DeleteCommand::CancelDelete);
                println!("Cancelled");
                return Ok(false);
            }
            match flow.confirm_with(|id| ledger.delete(id)) {
                DeleteState::Done(Ok(_)) => {
                    println!("Removed category '{}'", label);
                    Ok(true)
                }
                DeleteState::Done(Err(CoreError::Conflict(msg))) => {
                    bail!(
                        "Cannot delete '{}': {}. Move or delete its transactions first.",
                        label,
                        msg
                    )
                }
                DeleteState::Done(Err(err)) => Err(err.clone().into()),
                _ => Ok(false),
            }
        }
        _ => Ok(false),
    }
}
