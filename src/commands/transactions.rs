// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::commands::confirm;
use crate::delete_flow::{DeleteCommand, DeleteFlow, DeleteState};
use crate::entries::NewTransaction;
use crate::models::{Category, Transaction, TxType};
use crate::store::Store;
use crate::utils::{format_currency, format_display_date, maybe_print_json, parse_date, pretty_table, today};

pub fn handle(store: &mut dyn Store, m: &clap::ArgMatches) -> Result<bool> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let mut txs = store.list_transactions()?;
            if let Some(limit) = sub.get_one::<usize>("limit") {
                txs.truncate(*limit);
            }
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &txs)? {
                println!("{}", tx_table(&txs));
            }
            Ok(false)
        }
        Some(("add", sub)) => {
            let kind: TxType = sub
                .get_one::<String>("type")
                .map(String::as_str)
                .unwrap_or("")
                .parse()?;
            let raw_amount = sub.get_one::<String>("amount").map(String::as_str).unwrap_or("");
            let date = match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => today(),
            };
            let categories = store.list_categories()?;
            let category_id = sub
                .get_one::<String>("category")
                .map(|needle| resolve_category(&categories, needle, kind));
            let draft = NewTransaction::prepare(
                raw_amount,
                kind,
                category_id.as_deref(),
                date,
                sub.get_one::<String>("note").map(String::as_str),
                &categories,
            )?;
            let tx = store.create_transaction(&draft)?;
            tracing::info!(id = %tx.id, amount = tx.amount, "transaction recorded");
            println!(
                "Recorded {} {} in {} on {} ({})",
                tx.r#type.label(),
                format_currency(tx.amount),
                tx.category.label(),
                format_display_date(tx.date),
                tx.id
            );
            Ok(true)
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").cloned().unwrap_or_default();
            let mut flow = DeleteFlow::new();
            flow.apply(DeleteCommand::RequestDelete(id.clone()));
            if !(sub.get_flag("yes") || confirm(&format!("Delete transaction {}?", id))?) {
                flow.apply(DeleteCommand::CancelDelete);
                println!("Cancelled");
                return Ok(false);
            }
            match flow.confirm_with(|id| store.delete_transaction(id)) {
                DeleteState::Done(Ok(id)) => {
                    println!("Removed transaction {}", id);
                    Ok(true)
                }
                DeleteState::Done(Err(err)) => Err(err.clone().into()),
                _ => Ok(false),
            }
        }
        _ => Ok(false),
    }
}

/// Accepts a category id, or a name of the requested type (case-insensitive).
/// Unknown input is passed through so validation reports it as not found.
pub fn resolve_category(categories: &[Category], needle: &str, kind: TxType) -> String {
    let needle = needle.trim();
    categories
        .iter()
        .find(|c| c.id == needle)
        .or_else(|| {
            categories
                .iter()
                .find(|c| c.r#type == kind && c.name.eq_ignore_ascii_case(needle))
        })
        .map(|c| c.id.clone())
        .unwrap_or_else(|| needle.to_string())
}

fn tx_table(txs: &[Transaction]) -> comfy_table::Table {
    let data = txs
        .iter()
        .map(|tx| {
            vec![
                format_display_date(tx.date),
                tx.r#type.label().to_string(),
                tx.category.label(),
                format_currency(tx.amount),
                tx.note.clone().unwrap_or_default(),
                tx.id.clone(),
            ]
        })
        .collect();
    pretty_table(&["Date", "Type", "Category", "Amount", "Note", "Id"], data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<Category> {
        vec![
            Category {
                id: "c-food".into(),
                name: "Food".into(),
                r#type: TxType::Expense,
                icon: None,
            },
            Category {
                id: "c-bonus".into(),
                name: "Food".into(),
                r#type: TxType::Income,
                icon: None,
            },
        ]
    }

    #[test]
    fn resolves_by_id_then_by_name_of_matching_type() {
        let cats = cats();
        assert_eq!(resolve_category(&cats, "c-bonus", TxType::Expense), "c-bonus");
        assert_eq!(resolve_category(&cats, "food", TxType::Expense), "c-food");
        assert_eq!(resolve_category(&cats, "FOOD", TxType::Income), "c-bonus");
        assert_eq!(resolve_category(&cats, " Rent ", TxType::Expense), "Rent");
    }
}
