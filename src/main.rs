// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use sakubumi::api::ApiClient;
use sakubumi::commands::{self, session};
use sakubumi::config::{config_path, Config};
use sakubumi::store::MemoryStore;
use sakubumi::{cli, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::load()?;
    let base_url = session::base_url(&cfg.api_url, &matches);

    match matches.subcommand() {
        Some(("config", _)) => {
            println!("# {}", config_path()?.display());
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        Some(("login", _)) => session::login(&base_url, &matches)?,
        Some(_) => {
            if let Some(path) = matches.get_one::<String>("data").map(PathBuf::from) {
                let mut store = MemoryStore::load(&path)?;
                if commands::dispatch(&cfg, &mut store, &matches)? {
                    store.save(&path)?;
                    tracing::debug!(path = %path.display(), "data file saved");
                }
            } else {
                let auth = session::resolve(&base_url, &matches)?;
                let mut client = ApiClient::new(&base_url, auth)?;
                commands::dispatch(&cfg, &mut client, &matches)?;
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
