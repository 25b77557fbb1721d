// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod exporter;
pub mod reports;
pub mod session;
pub mod transactions;

use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::store::Store;

/// Routes a data subcommand to its handler. Returns `true` when the store
/// was modified, so the caller knows to persist a local data file.
pub fn dispatch(cfg: &Config, store: &mut dyn Store, m: &clap::ArgMatches) -> Result<bool> {
    match m.subcommand() {
        Some(("summary", sub)) => reports::summary(store, sub).map(|()| false),
        Some(("chart", sub)) => reports::chart(cfg, store, sub).map(|()| false),
        Some(("breakdown", sub)) => reports::breakdown(store, sub).map(|()| false),
        Some(("recent", sub)) => reports::recent(store, sub).map(|()| false),
        Some(("category", sub)) => categories::handle(store, sub),
        Some(("tx", sub)) => transactions::handle(store, sub),
        Some(("export", sub)) => exporter::handle(cfg, store, sub).map(|()| false),
        _ => Ok(false),
    }
}

/// `[y/N]` prompt on stdin. Anything but "y"/"yes" declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    confirm_from(prompt, &mut stdin.lock())
}

fn confirm_from<R: BufRead>(prompt: &str, input: &mut R) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
