// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::export::{BarChartRenderer, ExportKind, SnapshotDocument, TransactionSheet};
use crate::store::Store;
use crate::utils::today;

pub fn handle(cfg: &Config, store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|f| f.to_lowercase())
        .unwrap_or_default();
    let kind: ExportKind = match sub.get_one::<String>("kind") {
        Some(k) => k.parse()?,
        None => ExportKind::default(),
    };
    let dir = sub
        .get_one::<String>("out-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.export_dir());

    let txs = store.list_transactions()?;
    let date = today();

    // Documents are built before the output directory is touched, so a
    // rejected export leaves nothing behind.
    let path = match fmt.as_str() {
        "xlsx" | "csv" => {
            let sheet = TransactionSheet::build(&txs)?;
            ensure_dir(&dir)?;
            if fmt == "xlsx" {
                sheet.write_xlsx(&dir, &cfg.app_name, kind, date)?
            } else {
                sheet.write_csv(&dir, &cfg.app_name, kind, date)?
            }
        }
        "pdf" => {
            let renderer = BarChartRenderer::new(cfg.snapshot_scale);
            let doc = SnapshotDocument::build(&txs, &renderer)?;
            tracing::debug!(pages = doc.page_count(), "snapshot paginated");
            ensure_dir(&dir)?;
            doc.write_pdf(&dir, &cfg.app_name, kind, date)?
        }
        other => bail!("Unsupported export format '{}'", other),
    };
    println!("Exported {} transaction(s) to {}", txs.len(), path.display());
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Create output directory {}", dir.display()))
}
