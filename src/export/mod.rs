// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod render;
pub mod sheet;
pub mod snapshot;

use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::{CoreError, CoreResult};
use crate::utils::day_key;

pub use render::{BarChartRenderer, RasterImage, ReportSurface, SurfaceRenderer};
pub use sheet::TransactionSheet;
pub use snapshot::{paginate, PageSize, PageSlice, SnapshotDocument};

/// Which screen an export stands for; it only shows up in the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportKind {
    /// Aggregated report (summary, charts, breakdowns).
    #[default]
    Report,
    /// Plain transaction history.
    Transactions,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Report => "Report",
            ExportKind::Transactions => "Transactions",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(ExportKind::Report),
            "transactions" => Ok(ExportKind::Transactions),
            other => Err(CoreError::Validation(format!(
                "Unknown export kind '{}', expected report|transactions",
                other
            ))),
        }
    }
}

/// `<AppName>_<Kind>_<YYYY-MM-DD>.<ext>`
pub fn export_file_name(app_name: &str, kind: ExportKind, date: NaiveDate, ext: &str) -> String {
    format!("{}_{}_{}.{}", app_name, kind, day_key(date), ext)
}

/// Writes through a `.tmp` sibling and renames it into place, so a failed
/// write never leaves a truncated file at `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(CoreError::Export(format!(
            "Write {}: {}",
            path.display(),
            err
        )));
    }
    tracing::info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(())
}
