// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{export_file_name, write_atomic, ExportKind};
use crate::errors::{CoreError, CoreResult};
use crate::models::Transaction;
use crate::utils::format_display_date;

pub const SHEET_NAME: &str = "Transaction History";
pub const NOTE_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub header: &'static str,
    /// Width hint in characters.
    pub width: f64,
}

pub const COLUMNS: [Column; 5] = [
    Column { header: "Date", width: 15.0 },
    Column { header: "Type", width: 15.0 },
    Column { header: "Category", width: 20.0 },
    Column { header: "Amount (Rp)", width: 15.0 },
    Column { header: "Note", width: 40.0 },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub date: String,
    pub kind: String,
    pub category: String,
    pub amount: i64,
    pub note: String,
}

impl SheetRow {
    fn from_transaction(tx: &Transaction) -> Self {
        Self {
            date: format_display_date(tx.date),
            kind: tx.r#type.label().to_string(),
            category: tx.category.name.clone(),
            amount: tx.amount,
            note: tx
                .note
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(NOTE_PLACEHOLDER)
                .to_string(),
        }
    }

    fn cells(&self) -> [String; 5] {
        [
            self.date.clone(),
            self.kind.clone(),
            self.category.clone(),
            self.amount.to_string(),
            self.note.clone(),
        ]
    }
}

/// One row per transaction, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSheet {
    rows: Vec<SheetRow>,
}

impl TransactionSheet {
    pub fn build(transactions: &[Transaction]) -> CoreResult<Self> {
        if transactions.is_empty() {
            return Err(CoreError::Export("No transactions to export".into()));
        }
        Ok(Self {
            rows: transactions.iter().map(SheetRow::from_transaction).collect(),
        })
    }

    pub fn sheet_name(&self) -> &'static str {
        SHEET_NAME
    }

    pub fn headers(&self) -> Vec<&'static str> {
        COLUMNS.iter().map(|c| c.header).collect()
    }

    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    pub fn to_xlsx(&self) -> CoreResult<Vec<u8>> {
        self.workbook_bytes()
            .map_err(|e| CoreError::Export(format!("Build workbook: {}", e)))
    }

    fn workbook_bytes(&self) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, column) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, column.header, &bold)?;
            worksheet.set_column_width(col, column.width)?;
        }
        for (i, row) in self.rows.iter().enumerate() {
            let r = i as u32 + 1;
            worksheet.write_string(r, 0, &row.date)?;
            worksheet.write_string(r, 1, &row.kind)?;
            worksheet.write_string(r, 2, &row.category)?;
            // Kept numeric so spreadsheet sums still work
            worksheet.write_number(r, 3, row.amount as f64)?;
            worksheet.write_string(r, 4, &row.note)?;
        }
        workbook.save_to_buffer()
    }

    pub fn to_csv(&self) -> CoreResult<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        let csv_err = |e: csv::Error| CoreError::Export(format!("Build CSV: {}", e));
        wtr.write_record(COLUMNS.iter().map(|c| c.header))
            .map_err(csv_err)?;
        for row in &self.rows {
            wtr.write_record(row.cells()).map_err(csv_err)?;
        }
        wtr.into_inner()
            .map_err(|e| CoreError::Export(format!("Build CSV: {}", e)))
    }

    pub fn write_xlsx(
        &self,
        dir: &Path,
        app_name: &str,
        kind: ExportKind,
        date: NaiveDate,
    ) -> CoreResult<PathBuf> {
        let path = dir.join(export_file_name(app_name, kind, date, "xlsx"));
        write_atomic(&path, &self.to_xlsx()?)?;
        Ok(path)
    }

    pub fn write_csv(
        &self,
        dir: &Path,
        app_name: &str,
        kind: ExportKind,
        date: NaiveDate,
    ) -> CoreResult<PathBuf> {
        let path = dir.join(export_file_name(app_name, kind, date, "csv"));
        write_atomic(&path, &self.to_csv()?)?;
        Ok(path)
    }
}
