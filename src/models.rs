// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

pub const DEFAULT_ICON: &str = "🏷️";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "INCOME",
            TxType::Expense => "EXPENSE",
        }
    }

    /// Label shown in reports and exported rows.
    pub fn label(&self) -> &'static str {
        match self {
            TxType::Income => "Pemasukan",
            TxType::Expense => "Pengeluaran",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TxType::Income),
            "EXPENSE" => Ok(TxType::Expense),
            other => Err(CoreError::Validation(format!(
                "Unknown transaction type '{}', expected income|expense",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: TxType,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Category {
    pub fn icon_or_default(&self) -> &str {
        match self.icon.as_deref() {
            Some(icon) if !icon.trim().is_empty() => icon,
            _ => DEFAULT_ICON,
        }
    }

    /// Icon and name, e.g. "🍽️ Food".
    pub fn label(&self) -> String {
        format!("{} {}", self.icon_or_default(), self.name)
    }
}

/// A recorded entry as returned by `GET /transactions`, with its category
/// resolved and embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub r#type: TxType,
    #[serde(
        deserialize_with = "crate::utils::de_calendar_date",
        serialize_with = "crate::utils::ser_calendar_date"
    )]
    pub date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    pub category: Category,
}

impl Transaction {
    pub fn category_id(&self) -> &str {
        &self.category.id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub total_income: i64,
    pub total_expense: i64,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date_key: String,
    /// Short weekday name, e.g. "Sen".
    pub label: String,
    pub income_total: i64,
    pub expense_total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub buckets: Vec<DayBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub category_id: String,
    pub label: String,
    pub total: i64,
}

pub type CategoryBreakdown = Vec<BreakdownEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Authenticated user plus bearer token. Lives only as long as the process
/// that logged in. `user` is unknown when the session was built from a bare
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    pub access_token: String,
}

impl Session {
    pub fn from_token(token: &str) -> Self {
        Self {
            user: None,
            access_token: token.trim().to_string(),
        }
    }
}
