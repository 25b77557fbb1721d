// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Validated request bodies for `POST /categories` and `POST /transactions`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{CoreError, CoreResult};
use crate::models::{Category, TxType, DEFAULT_ICON};
use crate::utils::{format_currency, sanitize_amount_input};

/// Largest amount a single transaction may carry (one quadrillion Rupiah).
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: TxType,
    pub icon: String,
}

impl NewCategory {
    pub fn new(name: &str, kind: TxType, icon: Option<&str>) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Category name is required".into()));
        }
        let icon = icon
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_ICON);
        Ok(Self {
            name: name.to_string(),
            r#type: kind,
            icon: icon.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub amount: i64,
    #[serde(rename = "type")]
    pub r#type: TxType,
    pub category_id: String,
    #[serde(serialize_with = "crate::utils::ser_midnight_utc")]
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl NewTransaction {
    /// Builds a transaction from raw form input. `raw_amount` may carry
    /// group separators ("5.000.000").
    pub fn prepare(
        raw_amount: &str,
        kind: TxType,
        category_id: Option<&str>,
        date: NaiveDate,
        note: Option<&str>,
        categories: &[Category],
    ) -> CoreResult<Self> {
        let category_id = category_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CoreError::Validation("Select a category first".into()))?;

        let amount = sanitize_amount_input(raw_amount);
        if amount == 0 {
            return Err(CoreError::Validation(format!(
                "Amount '{}' is not a positive number",
                raw_amount
            )));
        }

        let category = categories
            .iter()
            .find(|c| c.id == category_id)
            .ok_or_else(|| CoreError::NotFound(format!("Category '{}' not found", category_id)))?;
        check_entry(amount, kind, category)?;

        Ok(Self {
            amount,
            r#type: kind,
            category_id: category_id.to_string(),
            date,
            note: note
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}

/// Integrity rules every stored transaction obeys: a positive amount no
/// larger than [`MAX_AMOUNT`], and a category of the same type.
pub fn check_entry(amount: i64, kind: TxType, category: &Category) -> CoreResult<()> {
    if amount <= 0 {
        return Err(CoreError::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(CoreError::Validation(format!(
            "Amount exceeds the {} limit",
            format_currency(MAX_AMOUNT)
        )));
    }
    if category.r#type != kind {
        return Err(CoreError::Validation(format!(
            "Category '{}' is {} but the transaction is {}",
            category.name, category.r#type, kind
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: "food".into(),
                name: "Food".into(),
                r#type: TxType::Expense,
                icon: None,
            },
            Category {
                id: "salary".into(),
                name: "Salary".into(),
                r#type: TxType::Income,
                icon: Some("💼".into()),
            },
        ]
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    #[test]
    fn category_name_is_trimmed_and_icon_defaults() {
        let c = NewCategory::new("  Groceries ", TxType::Expense, None).unwrap();
        assert_eq!(c.name, "Groceries");
        assert_eq!(c.icon, DEFAULT_ICON);
        assert!(matches!(
            NewCategory::new("   ", TxType::Expense, Some("🛒")),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn prepare_sanitizes_grouped_amount() {
        let tx = NewTransaction::prepare(
            "5.000.000",
            TxType::Income,
            Some("salary"),
            day(),
            Some("  "),
            &categories(),
        )
        .unwrap();
        assert_eq!(tx.amount, 5_000_000);
        assert_eq!(tx.note, None);
    }

    #[test]
    fn prepare_rejects_bad_input() {
        let cats = categories();
        let missing = NewTransaction::prepare("1000", TxType::Expense, None, day(), None, &cats);
        assert!(matches!(missing, Err(CoreError::Validation(_))));

        let zero = NewTransaction::prepare("Rp", TxType::Expense, Some("food"), day(), None, &cats);
        assert!(matches!(zero, Err(CoreError::Validation(_))));

        let unknown =
            NewTransaction::prepare("1000", TxType::Expense, Some("x"), day(), None, &cats);
        assert!(matches!(unknown, Err(CoreError::NotFound(_))));

        let mismatch =
            NewTransaction::prepare("1000", TxType::Expense, Some("salary"), day(), None, &cats);
        assert!(matches!(mismatch, Err(CoreError::Validation(_))));
    }

    #[test]
    fn prepare_rejects_amounts_over_the_ceiling() {
        let cats = categories();
        let huge = "9".repeat(25);
        let res = NewTransaction::prepare(&huge, TxType::Expense, Some("food"), day(), None, &cats);
        assert!(matches!(res, Err(CoreError::Validation(_))));

        let at_limit = MAX_AMOUNT.to_string();
        let ok = NewTransaction::prepare(&at_limit, TxType::Expense, Some("food"), day(), None, &cats)
            .unwrap();
        assert_eq!(ok.amount, MAX_AMOUNT);
    }

    #[test]
    fn wire_format_sends_midnight_utc() {
        let tx = NewTransaction::prepare(
            "50.000",
            TxType::Expense,
            Some("food"),
            day(),
            Some("Lunch"),
            &categories(),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            json!({
                "amount": 50000,
                "type": "EXPENSE",
                "categoryId": "food",
                "date": "2025-03-04T00:00:00.000Z",
                "note": "Lunch"
            })
        );
    }
}
