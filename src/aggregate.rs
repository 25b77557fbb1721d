// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure reductions over an already-fetched transaction list. Nothing here
//! keeps state between calls; the same input and reference date always give
//! the same output.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::errors::{CoreError, CoreResult};
use crate::models::{
    BreakdownEntry, CategoryBreakdown, DayBucket, SummaryResult, TimeSeries, Transaction, TxType,
};
use crate::utils::{day_key, weekday_short};

pub const DEFAULT_WINDOW_DAYS: usize = 7;
pub const DEFAULT_RECENT: usize = 5;
/// Longest trailing window `daily_series` accepts.
pub const MAX_WINDOW_DAYS: usize = 366;

pub fn summarize(transactions: &[Transaction]) -> SummaryResult {
    let (income, expense) =
        transactions
            .iter()
            .fold((0i64, 0i64), |(inc, exp), tx| match tx.r#type {
                TxType::Income => (inc.saturating_add(tx.amount), exp),
                TxType::Expense => (inc, exp.saturating_add(tx.amount)),
            });
    SummaryResult {
        total_income: income,
        total_expense: expense,
        balance: income.saturating_sub(expense),
    }
}

/// Checks a server-side summary against the transaction list it should
/// describe. The list wins when they disagree.
pub fn reconcile_summary(
    precomputed: Option<SummaryResult>,
    transactions: &[Transaction],
) -> SummaryResult {
    let computed = summarize(transactions);
    if let Some(remote) = precomputed {
        if remote != computed {
            tracing::warn!(
                ?remote,
                ?computed,
                "summary endpoint disagrees with transaction list"
            );
        }
    }
    computed
}

/// Trailing `window_days` buckets ending at `reference` inclusive, oldest
/// first. Days outside the window are skipped. Windows longer than
/// [`MAX_WINDOW_DAYS`] are rejected.
pub fn daily_series(
    transactions: &[Transaction],
    window_days: usize,
    reference: NaiveDate,
) -> CoreResult<TimeSeries> {
    if window_days == 0 {
        return Ok(TimeSeries::default());
    }
    if window_days > MAX_WINDOW_DAYS {
        return Err(CoreError::Validation(format!(
            "Window of {} days exceeds the {} day limit",
            window_days, MAX_WINDOW_DAYS
        )));
    }
    let start = reference
        .checked_sub_signed(Duration::days(window_days as i64 - 1))
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Window of {} days before {} is out of range",
                window_days, reference
            ))
        })?;
    let mut buckets: Vec<DayBucket> = (0..window_days)
        .map(|offset| {
            let day = start + Duration::days(offset as i64);
            DayBucket {
                date_key: day_key(day),
                label: weekday_short(day).to_string(),
                income_total: 0,
                expense_total: 0,
            }
        })
        .collect();

    for tx in transactions {
        let offset = (tx.date - start).num_days();
        if offset < 0 || offset >= window_days as i64 {
            continue;
        }
        let bucket = &mut buckets[offset as usize];
        match tx.r#type {
            TxType::Income => {
                bucket.income_total = bucket.income_total.saturating_add(tx.amount)
            }
            TxType::Expense => {
                bucket.expense_total = bucket.expense_total.saturating_add(tx.amount)
            }
        }
    }
    Ok(TimeSeries { buckets })
}

/// Per-category totals for one transaction type, largest first. Equal totals
/// keep the order in which their categories first appeared.
pub fn category_breakdown(transactions: &[Transaction], kind: TxType) -> CategoryBreakdown {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<BreakdownEntry> = Vec::new();

    for tx in transactions.iter().filter(|tx| tx.r#type == kind) {
        match index.get(tx.category_id()) {
            Some(&i) => entries[i].total = entries[i].total.saturating_add(tx.amount),
            None => {
                index.insert(tx.category_id(), entries.len());
                entries.push(BreakdownEntry {
                    category_id: tx.category_id().to_string(),
                    label: tx.category.label(),
                    total: tx.amount,
                });
            }
        }
    }
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries
}

/// Leading `n` entries, in the order the store returned them (newest first
/// for the remote API).
pub fn recent(transactions: &[Transaction], n: usize) -> &[Transaction] {
    &transactions[..n.min(transactions.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cat(id: &str, name: &str, kind: TxType, icon: Option<&str>) -> Category {
        Category {
            id: id.into(),
            name: name.into(),
            r#type: kind,
            icon: icon.map(str::to_string),
        }
    }

    fn tx(id: &str, amount: i64, category: &Category, date: NaiveDate) -> Transaction {
        Transaction {
            id: id.into(),
            amount,
            r#type: category.r#type,
            date,
            note: None,
            category: category.clone(),
        }
    }

    #[test]
    fn summarize_empty_is_all_zero() {
        assert_eq!(summarize(&[]), SummaryResult::default());
    }

    #[test]
    fn reference_scenario() {
        let food = cat("food", "Food", TxType::Expense, Some("🍽️"));
        let salary = cat("salary", "Salary", TxType::Income, Some("💼"));
        let day = d(2025, 3, 4);
        let txs = vec![tx("1", 50_000, &food, day), tx("2", 200_000, &salary, day)];

        assert_eq!(
            summarize(&txs),
            SummaryResult {
                total_income: 200_000,
                total_expense: 50_000,
                balance: 150_000,
            }
        );
        let breakdown = category_breakdown(&txs, TxType::Expense);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].label, "🍽️ Food");
        assert_eq!(breakdown[0].total, 50_000);
    }

    #[test]
    fn daily_series_has_fixed_length_even_when_empty() {
        let series = daily_series(&[], 7, d(2025, 3, 4)).unwrap();
        let keys: Vec<_> = series.buckets.iter().map(|b| b.date_key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "2025-02-26",
                "2025-02-27",
                "2025-02-28",
                "2025-03-01",
                "2025-03-02",
                "2025-03-03",
                "2025-03-04"
            ]
        );
        assert!(series
            .buckets
            .iter()
            .all(|b| b.income_total == 0 && b.expense_total == 0));
        assert_eq!(series.buckets[6].label, "Sel");
    }

    #[test]
    fn daily_series_buckets_by_day_and_skips_out_of_window() {
        let food = cat("food", "Food", TxType::Expense, None);
        let salary = cat("salary", "Salary", TxType::Income, None);
        let reference = d(2025, 3, 4);
        let txs = vec![
            tx("late", 10, &food, reference),
            tx("future", 999, &food, d(2025, 3, 5)),
            tx("old", 999, &salary, d(2025, 2, 25)),
            tx("early", 20, &food, d(2025, 2, 26)),
            tx("pay", 300, &salary, reference),
            tx("late2", 5, &food, reference),
        ];
        let series = daily_series(&txs, 7, reference).unwrap();
        assert_eq!(series.buckets[0].expense_total, 20);
        assert_eq!(series.buckets[6].expense_total, 15);
        assert_eq!(series.buckets[6].income_total, 300);
        let in_window_income: i64 = series.buckets.iter().map(|b| b.income_total).sum();
        assert_eq!(in_window_income, 300);
    }

    #[test]
    fn daily_series_zero_window_is_empty() {
        assert!(daily_series(&[], 0, d(2025, 3, 4)).unwrap().buckets.is_empty());
    }

    #[test]
    fn daily_series_rejects_oversized_windows() {
        assert!(daily_series(&[], MAX_WINDOW_DAYS, d(2025, 3, 4)).is_ok());
        assert!(matches!(
            daily_series(&[], usize::MAX / 2, d(2025, 3, 4)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            daily_series(&[], 30, NaiveDate::MIN),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let food = cat("food", "Food", TxType::Expense, None);
        let day = d(2025, 3, 4);
        let txs = vec![tx("1", i64::MAX, &food, day), tx("2", i64::MAX, &food, day)];
        let summary = summarize(&txs);
        assert_eq!(summary.total_expense, i64::MAX);
        assert_eq!(summary.balance, -i64::MAX);
        assert_eq!(category_breakdown(&txs, TxType::Expense)[0].total, i64::MAX);
        let series = daily_series(&txs, 1, day).unwrap();
        assert_eq!(series.buckets[0].expense_total, i64::MAX);
    }

    #[test]
    fn breakdown_sorted_desc_with_first_seen_tie_order() {
        let a = cat("a", "A", TxType::Expense, None);
        let b = cat("b", "B", TxType::Expense, None);
        let c = cat("c", "C", TxType::Expense, None);
        let day = d(2025, 1, 1);
        let txs = vec![
            tx("1", 100, &b, day),
            tx("2", 300, &c, day),
            tx("3", 100, &a, day),
            tx("4", 200, &c, day),
        ];
        let labels: Vec<_> = category_breakdown(&txs, TxType::Expense)
            .into_iter()
            .map(|e| (e.category_id, e.total))
            .collect();
        assert_eq!(
            labels,
            vec![("c".into(), 500), ("b".into(), 100), ("a".into(), 100)]
        );
    }

    #[test]
    fn breakdown_omits_other_type_and_sums_to_summary() {
        let food = cat("food", "Food", TxType::Expense, None);
        let salary = cat("salary", "Salary", TxType::Income, None);
        let bonus = cat("bonus", "Bonus", TxType::Income, None);
        let day = d(2025, 1, 1);
        let txs = vec![
            tx("1", 70, &food, day),
            tx("2", 1_000, &salary, day),
            tx("3", 250, &bonus, day),
        ];
        let summary = summarize(&txs);
        let income = category_breakdown(&txs, TxType::Income);
        let expense = category_breakdown(&txs, TxType::Expense);
        assert_eq!(income.iter().map(|e| e.total).sum::<i64>(), summary.total_income);
        assert_eq!(expense.iter().map(|e| e.total).sum::<i64>(), summary.total_expense);
        assert!(income.iter().all(|e| e.category_id != "food"));
    }

    #[test]
    fn reconcile_prefers_computed_totals() {
        let food = cat("food", "Food", TxType::Expense, None);
        let txs = vec![tx("1", 70, &food, d(2025, 1, 1))];
        let stale = SummaryResult {
            total_income: 0,
            total_expense: 10,
            balance: -10,
        };
        assert_eq!(reconcile_summary(Some(stale), &txs).total_expense, 70);
        assert_eq!(reconcile_summary(None, &txs).balance, -70);
    }

    #[test]
    fn recent_clamps_to_len() {
        let food = cat("food", "Food", TxType::Expense, None);
        let txs = vec![tx("1", 1, &food, d(2025, 1, 1)), tx("2", 2, &food, d(2025, 1, 2))];
        assert_eq!(recent(&txs, 5).len(), 2);
        assert_eq!(recent(&txs, 1)[0].id, "1");
    }
}
