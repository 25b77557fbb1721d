// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use crate::aggregate::{category_breakdown, daily_series, reconcile_summary};
use crate::config::Config;
use crate::models::{TimeSeries, TxType};
use crate::store::{fetch_all, Store};
use crate::utils::{
    format_axis_tick, format_currency, format_short_date, maybe_print_json, parse_date,
    pretty_table, today,
};

const BAR_WIDTH: usize = 20;

pub fn summary(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let (categories, txs) = fetch_all(store)?;
    let remote = store.summary().unwrap_or_else(|err| {
        tracing::warn!(%err, "summary endpoint unavailable, using transaction list");
        None
    });
    let totals = reconcile_summary(remote, &txs);

    let payload = json!({
        "totalIncome": totals.total_income,
        "totalExpense": totals.total_expense,
        "balance": totals.balance,
        "categories": categories.len(),
        "transactions": txs.len(),
    });
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &payload)? {
        return Ok(());
    }
    let data = vec![
        vec![TxType::Income.label().to_string(), format_currency(totals.total_income)],
        vec![TxType::Expense.label().to_string(), format_currency(totals.total_expense)],
        vec!["Saldo".to_string(), format_currency(totals.balance)],
    ];
    println!("{}", pretty_table(&["", "Total"], data));
    println!(
        "{} transaction(s) across {} categor{}",
        txs.len(),
        categories.len(),
        if categories.len() == 1 { "y" } else { "ies" }
    );
    Ok(())
}

pub fn chart(cfg: &Config, store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let days = sub
        .get_one::<u64>("days")
        .map(|d| *d as usize)
        .unwrap_or(cfg.window_days);
    let reference = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let txs = store.list_transactions()?;
    let series = daily_series(&txs, days, reference)?;

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series.buckets)? {
        return Ok(());
    }
    println!("{}", chart_table(&series));
    Ok(())
}

fn bar(value: i64, max: i64) -> String {
    if max <= 0 || value <= 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * BAR_WIDTH as f64).ceil() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn chart_table(series: &TimeSeries) -> comfy_table::Table {
    let max = series
        .buckets
        .iter()
        .map(|b| b.income_total.max(b.expense_total))
        .max()
        .unwrap_or(0);
    let scale = format!("0 .. {}", format_axis_tick(max));
    let data = series
        .buckets
        .iter()
        .map(|b| {
            vec![
                b.label.clone(),
                b.date_key.clone(),
                format_currency(b.income_total),
                format_currency(b.expense_total),
                format!("+{}\n-{}", bar(b.income_total, max), bar(b.expense_total, max)),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Day",
            "Date",
            TxType::Income.label(),
            TxType::Expense.label(),
            scale.as_str(),
        ],
        data,
    )
}

pub fn breakdown(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TxType = sub
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("expense")
        .parse()?;
    let txs = store.list_transactions()?;
    let entries = category_breakdown(&txs, kind);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
        return Ok(());
    }
    let grand: i64 = entries.iter().map(|e| e.total).sum();
    let data = entries
        .iter()
        .map(|e| {
            let share = if grand > 0 {
                e.total as f64 * 100.0 / grand as f64
            } else {
                0.0
            };
            vec![e.label.clone(), format_currency(e.total), format!("{:.1}%", share)]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Total", "Share"], data));
    Ok(())
}

pub fn recent(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let n = sub
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(crate::aggregate::DEFAULT_RECENT);
    let txs = store.list_transactions()?;
    let latest = crate::aggregate::recent(&txs, n);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &latest)? {
        return Ok(());
    }
    let data = latest
        .iter()
        .map(|tx| {
            let sign = match tx.r#type {
                TxType::Income => "+",
                TxType::Expense => "-",
            };
            vec![
                format_short_date(tx.date),
                tx.category.label(),
                tx.note.clone().unwrap_or_default(),
                format!("{}{}", sign, format_currency(tx.amount)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Category", "Note", "Amount"], data));
    Ok(())
}
