// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::{Deserialize, Deserializer, Serializer};
use std::sync::Once;

use crate::errors::{CoreError, CoreResult};

const UA: &str = concat!(
    "sakubumi/",
    env!("CARGO_PKG_VERSION"),
    " (+https://sakubumi-api.vercel.app)"
);

static TRACING_INIT: Once = Once::new();

pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

        let filter = EnvFilter::from_default_env().add_directive(
            "sakubumi=info"
                .parse()
                .unwrap_or_else(|_| LevelFilter::INFO.into()),
        );

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn http_client() -> CoreResult<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Reads the calendar part of either `YYYY-MM-DD` or an ISO timestamp such
/// as `2025-03-04T23:30:00.000Z`. The offset is not applied.
pub fn parse_calendar_date(raw: &str) -> CoreResult<NaiveDate> {
    let day = raw.trim().split(['T', ' ']).next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date '{}'", raw)))
}

/// Bucketing key for a calendar day.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn de_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}

pub fn ser_calendar_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&day_key(*date))
}

/// The API stores dates as instants; a picked day is sent as its UTC midnight.
pub fn ser_midnight_utc<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{}T00:00:00.000Z", day_key(*date)))
}

/// Strips everything but ASCII digits: "5.000.000" -> 5000000, "" -> 0.
/// Saturates instead of wrapping on absurdly long input.
pub fn sanitize_amount_input(raw: &str) -> i64 {
    raw.chars()
        .filter(char::is_ascii_digit)
        .fold(0i64, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(i64::from(c as u8 - b'0'))
        })
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Rupiah, no fractional digits, `.` as the group separator:
/// 150000 -> "Rp\u{a0}150.000", -50000 -> "-Rp\u{a0}50.000".
pub fn format_currency(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}Rp\u{a0}{}", sign, group_thousands(amount.unsigned_abs()))
}

/// Chart axis tick: 50000 -> "Rp50k", 1500 -> "Rp1.5k".
pub fn format_axis_tick(amount: i64) -> String {
    if amount % 1000 == 0 {
        format!("Rp{}k", amount / 1000)
    } else {
        format!("Rp{}k", amount as f64 / 1000.0)
    }
}

/// Numeric day/month/year, e.g. "4/3/2025".
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Day and short month, e.g. "16 Okt".
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{} {}", date.day(), MONTHS_SHORT[date.month0() as usize])
}

pub fn weekday_short(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Sen",
        Weekday::Tue => "Sel",
        Weekday::Wed => "Rab",
        Weekday::Thu => "Kam",
        Weekday::Fri => "Jum",
        Weekday::Sat => "Sab",
        Weekday::Sun => "Min",
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
