// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::currency::{MAX_INTEGER_DIGITS, SeparatorScheme, format_input, typed_integer_digits};
use crate::error::WalletError;
use crate::identity::CurrentUser;
use crate::models::Currency;
use crate::store::users;

pub const SETTING_CURRENT_USER: &str = "current_user";
pub const SETTING_SEPARATOR_SCHEME: &str = "separator_scheme";
pub const SETTING_DEFAULT_CURRENCY: &str = "default_currency";

/// Keys `config set` accepts.
pub const SETTING_KEYS: [&str; 2] = [SETTING_SEPARATOR_SCHEME, SETTING_DEFAULT_CURRENCY];

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse typed amount text the way the amount field formats it.
pub fn parse_amount(s: &str, ccy: Currency, scheme: SeparatorScheme) -> Result<Decimal> {
    if s.trim_start().starts_with('-') {
        anyhow::bail!("Amount must be positive, got '{}'", s);
    }
    if typed_integer_digits(s, ccy, scheme) > MAX_INTEGER_DIGITS {
        anyhow::bail!(
            "Amount '{}' has more than {} integer digits",
            s,
            MAX_INTEGER_DIGITS
        );
    }
    let formatted = format_input(s, ccy, scheme);
    if formatted.display.is_empty() {
        anyhow::bail!("Invalid amount '{}'", s);
    }
    Ok(formatted.value)
}

pub fn parse_bound(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
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
        // If v is an array, stream each element; else stream single line
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

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn separator_scheme(conn: &Connection) -> Result<SeparatorScheme> {
    match get_setting(conn, SETTING_SEPARATOR_SCHEME)? {
        Some(v) => Ok(v.parse()?),
        None => Ok(SeparatorScheme::default()),
    }
}

pub fn default_currency(conn: &Connection) -> Result<Currency> {
    match get_setting(conn, SETTING_DEFAULT_CURRENCY)? {
        Some(v) => Ok(v.parse()?),
        None => Ok(Currency::Usd),
    }
}

/// The logged-in user, resolved from settings.
pub fn current_user(conn: &Connection) -> Result<CurrentUser> {
    let id = get_setting(conn, SETTING_CURRENT_USER)?.ok_or(WalletError::NotLoggedIn)?;
    let user = users::get(conn, &id)?.ok_or(WalletError::NotLoggedIn)?;
    Ok(CurrentUser::from(&user))
}

/// Validate a value for `config set`, returning its canonical text.
pub fn canonical_setting(key: &str, value: &str) -> Result<String> {
    match key {
        SETTING_SEPARATOR_SCHEME => Ok(value.parse::<SeparatorScheme>()?.as_str().to_string()),
        SETTING_DEFAULT_CURRENCY => Ok(value.parse::<Currency>()?.code().to_string()),
        other => anyhow::bail!(
            "Unknown setting '{}' (known: {})",
            other,
            SETTING_KEYS.join(", ")
        ),
    }
}
