// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::utils::{
    SETTING_DEFAULT_CURRENCY, SETTING_KEYS, SETTING_SEPARATOR_SCHEME, canonical_setting,
    default_currency, separator_scheme, set_setting,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => match sub.get_one::<String>("key") {
            Some(key) => println!("{}", effective(conn, key)?),
            None => {
                for key in SETTING_KEYS {
                    println!("{} = {}", key, effective(conn, key)?);
                }
            }
        },
        Some(("set", sub)) => {
            let key = required(sub, "key")?;
            let value = canonical_setting(key, required(sub, "value")?)?;
            set_setting(conn, key, &value)?;
            log::info!("setting {} changed to {}", key, value);
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}

/// Stored value, or the default that applies when nothing is stored.
fn effective(conn: &Connection, key: &str) -> Result<String> {
    match key {
        SETTING_SEPARATOR_SCHEME => Ok(separator_scheme(conn)?.to_string()),
        SETTING_DEFAULT_CURRENCY => Ok(default_currency(conn)?.to_string()),
        other => anyhow::bail!(
            "Unknown setting '{}' (known: {})",
            other,
            SETTING_KEYS.join(", ")
        ),
    }
}
