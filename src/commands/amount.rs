// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::currency::format_input_code;
use crate::utils::{maybe_print_json, separator_scheme};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("format", sub)) = m.subcommand() {
        let raw = required(sub, "raw")?;
        let code = required(sub, "currency")?;
        let formatted = format_input_code(raw, code, separator_scheme(conn)?);
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &formatted)? {
            println!("{}\t{}", formatted.display, formatted.value);
        }
    }
    Ok(())
}
