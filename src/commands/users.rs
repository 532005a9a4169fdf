// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::identity::email_for_username;
use crate::store::users;
use crate::utils::{SETTING_CURRENT_USER, current_user, set_setting};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let user = users::register(conn, required(sub, "username")?)?;
            println!("Registered '{}' ({})", user.username, user.id);
            if sub.get_flag("login") {
                set_setting(conn, SETTING_CURRENT_USER, &user.id)?;
                println!("Logged in as '{}'", user.username);
            }
        }
        Some(("login", sub)) => {
            let name = required(sub, "username")?;
            let user = users::find_by_username(conn, name)?
                .ok_or_else(|| anyhow::anyhow!("Unknown user '{}'", name))?;
            set_setting(conn, SETTING_CURRENT_USER, &user.id)?;
            println!("Logged in as '{}'", user.username);
        }
        Some(("logout", _)) => {
            conn.execute(
                "DELETE FROM settings WHERE key=?1",
                params![SETTING_CURRENT_USER],
            )?;
            println!("Logged out");
        }
        Some(("whoami", _)) => {
            let me = current_user(conn)?;
            println!(
                "{} ({}) <{}>",
                me.username,
                me.id,
                email_for_username(&me.username)?
            );
        }
        _ => {}
    }
    Ok(())
}
