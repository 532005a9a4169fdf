// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{Result, WalletError};
use crate::identity::validate_username;
use crate::models::User;

use super::new_id;

fn row_to_user(r: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        username: r.get(1)?,
        created_at: r.get(2)?,
    })
}

pub fn register(conn: &Connection, username: &str) -> Result<User> {
    let name = validate_username(username)?;
    if find_by_username(conn, &name)?.is_some() {
        return Err(WalletError::UsernameTaken(name));
    }
    let id = new_id("usr");
    conn.execute(
        "INSERT INTO users(id, username) VALUES (?1, ?2)",
        params![id, name],
    )?;
    log::info!("registered user {} ({})", name, id);
    get(conn, &id)?.ok_or_else(|| WalletError::NotFound(format!("user {}", id)))
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, username, created_at FROM users WHERE id=?1",
            params![id],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let name = username.trim().to_lowercase();
    let user = conn
        .query_row(
            "SELECT id, username, created_at FROM users WHERE username=?1",
            params![name],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}
