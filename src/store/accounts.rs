// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use ulid::Ulid;

use crate::error::{Result, WalletError};
use crate::identity::CurrentUser;
use crate::models::{Account, AccountType, Currency};

use super::{bump_revision, is_member, new_id, require_member, touch_account};

pub const JOIN_CODE_LEN: usize = 6;

/// Uppercase alphanumerics without the easily confused 0/O and 1/I.
const JOIN_CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

static JOIN_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{6}$").expect("join code pattern is valid"));

const SELECT_ACCOUNT: &str =
    "SELECT id, name, type, currency, owner_id, join_code, created_at, updated_at FROM accounts";

fn row_to_account(r: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: r.get(2)?,
        currency: r.get(3)?,
        owner_id: r.get(4)?,
        member_ids: Vec::new(),
        join_code: r.get(5)?,
        created_at: r.get(6)?,
        updated_at: r.get(7)?,
    })
}

fn load_members(conn: &Connection, account: &mut Account) -> Result<()> {
    let mut stmt =
        conn.prepare("SELECT user_id FROM account_members WHERE account_id=?1 ORDER BY rowid")?;
    let rows = stmt.query_map(params![account.id], |r| r.get::<_, String>(0))?;
    account.member_ids = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(())
}

/// Six characters drawn from a fresh ULID's random bits.
fn random_join_code() -> String {
    let mut bits = Ulid::new().random();
    let mut code = String::with_capacity(JOIN_CODE_LEN);
    for _ in 0..JOIN_CODE_LEN {
        code.push(JOIN_CODE_ALPHABET[(bits & 0x1f) as usize] as char);
        bits >>= 5;
    }
    code
}

fn unused_join_code(conn: &Connection) -> Result<String> {
    for _ in 0..16 {
        let code = random_join_code();
        let taken: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM accounts WHERE join_code=?1",
                params![code],
                |r| r.get(0),
            )
            .optional()?;
        if taken.is_none() {
            return Ok(code);
        }
    }
    Err(WalletError::InvalidInput(
        "could not allocate a unique join code".into(),
    ))
}

pub fn normalize_join_code(raw: &str) -> Result<String> {
    let code = raw.trim().to_uppercase();
    if JOIN_CODE_RE.is_match(&code) {
        Ok(code)
    } else {
        Err(WalletError::InvalidJoinCode(raw.trim().to_string()))
    }
}

fn clean_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WalletError::InvalidInput("account name is empty".into()));
    }
    Ok(name)
}

pub fn create(
    conn: &Connection,
    user: &CurrentUser,
    name: &str,
    r#type: AccountType,
    currency: Currency,
) -> Result<Account> {
    let name = clean_name(name)?;
    let id = new_id("acc");
    let tx = conn.unchecked_transaction()?;
    let join_code = match r#type {
        AccountType::Group => Some(unused_join_code(&tx)?),
        AccountType::Individual => None,
    };
    tx.execute(
        "INSERT INTO accounts(id, name, type, currency, owner_id, join_code)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, name, r#type, currency, user.id, join_code],
    )?;
    tx.execute(
        "INSERT INTO account_members(account_id, user_id) VALUES (?1, ?2)",
        params![id, user.id],
    )?;
    bump_revision(&tx, &id)?;
    tx.commit()?;
    log::debug!("user {} created {} account {}", user.username, r#type, id);
    get(conn, user, &id)?.ok_or_else(|| WalletError::NotFound(format!("account {}", id)))
}

/// `None` both when the account is missing and when the caller is not a member.
pub fn get(conn: &Connection, user: &CurrentUser, id: &str) -> Result<Option<Account>> {
    let sql = format!("{} WHERE id=?1", SELECT_ACCOUNT);
    let found = conn
        .query_row(&sql, params![id], row_to_account)
        .optional()?;
    let Some(mut account) = found else {
        return Ok(None);
    };
    load_members(conn, &mut account)?;
    if !account.is_member(&user.id) {
        log::debug!("user {} cannot read account {}", user.username, id);
        return Ok(None);
    }
    Ok(Some(account))
}

/// Accounts the user belongs to, most recently updated first.
pub fn list_for_user(conn: &Connection, user: &CurrentUser) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.name, a.type, a.currency, a.owner_id, a.join_code, a.created_at, a.updated_at
         FROM accounts a
         JOIN account_members m ON m.account_id=a.id
         WHERE m.user_id=?1
         ORDER BY a.updated_at DESC, a.name",
    )?;
    let rows = stmt.query_map(params![user.id], row_to_account)?;
    let mut data = Vec::new();
    for row in rows {
        let mut account = row?;
        load_members(conn, &mut account)?;
        data.push(account);
    }
    Ok(data)
}

pub fn rename(conn: &Connection, user: &CurrentUser, id: &str, name: &str) -> Result<Account> {
    let name = clean_name(name)?;
    require_member(conn, id, user)?;
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE accounts SET name=?1, updated_at=datetime('now') WHERE id=?2",
        params![name, id],
    )?;
    bump_revision(&tx, id)?;
    tx.commit()?;
    get(conn, user, id)?.ok_or_else(|| WalletError::NotFound(format!("account {}", id)))
}

/// Adds the user to the group account holding `code`. Joining twice is a no-op.
pub fn join_by_code(conn: &Connection, user: &CurrentUser, code: &str) -> Result<Account> {
    let code = normalize_join_code(code)?;
    let id: Option<String> = conn
        .query_row(
            "SELECT id FROM accounts WHERE join_code=?1 AND type='GROUP'",
            params![code],
            |r| r.get(0),
        )
        .optional()?;
    let id = id.ok_or_else(|| WalletError::InvalidJoinCode(code.clone()))?;

    if !is_member(conn, &id, &user.id)? {
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO account_members(account_id, user_id) VALUES (?1, ?2)",
            params![id, user.id],
        )?;
        touch_account(&tx, &id)?;
        bump_revision(&tx, &id)?;
        tx.commit()?;
        log::debug!("user {} joined account {}", user.username, id);
    }
    get(conn, user, &id)?.ok_or_else(|| WalletError::NotFound(format!("account {}", id)))
}

pub fn leave(conn: &Connection, user: &CurrentUser, id: &str) -> Result<()> {
    let owner = require_member(conn, id, user)?;
    if owner == user.id {
        return Err(WalletError::InvalidInput(
            "the owner cannot leave an account; delete it instead".into(),
        ));
    }
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM account_members WHERE account_id=?1 AND user_id=?2",
        params![id, user.id],
    )?;
    touch_account(&tx, id)?;
    bump_revision(&tx, id)?;
    tx.commit()?;
    Ok(())
}

/// Owner only. Removes the account's transactions first, then the account.
/// Returns how many transactions were removed.
pub fn delete(conn: &Connection, user: &CurrentUser, id: &str) -> Result<usize> {
    let owner = require_member(conn, id, user)?;
    if owner != user.id {
        log::warn!("user {} is not the owner of account {}", user.username, id);
        return Err(WalletError::PermissionDenied);
    }
    let tx = conn.unchecked_transaction()?;
    let removed = tx.execute("DELETE FROM transactions WHERE account_id=?1", params![id])?;
    tx.execute(
        "DELETE FROM account_members WHERE account_id=?1",
        params![id],
    )?;
    tx.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    bump_revision(&tx, id)?;
    tx.commit()?;
    log::debug!("deleted account {} and {} transactions", id, removed);
    Ok(removed)
}
