// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::currency::amount_ceiling;
use crate::error::{Result, WalletError};
use crate::identity::CurrentUser;
use crate::models::{NewTransaction, Transaction};

use super::{bump_revision, decimal_col, is_member, new_id, require_member, touch_account};

const SELECT_TRANSACTION: &str = "SELECT id, account_id, user_id, type, amount, category, payment_method, date, note, created_at FROM transactions";

fn row_to_transaction(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        account_id: r.get(1)?,
        user_id: r.get(2)?,
        r#type: r.get(3)?,
        amount: decimal_col(r, 4)?,
        category: r.get(5)?,
        payment_method: r.get(6)?,
        date: r.get(7)?,
        note: r.get(8)?,
        created_at: r.get(9)?,
    })
}

fn validate(new: &NewTransaction) -> Result<()> {
    if new.amount <= Decimal::ZERO || new.amount >= amount_ceiling() {
        return Err(WalletError::InvalidAmount(new.amount));
    }
    if new.category.trim().is_empty() {
        return Err(WalletError::InvalidInput("category is empty".into()));
    }
    Ok(())
}

fn clean_note(note: &Option<String>) -> Option<String> {
    note.as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn account_of(conn: &Connection, id: &str) -> Result<String> {
    let account_id: Option<String> = conn
        .query_row(
            "SELECT account_id FROM transactions WHERE id=?1",
            params![id],
            |r| r.get(0),
        )
        .optional()?;
    account_id.ok_or_else(|| WalletError::NotFound(format!("transaction {}", id)))
}

pub fn add(
    conn: &Connection,
    user: &CurrentUser,
    account_id: &str,
    new: &NewTransaction,
) -> Result<Transaction> {
    validate(new)?;
    require_member(conn, account_id, user)?;
    let id = new_id("txn");
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO transactions(id, account_id, user_id, type, amount, category, payment_method, date, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            account_id,
            user.id,
            new.r#type,
            new.amount.normalize().to_string(),
            new.category.trim(),
            new.payment_method,
            new.date,
            clean_note(&new.note),
        ],
    )?;
    touch_account(&tx, account_id)?;
    bump_revision(&tx, account_id)?;
    tx.commit()?;
    log::debug!(
        "user {} recorded {} {} on account {}",
        user.username,
        new.r#type,
        new.amount,
        account_id
    );
    get(conn, user, &id)?.ok_or_else(|| WalletError::NotFound(format!("transaction {}", id)))
}

/// `None` when missing or when the caller cannot read the parent account.
pub fn get(conn: &Connection, user: &CurrentUser, id: &str) -> Result<Option<Transaction>> {
    let sql = format!("{} WHERE id=?1", SELECT_TRANSACTION);
    let found = conn
        .query_row(&sql, params![id], row_to_transaction)
        .optional()?;
    match found {
        Some(t) if is_member(conn, &t.account_id, &user.id)? => Ok(Some(t)),
        Some(t) => {
            log::debug!("user {} cannot read account {}", user.username, t.account_id);
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Newest first. Non-members get an empty list rather than an error.
pub fn list(conn: &Connection, user: &CurrentUser, account_id: &str) -> Result<Vec<Transaction>> {
    if !is_member(conn, account_id, &user.id)? {
        log::debug!("user {} cannot read account {}", user.username, account_id);
        return Ok(Vec::new());
    }
    let sql = format!(
        "{} WHERE account_id=?1 ORDER BY date DESC, created_at DESC, rowid DESC",
        SELECT_TRANSACTION
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![account_id], row_to_transaction)?;
    let data = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(data)
}

pub fn update(
    conn: &Connection,
    user: &CurrentUser,
    id: &str,
    new: &NewTransaction,
) -> Result<Transaction> {
    validate(new)?;
    let account_id = account_of(conn, id)?;
    require_member(conn, &account_id, user)?;
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE transactions
         SET type=?1, amount=?2, category=?3, payment_method=?4, date=?5, note=?6
         WHERE id=?7",
        params![
            new.r#type,
            new.amount.normalize().to_string(),
            new.category.trim(),
            new.payment_method,
            new.date,
            clean_note(&new.note),
            id,
        ],
    )?;
    touch_account(&tx, &account_id)?;
    bump_revision(&tx, &account_id)?;
    tx.commit()?;
    get(conn, user, id)?.ok_or_else(|| WalletError::NotFound(format!("transaction {}", id)))
}

pub fn delete(conn: &Connection, user: &CurrentUser, id: &str) -> Result<()> {
    let account_id = account_of(conn, id)?;
    require_member(conn, &account_id, user)?;
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    touch_account(&tx, &account_id)?;
    bump_revision(&tx, &account_id)?;
    tx.commit()?;
    Ok(())
}
