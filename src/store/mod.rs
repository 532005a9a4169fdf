// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Document-style persistence for users, accounts, and transactions.
//!
//! Access control lives here: reads outside the caller's memberships come
//! back as "no data", writes outside them fail with
//! [`WalletError::PermissionDenied`].

pub mod accounts;
pub mod subscription;
pub mod transactions;
pub mod users;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use ulid::Ulid;

use crate::error::{Result, WalletError};
use crate::identity::CurrentUser;
use crate::models::{AccountType, Currency, PaymentMethod, TransactionType};

/// Revision key bumped by every write, watched by account-list subscriptions.
pub const ACCOUNTS_KEY: &str = "*accounts";

pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new())
}

pub fn is_member(conn: &Connection, account_id: &str, user_id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM account_members WHERE account_id=?1 AND user_id=?2",
            params![account_id, user_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Fails with `NotFound` for a missing account and `PermissionDenied` for
/// one the user does not belong to. Returns the owner id.
pub(crate) fn require_member(
    conn: &Connection,
    account_id: &str,
    user: &CurrentUser,
) -> Result<String> {
    let owner: Option<String> = conn
        .query_row(
            "SELECT owner_id FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .optional()?;
    let owner = owner.ok_or_else(|| WalletError::NotFound(format!("account {}", account_id)))?;
    if !is_member(conn, account_id, &user.id)? {
        log::warn!(
            "user {} denied write on account {}",
            user.username,
            account_id
        );
        return Err(WalletError::PermissionDenied);
    }
    Ok(owner)
}

pub(crate) fn touch_account(conn: &Connection, account_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE accounts SET updated_at=datetime('now') WHERE id=?1",
        params![account_id],
    )?;
    Ok(())
}

pub(crate) fn bump_revision(conn: &Connection, account_id: &str) -> Result<()> {
    for key in [account_id, ACCOUNTS_KEY] {
        conn.execute(
            "INSERT INTO revisions(account_id, rev) VALUES (?1, 1)
             ON CONFLICT(account_id) DO UPDATE SET rev=rev+1",
            params![key],
        )?;
    }
    Ok(())
}

pub fn current_revision(conn: &Connection, key: &str) -> Result<i64> {
    let rev: Option<i64> = conn
        .query_row(
            "SELECT rev FROM revisions WHERE account_id=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(rev.unwrap_or(0))
}

pub(crate) fn decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

macro_rules! sql_text_enum {
    ($($t:ty),*) => {
        $(
            impl ToSql for $t {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $t {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    value
                        .as_str()?
                        .parse()
                        .map_err(|e: WalletError| FromSqlError::Other(Box::new(e)))
                }
            }
        )*
    };
}

sql_text_enum!(AccountType, TransactionType, PaymentMethod);

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: WalletError| FromSqlError::Other(Box::new(e)))
    }
}
