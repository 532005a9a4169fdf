// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Live queries as a pull-based stream of full snapshots.
//!
//! A [`Subscription`] remembers the revision it last delivered. Each poll
//! compares that against the stored revision and, if anything changed,
//! re-runs the query and hands back the complete result. Consumers diff if
//! they care to.

use rusqlite::Connection;
use serde::Serialize;

use crate::error::Result;
use crate::identity::CurrentUser;
use crate::models::{Account, Transaction};

use super::{ACCOUNTS_KEY, accounts, current_revision, transactions};

pub trait LiveQuery {
    type Item;

    fn revision_key(&self) -> &str;

    fn fetch(&self, conn: &Connection, user: &CurrentUser) -> Result<Vec<Self::Item>>;
}

/// Transactions of one account.
pub struct AccountTransactions(pub String);

/// Accounts the current user belongs to.
pub struct MyAccounts;

impl LiveQuery for AccountTransactions {
    type Item = Transaction;

    fn revision_key(&self) -> &str {
        &self.0
    }

    fn fetch(&self, conn: &Connection, user: &CurrentUser) -> Result<Vec<Transaction>> {
        transactions::list(conn, user, &self.0)
    }
}

impl LiveQuery for MyAccounts {
    type Item = Account;

    fn revision_key(&self) -> &str {
        ACCOUNTS_KEY
    }

    fn fetch(&self, conn: &Connection, user: &CurrentUser) -> Result<Vec<Account>> {
        accounts::list_for_user(conn, user)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<T> {
    pub revision: i64,
    pub items: Vec<T>,
}

pub struct Subscription<'c, Q> {
    conn: &'c Connection,
    user: CurrentUser,
    query: Q,
    delivered: Option<i64>,
}

pub fn subscribe<'c, Q: LiveQuery>(
    conn: &'c Connection,
    user: &CurrentUser,
    query: Q,
) -> Subscription<'c, Q> {
    Subscription {
        conn,
        user: user.clone(),
        query,
        delivered: None,
    }
}

pub fn subscribe_transactions<'c>(
    conn: &'c Connection,
    user: &CurrentUser,
    account_id: &str,
) -> Subscription<'c, AccountTransactions> {
    subscribe(conn, user, AccountTransactions(account_id.to_string()))
}

pub fn subscribe_accounts<'c>(
    conn: &'c Connection,
    user: &CurrentUser,
) -> Subscription<'c, MyAccounts> {
    subscribe(conn, user, MyAccounts)
}

impl<Q: LiveQuery> Subscription<'_, Q> {
    /// The next snapshot if anything changed since the last one; the first
    /// poll always yields.
    pub fn poll(&mut self) -> Result<Option<Snapshot<Q::Item>>> {
        let revision = current_revision(self.conn, self.query.revision_key())?;
        if self.delivered == Some(revision) {
            return Ok(None);
        }
        let items = self.query.fetch(self.conn, &self.user)?;
        self.delivered = Some(revision);
        Ok(Some(Snapshot { revision, items }))
    }
}

/// Yields pending snapshots; `None` means "up to date", not "closed". Poll
/// again after further writes.
impl<Q: LiveQuery> Iterator for Subscription<'_, Q> {
    type Item = Result<Snapshot<Q::Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.poll().transpose()
    }
}
