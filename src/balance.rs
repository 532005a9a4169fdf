// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance arithmetic over already-fetched transactions.
//!
//! Everything here is a pure fold: no store access, no ambient session.
//! Callers that need "my balance" pass the [`CurrentUser`] in.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::identity::CurrentUser;
use crate::models::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Signed sum: income adds, expense subtracts. Empty input is zero.
pub fn balance<'a, I>(txns: I) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    txns.into_iter()
        .fold(Decimal::ZERO, |acc, t| acc + t.signed_amount())
}

pub fn totals<'a, I>(txns: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut out = Totals::default();
    for t in txns {
        match t.r#type {
            TransactionType::Income => out.income += t.amount,
            TransactionType::Expense => out.expense += t.amount,
        }
    }
    out.balance = out.income - out.expense;
    out
}

/// Per-creator contribution to a (usually group) wallet's balance.
pub fn balance_by_member<'a, I>(txns: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in txns {
        *out.entry(t.user_id.clone()).or_insert(Decimal::ZERO) += t.signed_amount();
    }
    out
}

pub fn balance_for_user<'a, I>(txns: I, user: &CurrentUser) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    balance(txns.into_iter().filter(|t| t.user_id == user.id))
}
