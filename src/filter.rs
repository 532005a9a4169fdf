// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory filtering and ordering of a fetched transaction list.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::identity::CurrentUser;
use crate::models::{PaymentMethod, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
}

/// Whose transactions to keep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserScope {
    #[default]
    All,
    Me,
    User(String),
}

/// Every `None` criterion means "ALL". Bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub user: UserScope,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction, current: &CurrentUser) -> bool {
        if self.kind.is_some_and(|k| k != t.r#type) {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| c != t.category) {
            return false;
        }
        let wanted_user = match &self.user {
            UserScope::All => None,
            UserScope::Me => Some(current.id.as_str()),
            UserScope::User(id) => Some(id.as_str()),
        };
        if wanted_user.is_some_and(|u| u != t.user_id) {
            return false;
        }
        if self.min_amount.is_some_and(|min| t.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| t.amount > max) {
            return false;
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            let Some(date) = t.date else {
                return false;
            };
            if self.start_date.is_some_and(|start| date < start) {
                return false;
            }
            if self.end_date.is_some_and(|end| date > end) {
                return false;
            }
        }
        if self.payment_method.is_some_and(|m| m != t.payment_method) {
            return false;
        }
        true
    }
}

/// Keep the transactions matching every active criterion, then sort.
///
/// The sort is stable. A missing date orders before every real date.
pub fn apply(
    txns: &[Transaction],
    filter: &TransactionFilter,
    order: SortOrder,
    current: &CurrentUser,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = txns
        .iter()
        .filter(|t| filter.matches(t, current))
        .cloned()
        .collect();
    sort(&mut out, order);
    out
}

pub fn sort(txns: &mut [Transaction], order: SortOrder) {
    match order {
        SortOrder::Newest => txns.sort_by_key(|t| Reverse(t.date)),
        SortOrder::Oldest => txns.sort_by_key(|t| t.date),
        SortOrder::Highest => txns.sort_by_key(|t| Reverse(t.amount)),
        SortOrder::Lowest => txns.sort_by_key(|t| t.amount),
    }
}

/// Distinct categories present in the list, for filter pickers.
pub fn categories(txns: &[Transaction]) -> Vec<String> {
    txns.iter()
        .map(|t| t.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Highest => "highest",
            SortOrder::Lowest => "lowest",
        }
    }
}

impl FromStr for SortOrder {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "highest" => Ok(SortOrder::Highest),
            "lowest" => Ok(SortOrder::Lowest),
            other => Err(WalletError::InvalidInput(format!(
                "unknown sort '{}' (use newest|oldest|highest|lowest)",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
