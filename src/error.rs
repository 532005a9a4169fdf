// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the wallet store.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// The caller is not a member of the account it tried to write to.
    #[error("permission denied")]
    PermissionDenied,

    #[error("{0} not found")]
    NotFound(String),

    #[error("amount must be greater than zero, got {0}")]
    InvalidAmount(rust_decimal::Decimal),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("no group account uses join code '{0}'")]
    InvalidJoinCode(String),

    #[error("not logged in; run `sharewallet user login <username>` first")]
    NotLoggedIn,
}
