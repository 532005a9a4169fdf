// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};
use crate::models::User;

/// Synthetic domain usernames are mapped onto for email-keyed auth backends.
pub const EMAIL_DOMAIN: &str = "sharewallet.local";

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_.]{3,20}$").expect("username pattern is valid")
});

/// The user on whose behalf an operation runs. Passed explicitly to every
/// store, filter, and balance call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

impl From<&User> for CurrentUser {
    fn from(u: &User) -> Self {
        CurrentUser {
            id: u.id.clone(),
            username: u.username.clone(),
        }
    }
}

/// Lowercases and checks a username; returns the canonical form.
pub fn validate_username(raw: &str) -> Result<String> {
    let name = raw.trim().to_lowercase();
    if USERNAME_RE.is_match(&name) {
        Ok(name)
    } else {
        Err(WalletError::InvalidInput(format!(
            "username '{}' must be 3-20 characters of a-z, 0-9, '_' or '.'",
            raw.trim()
        )))
    }
}

pub fn email_for_username(username: &str) -> Result<String> {
    Ok(format!("{}@{}", validate_username(username)?, EMAIL_DOMAIN))
}

/// User-facing text for backend auth error codes.
pub fn auth_error_message(code: &str) -> &'static str {
    match code.trim_start_matches("auth/") {
        "user-not-found" | "invalid-credential" | "wrong-password" => {
            "Invalid username or password"
        }
        "email-already-in-use" => "That username is already taken",
        "weak-password" => "Password must be at least 6 characters",
        "invalid-email" => "That username contains invalid characters",
        "too-many-requests" => "Too many attempts, try again later",
        "network-request-failed" => "Network error, check your connection",
        _ => "Something went wrong, please try again",
    }
}
