// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::balance::{balance, balance_by_member, totals};
use crate::currency::format_money;
use crate::models::{Account, AccountType};
use crate::store::{accounts, transactions, users};
use crate::utils::{
    current_user, default_currency, maybe_print_json, pretty_table, separator_scheme,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rename", sub)) => {
            let me = current_user(conn)?;
            let account = accounts::rename(
                conn,
                &me,
                required(sub, "id")?,
                required(sub, "name")?,
            )?;
            println!("Renamed account {} to '{}'", account.id, account.name);
        }
        Some(("join", sub)) => {
            let me = current_user(conn)?;
            let account = accounts::join_by_code(conn, &me, required(sub, "code")?)?;
            println!(
                "Joined '{}' ({} members)",
                account.name,
                account.member_ids.len()
            );
        }
        Some(("leave", sub)) => {
            let me = current_user(conn)?;
            let id = required(sub, "id")?;
            accounts::leave(conn, &me, id)?;
            println!("Left account {}", id);
        }
        Some(("rm", sub)) => {
            let me = current_user(conn)?;
            let id = required(sub, "id")?;
            let removed = accounts::delete(conn, &me, id)?;
            println!("Removed account {} and {} transactions", id, removed);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct AccountSummary {
    #[serde(flatten)]
    pub account: Account,
    pub balance: Decimal,
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let me = current_user(conn)?;
    let name = required(sub, "name")?;
    let typ: AccountType = required(sub, "type")?.parse()?;
    let ccy = match sub.get_one::<String>("currency") {
        Some(c) => c.parse()?,
        None => default_currency(conn)?,
    };
    let account = accounts::create(conn, &me, name, typ, ccy)?;
    println!(
        "Added {} account '{}' ({}) id {}",
        account.r#type.as_str().to_lowercase(),
        account.name,
        account.currency,
        account.id
    );
    if let Some(code) = &account.join_code {
        println!("Join code: {}", code);
    }
    Ok(())
}

/// Accounts of the logged-in user with their current balances.
pub fn summaries(conn: &Connection) -> Result<Vec<AccountSummary>> {
    let me = current_user(conn)?;
    let mut out = Vec::new();
    for account in accounts::list_for_user(conn, &me)? {
        let txns = transactions::list(conn, &me, &account.id)?;
        out.push(AccountSummary {
            balance: balance(&txns),
            account,
        });
    }
    Ok(out)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = summaries(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let scheme = separator_scheme(conn)?;
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|s| {
            vec![
                s.account.id.clone(),
                s.account.name.clone(),
                s.account.r#type.to_string(),
                s.account.currency.to_string(),
                s.account.member_ids.len().to_string(),
                format_money(s.balance, s.account.currency, scheme),
                s.account.join_code.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Type", "CCY", "Members", "Balance", "Join code"],
            rows
        )
    );
    Ok(())
}

pub(crate) fn usernames(conn: &Connection, ids: &[String]) -> Result<HashMap<String, String>> {
    let mut out = HashMap::new();
    for id in ids {
        if out.contains_key(id) {
            continue;
        }
        let name = users::get(conn, id)?
            .map(|u| u.username)
            .unwrap_or_else(|| id.clone());
        out.insert(id.clone(), name);
    }
    Ok(out)
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let me = current_user(conn)?;
    let id = required(sub, "id")?;
    let account = accounts::get(conn, &me, id)?
        .ok_or_else(|| anyhow::anyhow!("Account '{}' not found", id))?;
    let txns = transactions::list(conn, &me, &account.id)?;
    let sums = totals(&txns);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &sums)? {
        return Ok(());
    }

    let scheme = separator_scheme(conn)?;
    let money = |d: Decimal| format_money(d, account.currency, scheme);
    let names = usernames(conn, &account.member_ids)?;
    println!(
        "{} ({}, {}) owned by {}",
        account.name,
        account.r#type,
        account.currency,
        names.get(&account.owner_id).unwrap_or(&account.owner_id)
    );
    if let Some(code) = &account.join_code {
        println!("Join code: {}", code);
    }
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance", "Transactions"],
            vec![vec![
                money(sums.income),
                money(sums.expense),
                money(sums.balance),
                txns.len().to_string(),
            ]],
        )
    );
    if account.r#type == AccountType::Group {
        let per_member = balance_by_member(&txns);
        let rows: Vec<Vec<String>> = account
            .member_ids
            .iter()
            .map(|m| {
                vec![
                    names.get(m).cloned().unwrap_or_else(|| m.clone()),
                    money(per_member.get(m).copied().unwrap_or(Decimal::ZERO)),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Member", "Contribution"], rows));
    }
    Ok(())
}
