// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::accounts::usernames;
use super::required;
use crate::balance::balance;
use crate::currency::format_money;
use crate::filter::{self, SortOrder, TransactionFilter, UserScope};
use crate::identity::CurrentUser;
use crate::models::{Account, NewTransaction, PaymentMethod, Transaction};
use crate::store::subscription::subscribe_transactions;
use crate::store::{accounts, transactions, users};
use crate::utils::{
    current_user, maybe_print_json, parse_amount, parse_bound, parse_date, pretty_table,
    separator_scheme,
};
use anyhow::Result;
use rusqlite::Connection;
use std::time::Duration;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let me = current_user(conn)?;
            let id = required(sub, "id")?;
            transactions::delete(conn, &me, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("watch", sub)) => watch(conn, sub)?,
        Some(("categories", sub)) => {
            let me = current_user(conn)?;
            let txns = transactions::list(conn, &me, required(sub, "account")?)?;
            for c in filter::categories(&txns) {
                println!("{}", c);
            }
        }
        _ => {}
    }
    Ok(())
}

fn account_for(conn: &Connection, me: &CurrentUser, id: &str) -> Result<Account> {
    accounts::get(conn, me, id)?.ok_or_else(|| anyhow::anyhow!("Account '{}' not found", id))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let me = current_user(conn)?;
    let account = account_for(conn, &me, required(sub, "account")?)?;
    let scheme = separator_scheme(conn)?;
    let new = NewTransaction {
        r#type: required(sub, "type")?.parse()?,
        amount: parse_amount(required(sub, "amount")?, account.currency, scheme)?,
        category: required(sub, "category")?.to_string(),
        payment_method: required(sub, "method")?.parse()?,
        date: Some(match sub.get_one::<String>("date") {
            Some(d) => parse_date(d)?,
            None => chrono::Local::now().date_naive(),
        }),
        note: sub.get_one::<String>("note").cloned(),
    };
    let t = transactions::add(conn, &me, &account.id, &new)?;
    println!(
        "Recorded {} {} ({}) on '{}' id {}",
        t.r#type,
        format_money(t.amount, account.currency, scheme),
        t.category,
        account.name,
        t.id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let me = current_user(conn)?;
    let id = required(sub, "id")?;
    let current = transactions::get(conn, &me, id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction '{}' not found", id))?;
    let account = account_for(conn, &me, &current.account_id)?;
    let scheme = separator_scheme(conn)?;

    let mut new = NewTransaction {
        r#type: current.r#type,
        amount: current.amount,
        category: current.category,
        payment_method: current.payment_method,
        date: current.date,
        note: current.note,
    };
    if let Some(t) = sub.get_one::<String>("type") {
        new.r#type = t.parse()?;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        new.amount = parse_amount(a, account.currency, scheme)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        new.category = c.to_string();
    }
    if let Some(pm) = sub.get_one::<String>("method") {
        new.payment_method = pm.parse()?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        new.date = Some(parse_date(d)?);
    }
    if let Some(n) = sub.get_one::<String>("note") {
        new.note = Some(n.to_string());
    }
    let t = transactions::update(conn, &me, id, &new)?;
    println!(
        "Updated {} {} ({})",
        t.r#type,
        format_money(t.amount, account.currency, scheme),
        t.category
    );
    Ok(())
}

/// Build filter criteria from `tx list` arguments. `all` means no criterion.
pub fn filter_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let given = |name: &str| {
        sub.get_one::<String>(name)
            .filter(|v| !v.eq_ignore_ascii_case("all"))
    };
    let mut f = TransactionFilter::default();
    if let Some(t) = given("type") {
        f.kind = Some(t.parse()?);
    }
    f.category = given("category").cloned();
    if let Some(u) = given("user") {
        f.user = if u.eq_ignore_ascii_case("me") {
            UserScope::Me
        } else {
            let user = users::find_by_username(conn, u)?
                .ok_or_else(|| anyhow::anyhow!("Unknown user '{}'", u))?;
            UserScope::User(user.id)
        };
    }
    f.min_amount = given("min").map(|s| parse_bound(s)).transpose()?;
    f.max_amount = given("max").map(|s| parse_bound(s)).transpose()?;
    f.start_date = given("from").map(|s| parse_date(s)).transpose()?;
    f.end_date = given("to").map(|s| parse_date(s)).transpose()?;
    f.payment_method = given("method")
        .map(|s| s.parse::<PaymentMethod>())
        .transpose()?;
    Ok(f)
}

/// Filtered, sorted, and limited transactions for `tx list`.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let me = current_user(conn)?;
    let account_id = required(sub, "account")?;
    let criteria = filter_from_args(conn, sub)?;
    let order: SortOrder = match sub.get_one::<String>("sort") {
        Some(s) => s.parse()?,
        None => SortOrder::default(),
    };
    let fetched = transactions::list(conn, &me, account_id)?;
    let mut data = filter::apply(&fetched, &criteria, order, &me);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let me = current_user(conn)?;
    let account = account_for(conn, &me, required(sub, "account")?)?;
    let scheme = separator_scheme(conn)?;
    let creators: Vec<String> = data.iter().map(|t| t.user_id.clone()).collect();
    let names = usernames(conn, &creators)?;
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            vec![
                t.date.map(|d| d.to_string()).unwrap_or_default(),
                t.r#type.to_string(),
                format_money(t.signed_amount(), account.currency, scheme),
                t.category.clone(),
                t.payment_method.to_string(),
                names.get(&t.user_id).cloned().unwrap_or_default(),
                t.note.clone().unwrap_or_default(),
                t.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Type", "Amount", "Category", "Method", "By", "Note", "Id"],
            rows,
        )
    );
    println!(
        "Balance of shown: {}",
        format_money(balance(&data), account.currency, scheme)
    );
    Ok(())
}

fn watch(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let me = current_user(conn)?;
    let account = account_for(conn, &me, required(sub, "account")?)?;
    let scheme = separator_scheme(conn)?;
    let interval = Duration::from_millis(*sub.get_one::<u64>("interval").unwrap_or(&1000));
    let limit = sub.get_one::<usize>("count").copied();

    let mut feed = subscribe_transactions(conn, &me, &account.id);
    let mut delivered = 0usize;
    loop {
        for snapshot in feed.by_ref() {
            let snapshot = snapshot?;
            println!(
                "[rev {}] {} transactions, balance {}",
                snapshot.revision,
                snapshot.items.len(),
                format_money(balance(&snapshot.items), account.currency, scheme)
            );
            delivered += 1;
            if limit.is_some_and(|n| delivered >= n) {
                return Ok(());
            }
        }
        std::thread::sleep(interval);
    }
}
