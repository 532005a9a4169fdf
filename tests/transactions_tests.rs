// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use sharewallet::identity::CurrentUser;
use sharewallet::models::{AccountType, Currency, NewTransaction, PaymentMethod, TransactionType};
use sharewallet::store::{accounts, transactions, users};
use sharewallet::utils::{SETTING_CURRENT_USER, set_setting};
use sharewallet::{cli, commands, db};

fn setup() -> (Connection, String) {
    let conn = db::open_in_memory().unwrap();
    let ana = CurrentUser::from(&users::register(&conn, "ana").unwrap());
    let ben = CurrentUser::from(&users::register(&conn, "ben").unwrap());
    set_setting(&conn, SETTING_CURRENT_USER, &ana.id).unwrap();

    let acct = accounts::create(&conn, &ana, "House", AccountType::Group, Currency::Eur).unwrap();
    accounts::join_by_code(&conn, &ben, acct.join_code.as_deref().unwrap()).unwrap();
    let rows = [
        (&ana, TransactionType::Expense, 10, "2025-01-01"),
        (&ben, TransactionType::Expense, 50, "2025-01-02"),
        (&ana, TransactionType::Income, 5, "2025-01-03"),
    ];
    for (who, kind, amount, date) in rows {
        let new = NewTransaction {
            r#type: kind,
            amount: amount.into(),
            category: "Home".into(),
            payment_method: PaymentMethod::Cash,
            date: Some(date.parse().unwrap()),
            note: None,
        };
        transactions::add(&conn, who, &acct.id, &new).unwrap();
    }
    (conn, acct.id)
}

fn list_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    list_m.clone()
}

#[test]
fn list_limit_respected() {
    let (conn, acct) = setup();
    let m = list_matches(&["sharewallet", "tx", "list", "--account", &acct, "--limit", "2"]);
    let rows = commands::transactions::query_rows(&conn, &m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date.unwrap().to_string(), "2025-01-03");
}

#[test]
fn list_filters_by_user_and_sorts_by_amount() {
    let (conn, acct) = setup();
    let m = list_matches(&[
        "sharewallet", "tx", "list", "--account", &acct, "--user", "me", "--sort", "highest",
    ]);
    let rows = commands::transactions::query_rows(&conn, &m).unwrap();
    let amounts: Vec<String> = rows.iter().map(|t| t.amount.to_string()).collect();
    assert_eq!(amounts, ["10", "5"]);

    let m = list_matches(&[
        "sharewallet", "tx", "list", "--account", &acct, "--user", "ben", "--type", "all",
    ]);
    let rows = commands::transactions::query_rows(&conn, &m).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn list_filters_by_type_and_dates() {
    let (conn, acct) = setup();
    let m = list_matches(&[
        "sharewallet", "tx", "list", "--account", &acct, "--type", "EXPENSE", "--from",
        "2025-01-02", "--sort", "oldest",
    ]);
    let rows = commands::transactions::query_rows(&conn, &m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount.to_string(), "50");
}

#[test]
fn list_rejects_unknown_user() {
    let (conn, acct) = setup();
    let m = list_matches(&["sharewallet", "tx", "list", "--account", &acct, "--user", "zoe"]);
    assert!(commands::transactions::query_rows(&conn, &m).is_err());
}
