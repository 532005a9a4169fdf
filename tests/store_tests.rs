// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use sharewallet::WalletError;
use sharewallet::db;
use sharewallet::identity::CurrentUser;
use sharewallet::models::{AccountType, Currency, NewTransaction, PaymentMethod, TransactionType};
use sharewallet::store::{accounts, transactions, users};

fn setup() -> (Connection, CurrentUser, CurrentUser) {
    let conn = db::open_in_memory().unwrap();
    let ana = users::register(&conn, "ana").unwrap();
    let ben = users::register(&conn, "Ben").unwrap();
    (conn, CurrentUser::from(&ana), CurrentUser::from(&ben))
}

fn expense(amount: &str, category: &str) -> NewTransaction {
    NewTransaction {
        r#type: TransactionType::Expense,
        amount: amount.parse().unwrap(),
        category: category.into(),
        payment_method: PaymentMethod::Card,
        date: NaiveDate::from_ymd_opt(2025, 2, 14),
        note: Some("  ".into()),
    }
}

#[test]
fn usernames_are_unique_and_canonical() {
    let (conn, _, ben) = setup();
    assert_eq!(ben.username, "ben");
    assert!(matches!(
        users::register(&conn, "BEN"),
        Err(WalletError::UsernameTaken(_))
    ));
    assert!(matches!(
        users::register(&conn, "x"),
        Err(WalletError::InvalidInput(_))
    ));
    assert!(users::find_by_username(&conn, "Ana").unwrap().is_some());
}

#[test]
fn owner_is_always_a_member() {
    let (conn, ana, _) = setup();
    let solo = accounts::create(&conn, &ana, "Wallet", AccountType::Individual, Currency::Eur)
        .unwrap();
    assert_eq!(solo.owner_id, ana.id);
    assert_eq!(solo.member_ids, vec![ana.id.clone()]);
    assert!(solo.join_code.is_none());

    let trip = accounts::create(&conn, &ana, "Trip", AccountType::Group, Currency::Cop).unwrap();
    let code = trip.join_code.clone().unwrap();
    assert_eq!(code.len(), accounts::JOIN_CODE_LEN);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[test]
fn non_members_read_nothing_and_cannot_write() {
    let (conn, ana, ben) = setup();
    let acct = accounts::create(&conn, &ana, "Wallet", AccountType::Individual, Currency::Usd)
        .unwrap();
    let t = transactions::add(&conn, &ana, &acct.id, &expense("9.99", "Food")).unwrap();

    assert!(accounts::get(&conn, &ben, &acct.id).unwrap().is_none());
    assert!(accounts::list_for_user(&conn, &ben).unwrap().is_empty());
    assert!(transactions::list(&conn, &ben, &acct.id).unwrap().is_empty());
    assert!(transactions::get(&conn, &ben, &t.id).unwrap().is_none());

    assert!(matches!(
        transactions::add(&conn, &ben, &acct.id, &expense("1", "Food")),
        Err(WalletError::PermissionDenied)
    ));
    assert!(matches!(
        transactions::update(&conn, &ben, &t.id, &expense("2", "Food")),
        Err(WalletError::PermissionDenied)
    ));
    assert_eq!(
        transactions::get(&conn, &ana, &t.id).unwrap().unwrap().amount,
        "9.99".parse::<Decimal>().unwrap()
    );
    assert!(matches!(
        transactions::delete(&conn, &ben, &t.id),
        Err(WalletError::PermissionDenied)
    ));
    assert!(matches!(
        accounts::rename(&conn, &ben, &acct.id, "Mine now"),
        Err(WalletError::PermissionDenied)
    ));
}

#[test]
fn joining_by_code_grants_access() {
    let (conn, ana, ben) = setup();
    let trip = accounts::create(&conn, &ana, "Trip", AccountType::Group, Currency::Eur).unwrap();
    let code = trip.join_code.clone().unwrap();

    let joined = accounts::join_by_code(&conn, &ben, &code.to_lowercase()).unwrap();
    assert_eq!(joined.member_ids, vec![ana.id.clone(), ben.id.clone()]);
    let again = accounts::join_by_code(&conn, &ben, &code).unwrap();
    assert_eq!(again.member_ids.len(), 2);

    transactions::add(&conn, &ben, &trip.id, &expense("30", "Dinner")).unwrap();
    assert_eq!(transactions::list(&conn, &ana, &trip.id).unwrap().len(), 1);

    assert!(matches!(
        accounts::join_by_code(&conn, &ben, "ZZZZZZ"),
        Err(WalletError::InvalidJoinCode(_))
    ));
    assert!(matches!(
        accounts::join_by_code(&conn, &ben, "bad"),
        Err(WalletError::InvalidJoinCode(_))
    ));
}

#[test]
fn individual_accounts_cannot_be_joined() {
    let (conn, ana, ben) = setup();
    accounts::create(&conn, &ana, "Wallet", AccountType::Individual, Currency::Eur).unwrap();
    conn.execute("UPDATE accounts SET join_code='ABC234'", [])
        .unwrap();
    assert!(matches!(
        accounts::join_by_code(&conn, &ben, "ABC234"),
        Err(WalletError::InvalidJoinCode(_))
    ));
}

#[test]
fn members_can_leave_but_owner_cannot() {
    let (conn, ana, ben) = setup();
    let trip = accounts::create(&conn, &ana, "Trip", AccountType::Group, Currency::Eur).unwrap();
    accounts::join_by_code(&conn, &ben, trip.join_code.as_deref().unwrap()).unwrap();

    assert!(matches!(
        accounts::leave(&conn, &ana, &trip.id),
        Err(WalletError::InvalidInput(_))
    ));
    accounts::leave(&conn, &ben, &trip.id).unwrap();
    assert!(accounts::get(&conn, &ben, &trip.id).unwrap().is_none());
}

#[test]
fn amounts_must_be_positive() {
    let (conn, ana, _) = setup();
    let acct = accounts::create(&conn, &ana, "Wallet", AccountType::Individual, Currency::Usd)
        .unwrap();
    for bad in ["0", "-5"] {
        assert!(matches!(
            transactions::add(&conn, &ana, &acct.id, &expense(bad, "Food")),
            Err(WalletError::InvalidAmount(_))
        ));
    }
    assert!(matches!(
        transactions::add(&conn, &ana, &acct.id, &expense("5", "  ")),
        Err(WalletError::InvalidInput(_))
    ));
}

#[test]
fn amounts_must_fit_fifteen_integer_digits() {
    let (conn, ana, _) = setup();
    let acct = accounts::create(&conn, &ana, "Wallet", AccountType::Individual, Currency::Usd)
        .unwrap();
    let top = transactions::add(&conn, &ana, &acct.id, &expense("999999999999999.99", "Rent"))
        .unwrap();

    for bad in ["1000000000000000", "12345678901234567.5"] {
        assert!(matches!(
            transactions::add(&conn, &ana, &acct.id, &expense(bad, "Food")),
            Err(WalletError::InvalidAmount(_))
        ));
    }
    assert!(matches!(
        transactions::update(&conn, &ana, &top.id, &expense("1000000000000000", "Rent")),
        Err(WalletError::InvalidAmount(_))
    ));

    let mut huge = expense("1", "Food");
    huge.amount = Decimal::MAX;
    for _ in 0..2 {
        assert!(matches!(
            transactions::add(&conn, &ana, &acct.id, &huge),
            Err(WalletError::InvalidAmount(_))
        ));
    }

    let stored = transactions::list(&conn, &ana, &acct.id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        sharewallet::balance::balance(&stored),
        -"999999999999999.99".parse::<Decimal>().unwrap()
    );
}

#[test]
fn transactions_round_trip_through_the_store() {
    let (conn, ana, _) = setup();
    let acct = accounts::create(&conn, &ana, "Wallet", AccountType::Individual, Currency::Usd)
        .unwrap();
    let t = transactions::add(&conn, &ana, &acct.id, &expense("12.50", " Food ")).unwrap();
    assert_eq!(t.amount, "12.5".parse::<Decimal>().unwrap());
    assert_eq!(t.category, "Food");
    assert_eq!(t.user_id, ana.id);
    assert_eq!(t.note, None);
    assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 2, 14));

    let mut edit = expense("40", "Rent");
    edit.r#type = TransactionType::Income;
    edit.date = None;
    edit.note = Some("refund".into());
    let updated = transactions::update(&conn, &ana, &t.id, &edit).unwrap();
    assert_eq!(updated.r#type, TransactionType::Income);
    assert_eq!(updated.amount, Decimal::from(40));
    assert_eq!(updated.date, None);
    assert_eq!(updated.note.as_deref(), Some("refund"));

    transactions::delete(&conn, &ana, &t.id).unwrap();
    assert!(transactions::get(&conn, &ana, &t.id).unwrap().is_none());
    assert!(matches!(
        transactions::delete(&conn, &ana, &t.id),
        Err(WalletError::NotFound(_))
    ));
}

#[test]
fn list_is_newest_first_with_undated_last() {
    let (conn, ana, _) = setup();
    let acct = accounts::create(&conn, &ana, "Wallet", AccountType::Individual, Currency::Usd)
        .unwrap();
    let mut old = expense("1", "A");
    old.date = NaiveDate::from_ymd_opt(2024, 12, 31);
    let mut undated = expense("2", "B");
    undated.date = None;
    transactions::add(&conn, &ana, &acct.id, &old).unwrap();
    transactions::add(&conn, &ana, &acct.id, &undated).unwrap();
    transactions::add(&conn, &ana, &acct.id, &expense("3", "C")).unwrap();

    let cats: Vec<String> = transactions::list(&conn, &ana, &acct.id)
        .unwrap()
        .into_iter()
        .map(|t| t.category)
        .collect();
    assert_eq!(cats, ["C", "A", "B"]);
}

#[test]
fn deleting_an_account_removes_its_transactions_first() {
    let (conn, ana, ben) = setup();
    let trip = accounts::create(&conn, &ana, "Trip", AccountType::Group, Currency::Eur).unwrap();
    accounts::join_by_code(&conn, &ben, trip.join_code.as_deref().unwrap()).unwrap();
    transactions::add(&conn, &ana, &trip.id, &expense("10", "Fuel")).unwrap();
    transactions::add(&conn, &ben, &trip.id, &expense("20", "Food")).unwrap();

    assert!(matches!(
        accounts::delete(&conn, &ben, &trip.id),
        Err(WalletError::PermissionDenied)
    ));
    assert_eq!(accounts::delete(&conn, &ana, &trip.id).unwrap(), 2);

    let left: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE account_id=?1",
            params![trip.id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(left, 0);
    assert!(accounts::get(&conn, &ana, &trip.id).unwrap().is_none());
    assert!(matches!(
        accounts::delete(&conn, &ana, &trip.id),
        Err(WalletError::NotFound(_))
    ));
}
