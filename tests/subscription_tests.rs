// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sharewallet::balance::balance;
use sharewallet::db;
use sharewallet::identity::CurrentUser;
use sharewallet::models::{AccountType, Currency, NewTransaction, PaymentMethod, TransactionType};
use sharewallet::store::subscription::{subscribe_accounts, subscribe_transactions};
use sharewallet::store::{accounts, transactions, users};

fn income(amount: i64) -> NewTransaction {
    NewTransaction {
        r#type: TransactionType::Income,
        amount: Decimal::from(amount),
        category: "Salary".into(),
        payment_method: PaymentMethod::Transfer,
        date: NaiveDate::from_ymd_opt(2025, 5, 1),
        note: None,
    }
}

#[test]
fn delivers_full_snapshot_only_after_changes() {
    let conn = db::open_in_memory().unwrap();
    let ana = CurrentUser::from(&users::register(&conn, "ana").unwrap());
    let acct = accounts::create(&conn, &ana, "Main", AccountType::Individual, Currency::Eur)
        .unwrap();

    let mut feed = subscribe_transactions(&conn, &ana, &acct.id);
    let first = feed.poll().unwrap().expect("first poll always yields");
    assert!(first.items.is_empty());
    assert!(feed.poll().unwrap().is_none());

    transactions::add(&conn, &ana, &acct.id, &income(100)).unwrap();
    transactions::add(&conn, &ana, &acct.id, &income(50)).unwrap();

    let snapshots: Vec<_> = feed.by_ref().map(|s| s.unwrap()).collect();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].items.len(), 2);
    assert_eq!(balance(&snapshots[0].items), Decimal::from(150));
    assert!(snapshots[0].revision > first.revision);

    assert!(feed.next().is_none());
}

#[test]
fn non_member_subscription_sees_empty_snapshots() {
    let conn = db::open_in_memory().unwrap();
    let ana = CurrentUser::from(&users::register(&conn, "ana").unwrap());
    let eve = CurrentUser::from(&users::register(&conn, "eve").unwrap());
    let acct = accounts::create(&conn, &ana, "Main", AccountType::Individual, Currency::Eur)
        .unwrap();
    transactions::add(&conn, &ana, &acct.id, &income(10)).unwrap();

    let mut feed = subscribe_transactions(&conn, &eve, &acct.id);
    let snap = feed.poll().unwrap().unwrap();
    assert!(snap.items.is_empty());
}

#[test]
fn account_list_feed_follows_membership() {
    let conn = db::open_in_memory().unwrap();
    let ana = CurrentUser::from(&users::register(&conn, "ana").unwrap());
    let ben = CurrentUser::from(&users::register(&conn, "ben").unwrap());

    let mut feed = subscribe_accounts(&conn, &ben);
    assert!(feed.poll().unwrap().unwrap().items.is_empty());

    let trip = accounts::create(&conn, &ana, "Trip", AccountType::Group, Currency::Usd).unwrap();
    // ana's write changes the revision, but ben still sees nothing of it
    assert!(feed.poll().unwrap().unwrap().items.is_empty());

    accounts::join_by_code(&conn, &ben, trip.join_code.as_deref().unwrap()).unwrap();
    let snap = feed.poll().unwrap().unwrap();
    assert_eq!(snap.items.len(), 1);
    assert_eq!(snap.items[0].id, trip.id);

    accounts::delete(&conn, &ana, &trip.id).unwrap();
    assert!(feed.poll().unwrap().unwrap().items.is_empty());
}
