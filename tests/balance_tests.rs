// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sharewallet::balance::{balance, balance_by_member, balance_for_user, totals};
use sharewallet::identity::CurrentUser;
use sharewallet::models::{PaymentMethod, Transaction, TransactionType};

fn tx(user: &str, kind: TransactionType, amount: &str) -> Transaction {
    Transaction {
        id: format!("txn_{}_{}", user, amount),
        account_id: "acc_1".into(),
        user_id: user.into(),
        r#type: kind,
        amount: amount.parse().unwrap(),
        category: "Food".into(),
        payment_method: PaymentMethod::Cash,
        date: NaiveDate::from_ymd_opt(2025, 3, 1),
        note: None,
        created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    }
}

fn mixed() -> Vec<Transaction> {
    vec![
        tx("usr_a", TransactionType::Income, "1000"),
        tx("usr_b", TransactionType::Expense, "250.50"),
        tx("usr_a", TransactionType::Expense, "49.50"),
        tx("usr_b", TransactionType::Income, "20"),
    ]
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn empty_list_balances_to_zero() {
    let none: Vec<Transaction> = Vec::new();
    assert_eq!(balance(&none), Decimal::ZERO);
    assert_eq!(totals(&none).balance, Decimal::ZERO);
}

#[test]
fn income_adds_and_expense_subtracts() {
    let txns = mixed();
    assert_eq!(balance(&txns), dec("720"));

    let income: Decimal = txns
        .iter()
        .filter(|t| t.r#type == TransactionType::Income)
        .map(|t| t.amount)
        .sum();
    let expense: Decimal = txns
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense)
        .map(|t| t.amount)
        .sum();
    assert_eq!(balance(&txns), income - expense);

    let sums = totals(&txns);
    assert_eq!(sums.income, dec("1020"));
    assert_eq!(sums.expense, dec("300"));
    assert_eq!(sums.balance, balance(&txns));
}

#[test]
fn balance_is_additive_over_any_split() {
    let txns = mixed();
    for cut in 0..=txns.len() {
        let (a, b) = txns.split_at(cut);
        assert_eq!(balance(&txns), balance(a) + balance(b), "split at {}", cut);
    }
    assert_eq!(balance(&txns), balance(&txns));
}

#[test]
fn member_contributions_sum_to_balance() {
    let txns = mixed();
    let per = balance_by_member(&txns);
    assert_eq!(per["usr_a"], dec("950.50"));
    assert_eq!(per["usr_b"], dec("-230.50"));
    assert_eq!(per.values().copied().sum::<Decimal>(), balance(&txns));
}

#[test]
fn balance_for_injected_user_only_counts_their_records() {
    let txns = mixed();
    let me = CurrentUser {
        id: "usr_b".into(),
        username: "bea".into(),
    };
    assert_eq!(balance_for_user(&txns, &me), dec("-230.50"));
}
