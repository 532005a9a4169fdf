// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

pub fn find_issues(conn: &Connection) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    // 1) Owner missing from the member set
    let mut stmt = conn.prepare(
        "SELECT a.id, a.owner_id FROM accounts a
         WHERE NOT EXISTS (
             SELECT 1 FROM account_members m WHERE m.account_id=a.id AND m.user_id=a.owner_id
         )",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let owner: String = r.get(1)?;
        issues.push(Issue {
            kind: "owner_not_member",
            detail: format!("{} owner {}", id, owner),
        });
    }

    // 2) Join codes only on group accounts, and always there
    let mut stmt2 = conn.prepare(
        "SELECT id, type FROM accounts
         WHERE (type='GROUP' AND join_code IS NULL) OR (type='INDIVIDUAL' AND join_code IS NOT NULL)",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: String = r.get(0)?;
        let typ: String = r.get(1)?;
        let kind = if typ == "GROUP" {
            "group_without_join_code"
        } else {
            "individual_with_join_code"
        };
        issues.push(Issue {
            kind,
            detail: id,
        });
    }

    // 3) Amounts must be positive decimals
    let mut stmt3 = conn.prepare("SELECT id, amount FROM transactions ORDER BY id")?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: String = r.get(0)?;
        let amount: String = r.get(1)?;
        match amount.parse::<Decimal>() {
            Ok(d) if d > Decimal::ZERO => {}
            Ok(_) => issues.push(Issue {
                kind: "non_positive_amount",
                detail: format!("{} {}", id, amount),
            }),
            Err(_) => issues.push(Issue {
                kind: "unparsable_amount",
                detail: format!("{} '{}'", id, amount),
            }),
        }
    }

    for issue in &issues {
        log::warn!("doctor: {} {}", issue.kind, issue.detail);
    }
    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
