// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::models::{Category, Transaction, TxType};
use fintrack::report::FixedClock;
use fintrack::{cli, commands::exporter, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sample() -> Vec<Transaction> {
    vec![
        Transaction {
            id: 2,
            title: "Corner Shop".into(),
            amount: Decimal::new(1234, 2),
            r#type: TxType::Expense,
            category: Category::ShoppingPersonalCare,
            date: d("2025-01-02"),
        },
        Transaction {
            id: 1,
            title: "Salary".into(),
            amount: Decimal::new(2000000, 2),
            r#type: TxType::Income,
            category: Category::Income,
            date: d("2024-12-30"),
        },
    ]
}

fn cached_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    db::replace_cached_transactions(&mut conn, &sample()).unwrap();
    conn
}

fn export_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args.iter().copied());
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    export_m.clone()
}

#[test]
fn export_offline_json_is_oldest_first() {
    let mut conn = cached_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let m = export_matches(&[
        "fintrack", "export", "transactions", "--format", "json", "--out", &out_str, "--offline",
    ]);
    exporter::handle(&mut conn, &m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "date": "2024-12-30",
                "title": "Salary",
                "type": "income",
                "category": "income",
                "amount": "20000.00"
            },
            {
                "id": 2,
                "date": "2025-01-02",
                "title": "Corner Shop",
                "type": "expense",
                "category": "shopping_personal_care",
                "amount": "12.34"
            }
        ])
    );
}

#[test]
fn export_csv_honours_filter() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let m = export_matches(&[
        "fintrack", "export", "transactions", "--out", &out_str, "--filter", "weekly",
    ]);
    let Some(("transactions", sub)) = m.subcommand() else {
        panic!("no transactions subcommand");
    };
    exporter::export_transactions(&sample(), sub, &FixedClock(d("2025-01-08"))).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "title", "type", "category", "amount"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][2], "Corner Shop");
    assert_eq!(&records[0][5], "12.34");
}

#[test]
fn export_rejects_unknown_format_at_parse_time() {
    let res = cli::build_cli().try_get_matches_from([
        "fintrack",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        "x.xml",
    ]);
    assert!(res.is_err());
}
