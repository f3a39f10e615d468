// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions;
use crate::models::{DashboardSummary, TimeFilter};
use crate::report::{aggregate, filter_window, top_category_change, DerivedReport, SystemClock};
use crate::session;
use crate::utils::{api_client, fmt_money, fmt_pct, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("analytics", sub)) => analytics(conn, sub)?,
        Some(("top-change", sub)) => top_change(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn filter_of(sub: &clap::ArgMatches) -> Result<TimeFilter> {
    Ok(sub
        .get_one::<String>("filter")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or_default())
}

#[derive(Serialize)]
struct SummaryOut {
    filter: TimeFilter,
    filtered: DashboardSummary,
    /// Backend's all-time figures; absent when offline.
    server: Option<DashboardSummary>,
}

fn summary(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let offline = sub.get_flag("offline");
    let filter = filter_of(sub)?;

    let server = if offline {
        None
    } else {
        let s = session::require(conn)?;
        let client = api_client(conn, sub)?;
        Some(
            client
                .dashboard_summary(&s)
                .context("Failed to fetch dashboard summary")?,
        )
    };
    let txs = transactions::load(conn, sub, offline)?;
    let filtered = DashboardSummary::from_transactions(&filter_window(&txs, filter, &SystemClock));

    let out = SummaryOut {
        filter,
        filtered,
        server,
    };
    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        let srv = out.server.as_ref();
        let server_cell =
            |v: Option<Decimal>| v.map(|d| fmt_money(&d)).unwrap_or_else(|| "-".into());
        let rows = vec![
            vec![
                "Income".to_string(),
                fmt_money(&out.filtered.income),
                server_cell(srv.map(|s| s.income)),
            ],
            vec![
                "Expenses".to_string(),
                fmt_money(&out.filtered.expenses),
                server_cell(srv.map(|s| s.expenses)),
            ],
            vec![
                "Balance".to_string(),
                fmt_money(&out.filtered.balance),
                server_cell(srv.map(|s| s.balance)),
            ],
        ];
        let hdr = format!("Window ({})", filter.as_str());
        println!("{}", pretty_table(&["", &hdr, "All time (server)"], rows));
    }
    Ok(())
}

fn analytics(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = filter_of(sub)?;
    let txs = transactions::load(conn, sub, sub.get_flag("offline"))?;
    let report = aggregate(&txs, filter, &SystemClock);
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        print_report(&report);
    }
    Ok(())
}

fn print_report(r: &DerivedReport) {
    let overview = vec![
        vec!["Income".into(), fmt_money(&r.total_income)],
        vec!["Expenses".into(), fmt_money(&r.total_expense)],
        vec!["Net savings".into(), fmt_money(&r.net_savings)],
        vec!["Savings rate".into(), fmt_pct(&r.savings_rate)],
        vec!["Needs (fixed)".into(), fmt_money(&r.budget_split.needs)],
        vec!["Wants (variable)".into(), fmt_money(&r.budget_split.wants)],
        vec!["Savings & investments".into(), fmt_money(&r.budget_split.savings)],
    ];
    println!("{}", pretty_table(&["Overview", r.filter.as_str()], overview));

    if r.category_breakdown.is_empty() {
        println!("No expenses yet.");
    } else {
        let rows = r
            .category_breakdown
            .iter()
            .map(|c| {
                vec![
                    c.category.label().to_string(),
                    fmt_money(&c.amount),
                    fmt_pct(&c.percentage),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    }

    if r.trend_series.is_empty() {
        println!("No data available");
    } else {
        let rows = r
            .trend_series
            .iter()
            .map(|p| {
                vec![
                    p.bucket_label.clone(),
                    fmt_money(&p.income),
                    fmt_money(&p.expense),
                ]
            })
            .collect();
        let hdr = if r.filter.daily_buckets() { "Day" } else { "Month" };
        println!("{}", pretty_table(&[hdr, "Income", "Expense"], rows));
    }
}

fn top_change(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txs = transactions::load(conn, sub, sub.get_flag("offline"))?;
    let change = top_category_change(&txs, &SystemClock);
    if maybe_print_json(json_flag, jsonl_flag, &change)? {
        return Ok(());
    }
    match change {
        Some(c) => {
            let rows = vec![vec![
                c.category.label().to_string(),
                fmt_money(&c.current_amount),
                fmt_money(&c.previous_amount),
                format!(
                    "{}% {}",
                    c.percent_change.abs().round_dp(0),
                    if c.is_higher { "more" } else { "less" }
                ),
            ]];
            println!(
                "{}",
                pretty_table(&["Top category", "This month", "Last month", "Change"], rows)
            );
        }
        None => println!("No expenses recorded this month yet."),
    }
    Ok(())
}
