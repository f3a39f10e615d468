// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions;
use crate::models::{DashboardSummary, InsightRequest, Transaction};
use crate::report::{top_category_change, SystemClock, TopCategoryChange};
use crate::session;
use crate::utils::{api_client, fmt_money};
use anyhow::{Context, Result};
use rusqlite::Connection;

const RECENT: usize = 5;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    // Insight always looks at the full history, like the dashboard widget.
    let txs = transactions::load(conn, m, m.get_flag("offline"))?;

    let stat = top_category_change(&txs, &SystemClock);
    if let Some(c) = &stat {
        println!(
            "Top spending this month: {} ({}), {}% {} than last month.",
            c.category.label(),
            fmt_money(&c.current_amount),
            c.percent_change.abs().round_dp(0),
            if c.is_higher { "more" } else { "less" }
        );
    }

    let req = build_request(&txs, stat.as_ref());
    let session = session::require(conn)?;
    let client = api_client(conn, m)?;
    let insight = client
        .ai_insight(&session, &req)
        .context("Failed to generate insights. Make sure the backend AI endpoint is running.")?;
    println!();
    println!("{}", insight.insight.trim());
    Ok(())
}

/// Payload for `/api/ai-insights/`: all-time totals, the wire key of this
/// month's top category and the five newest transactions. An empty history
/// still produces a request with zero totals and `"N/A"`.
pub fn build_request(txs: &[Transaction], stat: Option<&TopCategoryChange>) -> InsightRequest {
    let totals = DashboardSummary::from_transactions(txs);
    let mut recent = txs.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    recent.truncate(RECENT);
    InsightRequest {
        total_income: totals.income,
        total_expense: totals.expenses,
        top_category: stat
            .map(|c| c.category.as_str().to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        recent_transactions: recent,
    }
}

