// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions;
use crate::models::{TimeFilter, Transaction};
use crate::report::{filter_window, Clock};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let txs = transactions::load(conn, sub, sub.get_flag("offline"))?;
            export_transactions(&txs, sub, &crate::report::SystemClock)
        }
        _ => Ok(()),
    }
}

/// Write `txs` (oldest first, after `--filter`) to `--out` as csv or json.
pub fn export_transactions<C: Clock + ?Sized>(
    txs: &[Transaction],
    sub: &clap::ArgMatches,
    clock: &C,
) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".into());
    let out = sub.get_one::<String>("out").context("missing --out")?;
    let filter: TimeFilter = sub
        .get_one::<String>("filter")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or_default();

    let mut rows = filter_window(txs, filter, clock);
    rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Cannot write {}", out))?;
            wtr.write_record(["id", "date", "title", "type", "category", "amount"])?;
            for t in &rows {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.title.clone(),
                    t.r#type.to_string(),
                    t.category.to_string(),
                    t.amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date, "title": t.title, "type": t.r#type,
                        "category": t.category, "amount": t.amount.to_string()
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Cannot write {}", out))?;
        }
        _ => {
            anyhow::bail!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
