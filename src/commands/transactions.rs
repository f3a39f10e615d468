// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::db;
use crate::models::{Category, TimeFilter, Transaction, TransactionDraft, TxType};
use crate::report::{filter_window, Clock, SystemClock};
use crate::session::{self, Session};
use crate::utils::{api_client, fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("sync", sub)) => {
            let txs = load(conn, sub, false)?;
            println!("Cached {} transactions", txs.len());
        }
        _ => {}
    }
    Ok(())
}

/// Transactions for a read-only command: the cached snapshot when `offline`,
/// otherwise a fresh fetch that also replaces the snapshot.
pub fn load(conn: &mut Connection, m: &clap::ArgMatches, offline: bool) -> Result<Vec<Transaction>> {
    if offline {
        let txs = db::cached_transactions(conn)?;
        tracing::info!(count = txs.len(), "using cached transactions");
        return Ok(txs);
    }
    let session = session::require(conn)?;
    let client = api_client(conn, m)?;
    refresh_cache(conn, &client, &session)
}

fn refresh_cache(
    conn: &mut Connection,
    client: &ApiClient,
    session: &Session,
) -> Result<Vec<Transaction>> {
    let txs = client
        .list_transactions(session)
        .context("Failed to fetch transactions")?;
    db::replace_cached_transactions(conn, &txs)?;
    Ok(txs)
}

/// Build a create/update payload from command-line values. Fields not given
/// fall back to `base` (edit) or to defaults (add): the type follows the
/// category, the date is today.
pub fn draft_from_args(
    sub: &clap::ArgMatches,
    base: Option<&Transaction>,
    today: chrono::NaiveDate,
) -> Result<TransactionDraft> {
    let title = match (sub.get_one::<String>("title"), base) {
        (Some(t), _) => t.clone(),
        (None, Some(b)) => b.title.clone(),
        (None, None) => String::new(),
    };
    let amount = match (sub.get_one::<String>("amount"), base) {
        (Some(a), _) => parse_decimal(a)?,
        (None, Some(b)) => b.amount,
        (None, None) => anyhow::bail!("--amount is required"),
    };
    let category = match (sub.get_one::<String>("category"), base) {
        (Some(c), _) => c.parse::<Category>()?,
        (None, Some(b)) => b.category,
        (None, None) => anyhow::bail!("--category is required"),
    };
    let r#type = match (sub.get_one::<String>("type"), base) {
        (Some(t), _) => t.parse::<TxType>()?,
        (None, Some(b)) if sub.get_one::<String>("category").is_none() => b.r#type,
        _ if category == Category::Income => TxType::Income,
        _ => TxType::Expense,
    };
    let date = match (sub.get_one::<String>("date"), base) {
        (Some(d), _) => parse_date(d)?,
        (None, Some(b)) => b.date,
        (None, None) => today,
    };
    Ok(TransactionDraft {
        title,
        amount,
        r#type,
        category,
        date,
        user: None,
    })
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = SystemClock.today();
    let session = session::require(conn)?;
    let client = api_client(conn, sub)?;
    let mut draft = draft_from_args(sub, None, today)?;
    draft.validate(today)?;
    draft.user = session.user_id();

    let created = client
        .create_transaction(&session, &draft)
        .context("Failed to add transaction")?;
    println!(
        "Recorded #{} {} {} on {} ({})",
        created.id,
        created.r#type,
        fmt_money(&created.amount),
        created.date,
        created.category.label()
    );
    refresh_cache(conn, &client, &session)?;
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("missing id")?;
    let today = SystemClock.today();
    let session = session::require(conn)?;
    let client = api_client(conn, sub)?;
    let current = client
        .get_transaction(&session, id)
        .with_context(|| format!("Failed to load transaction #{}", id))?;
    let mut draft = draft_from_args(sub, Some(&current), today)?;
    draft.validate(today)?;
    draft.user = session.user_id();

    let updated = client
        .update_transaction(&session, id, &draft)
        .with_context(|| format!("Failed to update transaction #{}", id))?;
    println!("Updated #{} '{}'", updated.id, updated.title);
    refresh_cache(conn, &client, &session)?;
    Ok(())
}

fn remove(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("missing id")?;
    let session = session::require(conn)?;
    let client = api_client(conn, sub)?;
    client
        .delete_transaction(&session, id)
        .with_context(|| format!("Failed to delete transaction #{}", id))?;
    println!("Deleted transaction #{}", id);
    refresh_cache(conn, &client, &session)?;
    Ok(())
}

fn list(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txs = load(conn, sub, sub.get_flag("offline"))?;
    let data = query_rows(&txs, sub, &SystemClock)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.title.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Title", "Type", "Category", "Amount"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
}

/// Newest first, after applying `--filter` and `--limit`.
pub fn query_rows<C: Clock + ?Sized>(
    txs: &[Transaction],
    sub: &clap::ArgMatches,
    clock: &C,
) -> Result<Vec<TransactionRow>> {
    let filter: TimeFilter = sub
        .get_one::<String>("filter")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or_default();
    let mut kept = filter_window(txs, filter, clock);
    kept.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        kept.truncate(*limit);
    }
    Ok(kept
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            title: t.title,
            r#type: t.r#type.to_string(),
            category: t.category.label().to_string(),
            amount: format!("{:.2}", t.amount),
        })
        .collect())
}
