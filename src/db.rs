// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Transaction;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fintrack", "fintrack"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintrack.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    open_at(&db_path()?)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- Snapshot of the last list fetched from the backend, for --offline use.
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category TEXT NOT NULL,
        date TEXT NOT NULL,
        synced_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    "#,
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

/// Replace the cached snapshot with `txs` in one transaction.
pub fn replace_cached_transactions(conn: &mut Connection, txs: &[Transaction]) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM transactions", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions(id, title, amount, type, category, date, synced_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for t in txs {
            stmt.execute(params![
                t.id,
                t.title,
                t.amount.to_string(),
                t.r#type.as_str(),
                t.category.as_str(),
                t.date,
                now
            ])?;
        }
    }
    tx.commit()?;
    tracing::debug!(count = txs.len(), "transaction cache replaced");
    Ok(())
}

pub fn cached_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, amount, type, category, date FROM transactions
         ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, NaiveDate>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, title, amount, ty, category, date) = row?;
        let amount = amount
            .parse::<Decimal>()
            .with_context(|| format!("Invalid cached amount '{}' for #{}", amount, id))?;
        out.push(Transaction {
            id,
            title,
            amount,
            r#type: ty.parse()?,
            category: category.parse()?,
            date,
        });
    }
    Ok(out)
}

pub fn last_synced_at(conn: &Connection) -> Result<Option<String>> {
    let v = conn.query_row("SELECT MAX(synced_at) FROM transactions", [], |r| {
        r.get::<_, Option<String>>(0)
    })?;
    Ok(v)
}
