// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{db_path, last_synced_at, set_setting};
use crate::utils::{pretty_table, resolve_api_url};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-url", sub)) => {
            let url = sub.get_one::<String>("url").context("missing url")?;
            let url = url.trim_end_matches('/');
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("Backend URL must start with http:// or https:// (got '{}')", url);
            }
            set_setting(conn, "api_url", url)?;
            println!("Backend URL set to {}", url);
        }
        Some(("show", sub)) => {
            let url = resolve_api_url(conn, sub.get_one::<String>("api-url").map(|s| s.as_str()))?;
            let rows = vec![
                vec!["api_url".to_string(), url],
                vec!["database".to_string(), db_path()?.display().to_string()],
                vec![
                    "last_sync".to_string(),
                    last_synced_at(conn)?.unwrap_or_else(|| "never".into()),
                ],
            ];
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
