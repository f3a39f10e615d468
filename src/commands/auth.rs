// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::{self, Session};
use crate::utils::{api_client, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let username = sub.get_one::<String>("username").context("missing username")?;
            let password = sub.get_one::<String>("password").context("missing password")?;
            let client = api_client(conn, sub)?;
            let s = client.login(username, password).context("Login failed")?;
            session::save(conn, &s)?;
            tracing::info!(username = %username, "logged in");
            println!("Logged in as {}", username);
        }
        Some(("register", sub)) => {
            let username = sub.get_one::<String>("username").context("missing username")?;
            let password = sub.get_one::<String>("password").context("missing password")?;
            let email = sub.get_one::<String>("email").map(|s| s.as_str());
            let client = api_client(conn, sub)?;
            let msg = client
                .register(username, password, email)
                .context("Registration failed")?;
            println!("{}. You can now run `fintrack auth login`.", msg);
        }
        Some(("logout", _)) => {
            session::clear(conn)?;
            println!("Logged out");
        }
        Some(("refresh", sub)) => {
            let current = session::require(conn)?;
            let client = api_client(conn, sub)?;
            let renewed = client
                .refresh(&current)
                .context("Could not renew the session")?;
            session::save(conn, &renewed)?;
            println!("Access token renewed");
        }
        Some(("status", sub)) => {
            let url = crate::utils::resolve_api_url(
                conn,
                sub.get_one::<String>("api-url").map(|s| s.as_str()),
            )?;
            let rows = status_rows(session::load(conn)?.as_ref(), url);
            println!("{}", pretty_table(&["Session", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}

pub fn status_rows(session: Option<&Session>, url: String) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["Backend".to_string(), url]];
    match session {
        Some(s) => {
            rows.push(vec![
                "User".into(),
                s.username.as_deref().unwrap_or("(unknown)").into(),
            ]);
            rows.push(vec![
                "User ID".into(),
                s.user_id().map(|i| i.to_string()).unwrap_or_default(),
            ]);
            rows.push(vec![
                "Refresh token".into(),
                if s.refresh.is_some() { "yes" } else { "no" }.into(),
            ]);
        }
        None => rows.push(vec!["User".into(), "(not logged in)".into()]),
    }
    rows
}
