// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Login session persisted in the settings table.
//!
//! A `Session` is loaded once per invocation and handed to every API call;
//! nothing reads the tokens behind the caller's back.

use anyhow::Result;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rusqlite::Connection;

use crate::db::{delete_setting, get_setting, set_setting};
use crate::error::ApiError;

const ACCESS: &str = "access_token";
const REFRESH: &str = "refresh_token";
const USERNAME: &str = "username";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access: String,
    pub refresh: Option<String>,
    pub username: Option<String>,
}

impl Session {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access)
    }

    /// `user_id` claim of the access token, if it is a readable JWT.
    pub fn user_id(&self) -> Option<i64> {
        let payload = self.access.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        match claims.get("user_id")? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

pub fn load(conn: &Connection) -> Result<Option<Session>> {
    let Some(access) = get_setting(conn, ACCESS)? else {
        return Ok(None);
    };
    Ok(Some(Session {
        access,
        refresh: get_setting(conn, REFRESH)?,
        username: get_setting(conn, USERNAME)?,
    }))
}

pub fn require(conn: &Connection) -> Result<Session> {
    load(conn)?.ok_or_else(|| ApiError::NotLoggedIn.into())
}

pub fn save(conn: &Connection, s: &Session) -> Result<()> {
    set_setting(conn, ACCESS, &s.access)?;
    match &s.refresh {
        Some(r) => set_setting(conn, REFRESH, r)?,
        None => delete_setting(conn, REFRESH)?,
    }
    match &s.username {
        Some(u) => set_setting(conn, USERNAME, u)?,
        None => delete_setting(conn, USERNAME)?,
    }
    Ok(())
}

pub fn clear(conn: &Connection) -> Result<()> {
    for k in [ACCESS, REFRESH, USERNAME] {
        delete_setting(conn, k)?;
    }
    Ok(())
}
