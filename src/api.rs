// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the tracker backend.
//!
//! Every call is a single request/response. There is no retry, caching or
//! token refresh behind the caller's back; authenticated calls take the
//! [`Session`] explicitly.

use anyhow::Result;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::models::{DashboardSummary, Insight, InsightRequest, Transaction, TransactionDraft};
use crate::session::Session;
use crate::utils::http_client;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Deserialize)]
struct TokenPair {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    message: Option<String>,
}

pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(ApiClient {
            base: base_url.trim_end_matches('/').to_string(),
            http: http_client()?,
        })
    }

    pub fn with_http(base_url: &str, http: Client) -> Self {
        ApiClient {
            base: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// `path` is relative to `/api/` and keeps the backend's trailing slash.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base, path.trim_start_matches('/'))
    }

    fn send(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let resp = req.send()?;
        let status = resp.status();
        let text = resp.text()?;
        tracing::debug!(status = status.as_u16(), bytes = text.len(), "backend response");
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                body: error_message(&text),
            });
        }
        Ok(text)
    }

    fn authed(&self, req: RequestBuilder, session: &Session) -> RequestBuilder {
        req.header(AUTHORIZATION, session.bearer())
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let url = self.url("token/");
        tracing::debug!(%url, username, "login");
        let body = json!({ "username": username, "password": password });
        let text = match self.send(self.http.post(&url).json(&body)) {
            Err(ApiError::SessionExpired) => {
                return Err(ApiError::Rejected {
                    status: 401,
                    body: "Invalid username or password".into(),
                });
            }
            other => other?,
        };
        let pair: TokenPair = decode(&text)?;
        Ok(Session {
            access: pair.access,
            refresh: pair.refresh,
            username: Some(username.to_string()),
        })
    }

    /// Exchange the refresh token for a new access token.
    pub fn refresh(&self, session: &Session) -> Result<Session, ApiError> {
        let refresh = session.refresh.as_deref().ok_or(ApiError::SessionExpired)?;
        let url = self.url("token/refresh/");
        tracing::debug!(%url, "refresh access token");
        let text = self.send(self.http.post(&url).json(&json!({ "refresh": refresh })))?;
        let pair: TokenPair = decode(&text)?;
        Ok(Session {
            access: pair.access,
            refresh: pair.refresh.or_else(|| session.refresh.clone()),
            username: session.username.clone(),
        })
    }

    pub fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<String, ApiError> {
        let url = self.url("register/");
        tracing::debug!(%url, username, "register");
        let body = json!({ "username": username, "password": password, "email": email });
        let text = self.send(self.http.post(&url).json(&body))?;
        let msg: Message = decode(&text)?;
        Ok(msg
            .message
            .unwrap_or_else(|| "User created successfully".to_string()))
    }

    pub fn list_transactions(&self, session: &Session) -> Result<Vec<Transaction>, ApiError> {
        let url = self.url("transactions/");
        tracing::debug!(%url, "list transactions");
        let text = self.send(self.authed(self.http.get(&url), session))?;
        decode(&text)
    }

    pub fn get_transaction(&self, session: &Session, id: i64) -> Result<Transaction, ApiError> {
        let url = self.url(&format!("transactions/{}/", id));
        let text = self.send(self.authed(self.http.get(&url), session))?;
        decode(&text)
    }

    pub fn create_transaction(
        &self,
        session: &Session,
        draft: &TransactionDraft,
    ) -> Result<Transaction, ApiError> {
        let url = self.url("transactions/");
        tracing::debug!(%url, title = %draft.title, "create transaction");
        let text = self.send(self.authed(self.http.post(&url).json(draft), session))?;
        decode(&text)
    }

    pub fn update_transaction(
        &self,
        session: &Session,
        id: i64,
        draft: &TransactionDraft,
    ) -> Result<Transaction, ApiError> {
        let url = self.url(&format!("transactions/{}/", id));
        tracing::debug!(%url, "update transaction");
        let text = self.send(self.authed(self.http.put(&url).json(draft), session))?;
        decode(&text)
    }

    pub fn delete_transaction(&self, session: &Session, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("transactions/{}/", id));
        tracing::debug!(%url, "delete transaction");
        self.send(self.authed(self.http.delete(&url), session))?;
        Ok(())
    }

    pub fn dashboard_summary(&self, session: &Session) -> Result<DashboardSummary, ApiError> {
        let url = self.url("dashboard/");
        let text = self.send(self.authed(self.http.get(&url), session))?;
        decode(&text)
    }

    pub fn ai_insight(
        &self,
        session: &Session,
        req: &InsightRequest,
    ) -> Result<Insight, ApiError> {
        let url = self.url("ai-insights/");
        tracing::debug!(%url, top = %req.top_category, "request insight");
        let text = self.send(self.authed(self.http.post(&url).json(req), session))?;
        decode(&text)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(text)?)
}

/// Human-readable message from an error body: `error`, then DRF's `detail`,
/// then the body itself.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(v) => {
            for key in ["error", "detail"] {
                if let Some(s) = v.get(key).and_then(|e| e.as_str()) {
                    return s.to_string();
                }
            }
            v.to_string()
        }
        Err(_) => body.trim().to_string(),
    }
}
