// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed errors for the backend client and the transaction form.
//!
//! Command handlers work in `anyhow::Result` and wrap these with context;
//! the variants exist so callers can tell an expired session apart from
//! any other failure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered 401; the stored access token is no longer valid.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("Not logged in. Run `fintrack auth login` first.")]
    NotLoggedIn,

    /// Any other non-success status. `body` holds the server's `error`
    /// field when present, else the raw body.
    #[error("Request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from backend: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Title is required.")]
    MissingTitle,

    #[error("Amount cannot be negative (got {0}).")]
    NegativeAmount(Decimal),

    #[error("Income transactions must use the 'income' category.")]
    IncomeCategory,

    #[error("Expense transactions cannot use the 'income' category.")]
    ExpenseCategory,

    #[error("Date cannot be in the future ({0}).")]
    FutureDate(NaiveDate),
}
