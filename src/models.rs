// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(anyhow::anyhow!(
                "Invalid type '{}', expected income|expense",
                other
            )),
        }
    }
}

/// Needs/wants/savings meta-bucket an expense category rolls up into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetBucket {
    Needs,
    Wants,
    Savings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Income,
    HousingShelter,
    Transportation,
    ShoppingPersonalCare,
    HealthMedical,
    Entertainment,
    DebtFinance,
    SavingsInvestments,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Income,
        Category::HousingShelter,
        Category::Transportation,
        Category::ShoppingPersonalCare,
        Category::HealthMedical,
        Category::Entertainment,
        Category::DebtFinance,
        Category::SavingsInvestments,
    ];

    /// Wire name, as stored by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "income",
            Category::HousingShelter => "housing_shelter",
            Category::Transportation => "transportation",
            Category::ShoppingPersonalCare => "shopping_personal_care",
            Category::HealthMedical => "health_medical",
            Category::Entertainment => "entertainment",
            Category::DebtFinance => "debt_finance",
            Category::SavingsInvestments => "savings_investments",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Income => "Income",
            Category::HousingShelter => "Housing/Shelter",
            Category::Transportation => "Transportation",
            Category::ShoppingPersonalCare => "Shopping/Personal Care",
            Category::HealthMedical => "Health & Medical",
            Category::Entertainment => "Entertainment",
            Category::DebtFinance => "Debt & Finance",
            Category::SavingsInvestments => "Savings & Investments",
        }
    }

    pub fn bucket(&self) -> Option<BudgetBucket> {
        match self {
            Category::HousingShelter
            | Category::Transportation
            | Category::HealthMedical
            | Category::DebtFinance => Some(BudgetBucket::Needs),
            Category::ShoppingPersonalCare | Category::Entertainment => Some(BudgetBucket::Wants),
            Category::SavingsInvestments => Some(BudgetBucket::Savings),
            Category::Income => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| anyhow::anyhow!("Unknown category '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    All,
    Weekly,
    Monthly,
    Yearly,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::All => "all",
            TimeFilter::Weekly => "weekly",
            TimeFilter::Monthly => "monthly",
            TimeFilter::Yearly => "yearly",
        }
    }
}

impl FromStr for TimeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TimeFilter::All),
            "weekly" => Ok(TimeFilter::Weekly),
            "monthly" => Ok(TimeFilter::Monthly),
            "yearly" => Ok(TimeFilter::Yearly),
            other => Err(anyhow::anyhow!(
                "Invalid filter '{}', expected all|weekly|monthly|yearly",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub r#type: TxType,
    pub category: Category,
    pub date: NaiveDate,
}

/// Create/update payload for `/api/transactions/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub title: String,
    pub amount: Decimal,
    pub r#type: TxType,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
}

impl TransactionDraft {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(self.amount));
        }
        match (self.r#type, self.category) {
            (TxType::Income, c) if c != Category::Income => {
                return Err(ValidationError::IncomeCategory);
            }
            (TxType::Expense, Category::Income) => {
                return Err(ValidationError::ExpenseCategory);
            }
            _ => {}
        }
        if self.date > today {
            return Err(ValidationError::FutureDate(self.date));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

impl DashboardSummary {
    pub fn from_transactions(txs: &[Transaction]) -> Self {
        let mut s = DashboardSummary::default();
        for t in txs {
            match t.r#type {
                TxType::Income => s.income += t.amount,
                TxType::Expense => s.expenses += t.amount,
            }
        }
        s.balance = s.income - s.expenses;
        s
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightRequest {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub top_category: String,
    pub recent_transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Insight {
    pub insight: String,
}
