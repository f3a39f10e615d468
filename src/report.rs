// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client-side reporting over a transaction list.
//!
//! Everything here is a pure function of the transactions, the selected
//! [`TimeFilter`] and the date supplied by a [`Clock`]. Reports are rebuilt
//! from scratch on every call and never stored.

use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{BudgetBucket, Category, TimeFilter, Transaction, TxType};

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the machine running the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl TimeFilter {
    /// Last date dropped by this filter, or `None` when nothing is dropped.
    /// Weekly keeps today and the six days before it. Month arithmetic clamps to the end of shorter months (Mar 31 -> Feb 28).
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        let c = match self {
            TimeFilter::All => return None,
            TimeFilter::Weekly => today.checked_sub_signed(Duration::days(7)),
            TimeFilter::Monthly => today.checked_sub_months(Months::new(1)),
            TimeFilter::Yearly => today.checked_sub_months(Months::new(12)),
        };
        Some(c.unwrap_or(NaiveDate::MIN))
    }

    /// Daily buckets for the short windows, monthly otherwise.
    pub fn daily_buckets(&self) -> bool {
        matches!(self, TimeFilter::Weekly | TimeFilter::Monthly)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub bucket_key: String,
    pub bucket_label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetSplit {
    pub needs: Decimal,
    pub wants: Decimal,
    pub savings: Decimal,
}

impl BudgetSplit {
    fn add(&mut self, bucket: BudgetBucket, amount: Decimal) {
        match bucket {
            BudgetBucket::Needs => self.needs += amount,
            BudgetBucket::Wants => self.wants += amount,
            BudgetBucket::Savings => self.savings += amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedReport {
    pub filter: TimeFilter,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_savings: Decimal,
    pub savings_rate: Decimal,
    pub category_breakdown: Vec<CategoryShare>,
    pub trend_series: Vec<TrendPoint>,
    pub budget_split: BudgetSplit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategoryChange {
    pub category: Category,
    pub current_amount: Decimal,
    pub previous_amount: Decimal,
    pub percent_change: Decimal,
    pub is_higher: bool,
}

pub fn filter_window<C: Clock + ?Sized>(
    transactions: &[Transaction],
    filter: TimeFilter,
    clock: &C,
) -> Vec<Transaction> {
    match filter.cutoff(clock.today()) {
        None => transactions.to_vec(),
        Some(cutoff) => transactions
            .iter()
            .filter(|t| t.date > cutoff)
            .cloned()
            .collect(),
    }
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * Decimal::ONE_HUNDRED
    }
}

fn bucket_for(date: NaiveDate, daily: bool) -> (String, String) {
    if daily {
        (
            date.format("%Y-%m-%d").to_string(),
            date.format("%b %d").to_string(),
        )
    } else {
        (
            date.format("%Y-%m").to_string(),
            date.format("%b %Y").to_string(),
        )
    }
}

/// Sums expenses per category, keeping the order categories first appear in.
fn expenses_by_category<'a, I>(txs: I) -> Vec<(Category, Decimal)>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut order: Vec<(Category, Decimal)> = Vec::new();
    let mut index: HashMap<Category, usize> = HashMap::new();
    for t in txs {
        if t.r#type != TxType::Expense {
            continue;
        }
        let i = *index.entry(t.category).or_insert_with(|| {
            order.push((t.category, Decimal::ZERO));
            order.len() - 1
        });
        order[i].1 += t.amount;
    }
    order
}

pub fn aggregate<C: Clock + ?Sized>(
    transactions: &[Transaction],
    filter: TimeFilter,
    clock: &C,
) -> DerivedReport {
    let kept = filter_window(transactions, filter, clock);
    let daily = filter.daily_buckets();

    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut split = BudgetSplit::default();
    // key -> (label, income, expense)
    let mut buckets: BTreeMap<String, (String, Decimal, Decimal)> = BTreeMap::new();

    for t in &kept {
        let (key, label) = bucket_for(t.date, daily);
        let entry = buckets
            .entry(key)
            .or_insert((label, Decimal::ZERO, Decimal::ZERO));
        match t.r#type {
            TxType::Income => {
                income += t.amount;
                entry.1 += t.amount;
            }
            TxType::Expense => {
                expense += t.amount;
                entry.2 += t.amount;
                if let Some(b) = t.category.bucket() {
                    split.add(b, t.amount);
                }
            }
        }
    }

    let mut breakdown: Vec<CategoryShare> = expenses_by_category(&kept)
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            percentage: percent_of(amount, expense),
        })
        .collect();
    // stable: equal amounts keep first-seen order
    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));

    let trend_series = buckets
        .into_iter()
        .map(|(bucket_key, (bucket_label, income, expense))| TrendPoint {
            bucket_key,
            bucket_label,
            income,
            expense,
        })
        .collect();

    let net = income - expense;
    DerivedReport {
        filter,
        total_income: income,
        total_expense: expense,
        net_savings: net,
        savings_rate: percent_of(net, income),
        category_breakdown: breakdown,
        trend_series,
        budget_split: split,
    }
}

fn same_month(d: NaiveDate, anchor: NaiveDate) -> bool {
    d.year() == anchor.year() && d.month() == anchor.month()
}

/// Compares this month's biggest expense category with the same category
/// last month. Works on the unfiltered list.
pub fn top_category_change<C: Clock + ?Sized>(
    transactions: &[Transaction],
    clock: &C,
) -> Option<TopCategoryChange> {
    let today = clock.today();
    let this_month = today.with_day(1)?;
    let last_month = this_month.checked_sub_months(Months::new(1))?;

    let current = expenses_by_category(
        transactions
            .iter()
            .filter(|t| same_month(t.date, this_month)),
    );
    let mut top: Option<(Category, Decimal)> = None;
    for (cat, amount) in current {
        let best = top.map(|(_, a)| a).unwrap_or(Decimal::ZERO);
        if amount > best {
            top = Some((cat, amount));
        }
    }
    let (category, current_amount) = top?;

    let previous_amount = transactions
        .iter()
        .filter(|t| {
            t.r#type == TxType::Expense
                && t.category == category
                && same_month(t.date, last_month)
        })
        .map(|t| t.amount)
        .sum::<Decimal>();

    let percent_change = if previous_amount.is_zero() {
        Decimal::ONE_HUNDRED
    } else {
        (current_amount - previous_amount) / previous_amount * Decimal::ONE_HUNDRED
    };

    Some(TopCategoryChange {
        category,
        current_amount,
        previous_amount,
        percent_change,
        is_higher: percent_change > Decimal::ZERO,
    })
}
