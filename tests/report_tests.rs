// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::models::{Category, TimeFilter, Transaction, TxType};
use fintrack::report::{
    aggregate, filter_window, top_category_change, BudgetSplit, CategoryShare, FixedClock,
};
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(id: i64, amount: &str, category: Category, on: &str) -> Transaction {
    let r#type = if category == Category::Income {
        TxType::Income
    } else {
        TxType::Expense
    };
    Transaction {
        id,
        title: format!("t{}", id),
        amount: dec(amount),
        r#type,
        category,
        date: date(on),
    }
}

fn clock() -> FixedClock {
    FixedClock(date("2025-06-15"))
}

#[test]
fn salary_rent_and_fun() {
    let txs = vec![
        tx(1, "1000", Category::Income, "2025-06-01"),
        tx(2, "300", Category::HousingShelter, "2025-06-01"),
        tx(3, "200", Category::Entertainment, "2025-06-01"),
    ];
    let r = aggregate(&txs, TimeFilter::All, &clock());

    assert_eq!(r.total_income, dec("1000"));
    assert_eq!(r.total_expense, dec("500"));
    assert_eq!(r.net_savings, dec("500"));
    assert_eq!(r.savings_rate, dec("50"));

    assert_eq!(r.category_breakdown.len(), 2);
    assert_eq!(r.category_breakdown[0].category, Category::HousingShelter);
    assert_eq!(r.category_breakdown[0].amount, dec("300"));
    assert_eq!(r.category_breakdown[0].percentage, dec("60"));
    assert_eq!(r.category_breakdown[1].category, Category::Entertainment);
    assert_eq!(r.category_breakdown[1].amount, dec("200"));
    assert_eq!(r.category_breakdown[1].percentage, dec("40"));

    assert_eq!(
        r.budget_split,
        BudgetSplit {
            needs: dec("300"),
            wants: dec("200"),
            savings: Decimal::ZERO,
        }
    );

    assert_eq!(r.trend_series.len(), 1);
    assert_eq!(r.trend_series[0].bucket_key, "2025-06");
    assert_eq!(r.trend_series[0].bucket_label, "Jun 2025");
    assert_eq!(r.trend_series[0].income, dec("1000"));
    assert_eq!(r.trend_series[0].expense, dec("500"));
}

#[test]
fn empty_list_yields_zeroes() {
    let r = aggregate(&[], TimeFilter::Monthly, &clock());
    assert!(r.total_income.is_zero());
    assert!(r.total_expense.is_zero());
    assert!(r.net_savings.is_zero());
    assert!(r.savings_rate.is_zero());
    assert!(r.category_breakdown.is_empty());
    assert!(r.trend_series.is_empty());
    assert_eq!(r.budget_split, BudgetSplit::default());
}

#[test]
fn unmapped_category_counts_in_totals_but_not_split() {
    // An expense tagged `income` has no needs/wants/savings bucket.
    let txs = vec![Transaction {
        r#type: TxType::Expense,
        ..tx(1, "75.25", Category::Income, "2025-06-10")
    }];
    let r = aggregate(&txs, TimeFilter::All, &clock());
    assert_eq!(r.total_expense, dec("75.25"));
    assert_eq!(r.category_breakdown.len(), 1);
    assert_eq!(r.category_breakdown[0].category, Category::Income);
    assert_eq!(r.category_breakdown[0].percentage, dec("100"));
    assert_eq!(r.budget_split, BudgetSplit::default());
    // no income: rate guarded, net is negative
    assert!(r.savings_rate.is_zero());
    assert_eq!(r.net_savings, dec("-75.25"));
}

#[test]
fn income_only_has_zero_percentages() {
    let txs = vec![tx(1, "500", Category::Income, "2025-06-02")];
    let r = aggregate(&txs, TimeFilter::All, &clock());
    assert!(r.category_breakdown.is_empty());
    assert_eq!(r.savings_rate, dec("100"));
}

#[test]
fn breakdown_ties_keep_first_seen_order_and_percentages_sum_to_100() {
    let txs = vec![
        tx(1, "10", Category::Transportation, "2025-06-01"),
        tx(2, "10", Category::ShoppingPersonalCare, "2025-06-02"),
        tx(3, "10", Category::HealthMedical, "2025-06-03"),
        tx(4, "25", Category::SavingsInvestments, "2025-06-04"),
    ];
    let r = aggregate(&txs, TimeFilter::All, &clock());
    let cats: Vec<_> = r.category_breakdown.iter().map(|c| c.category).collect();
    assert_eq!(
        cats,
        vec![
            Category::SavingsInvestments,
            Category::Transportation,
            Category::ShoppingPersonalCare,
            Category::HealthMedical,
        ]
    );
    let sum: Decimal = r.category_breakdown.iter().map(|c| c.percentage).sum();
    assert!((sum - dec("100")).abs() < dec("0.0001"), "sum was {}", sum);
    assert_eq!(r.budget_split.savings, dec("25"));
    assert_eq!(r.budget_split.needs, dec("20"));
    assert_eq!(r.budget_split.wants, dec("10"));
}

#[test]
fn net_is_income_minus_expense() {
    let txs = vec![
        tx(1, "1234.56", Category::Income, "2024-12-31"),
        tx(2, "99.99", Category::DebtFinance, "2025-01-15"),
        tx(3, "0.01", Category::Entertainment, "2025-03-01"),
        tx(4, "300", Category::Income, "2025-05-05"),
    ];
    for f in [
        TimeFilter::All,
        TimeFilter::Weekly,
        TimeFilter::Monthly,
        TimeFilter::Yearly,
    ] {
        let r = aggregate(&txs, f, &clock());
        assert_eq!(r.total_income - r.total_expense, r.net_savings, "{:?}", f);
    }
}

#[test]
fn all_filter_keeps_everything() {
    let txs = vec![
        tx(1, "1", Category::Income, "1999-01-01"),
        tx(2, "2", Category::Transportation, "2025-06-15"),
        tx(3, "3", Category::Entertainment, "2030-01-01"),
    ];
    assert_eq!(filter_window(&txs, TimeFilter::All, &clock()), txs);
}

#[test]
fn windows_drop_the_cutoff_date_and_earlier() {
    let txs = vec![
        tx(1, "1", Category::Transportation, "2025-06-09"),
        tx(2, "1", Category::Transportation, "2025-06-08"), // today - 7
        tx(3, "1", Category::Transportation, "2025-05-16"),
        tx(4, "1", Category::Transportation, "2025-05-15"), // today - 1 month
        tx(5, "1", Category::Transportation, "2024-06-16"),
        tx(6, "1", Category::Transportation, "2024-06-15"), // today - 1 year
    ];
    let ids = |f| -> Vec<i64> {
        filter_window(&txs, f, &clock())
            .into_iter()
            .map(|t| t.id)
            .collect()
    };
    assert_eq!(ids(TimeFilter::Weekly), vec![1]);
    assert_eq!(ids(TimeFilter::Monthly), vec![1, 2, 3]);
    assert_eq!(ids(TimeFilter::Yearly), vec![1, 2, 3, 4, 5]);
}

#[test]
fn weekly_window_spans_seven_days() {
    let txs: Vec<Transaction> = (6..=15i64)
        .map(|day| tx(day, "10", Category::Entertainment, &format!("2025-06-{:02}", day)))
        .collect();
    let kept = filter_window(&txs, TimeFilter::Weekly, &clock());
    assert_eq!(kept.len(), 7);
    assert_eq!(kept[0].date, date("2025-06-09"));

    let r = aggregate(&txs, TimeFilter::Weekly, &clock());
    assert_eq!(r.trend_series.len(), 7);
    assert_eq!(r.total_expense, dec("70"));
}

#[test]
fn zero_expense_rows_get_zero_percentage() {
    let txs = vec![tx(1, "0", Category::Entertainment, "2025-06-10")];
    let r = aggregate(&txs, TimeFilter::All, &clock());
    assert_eq!(
        r.category_breakdown,
        vec![CategoryShare {
            category: Category::Entertainment,
            amount: Decimal::ZERO,
            percentage: Decimal::ZERO,
        }]
    );
    assert!(r.savings_rate.is_zero());
}

#[test]
fn short_windows_bucket_by_day_long_windows_by_month() {
    let txs = vec![
        tx(1, "50", Category::Entertainment, "2025-06-14"),
        tx(2, "800", Category::Income, "2025-06-10"),
        tx(3, "20", Category::Entertainment, "2025-06-14"),
        tx(4, "40", Category::Transportation, "2025-05-20"),
        tx(5, "60", Category::Transportation, "2024-11-02"),
    ];

    let weekly = aggregate(&txs, TimeFilter::Weekly, &clock());
    let keys: Vec<_> = weekly.trend_series.iter().map(|p| p.bucket_key.as_str()).collect();
    assert_eq!(keys, vec!["2025-06-10", "2025-06-14"]);
    assert_eq!(weekly.trend_series[1].expense, dec("70"));
    assert_eq!(weekly.trend_series[1].bucket_label, "Jun 14");

    let monthly = aggregate(&txs, TimeFilter::Monthly, &clock());
    let keys: Vec<_> = monthly.trend_series.iter().map(|p| p.bucket_key.as_str()).collect();
    assert_eq!(keys, vec!["2025-05-20", "2025-06-10", "2025-06-14"]);

    let all = aggregate(&txs, TimeFilter::All, &clock());
    let keys: Vec<_> = all.trend_series.iter().map(|p| p.bucket_key.clone()).collect();
    assert_eq!(keys, vec!["2024-11", "2025-05", "2025-06"]);
    for w in keys.windows(2) {
        assert!(w[0] < w[1]);
    }
    assert_eq!(all.trend_series[2].income, dec("800"));
    assert_eq!(all.trend_series[2].expense, dec("70"));
}

#[test]
fn top_category_against_previous_month() {
    let txs = vec![
        tx(1, "300", Category::HousingShelter, "2025-06-01"),
        tx(2, "120", Category::Entertainment, "2025-06-03"),
        tx(3, "200", Category::HousingShelter, "2025-05-01"),
        tx(4, "999", Category::Entertainment, "2025-05-20"),
        tx(5, "5000", Category::Income, "2025-06-01"),
    ];
    let c = top_category_change(&txs, &clock()).unwrap();
    assert_eq!(c.category, Category::HousingShelter);
    assert_eq!(c.current_amount, dec("300"));
    assert_eq!(c.previous_amount, dec("200"));
    assert_eq!(c.percent_change, dec("50"));
    assert!(c.is_higher);
}

#[test]
fn top_category_new_this_month_reports_100_percent() {
    let txs = vec![
        tx(1, "80", Category::HealthMedical, "2025-06-11"),
        tx(2, "80", Category::Transportation, "2025-06-12"),
    ];
    let c = top_category_change(&txs, &clock()).unwrap();
    // ties go to the first category seen
    assert_eq!(c.category, Category::HealthMedical);
    assert!(c.previous_amount.is_zero());
    assert_eq!(c.percent_change, dec("100"));
}

#[test]
fn top_category_lower_than_last_month_across_year_boundary() {
    let txs = vec![
        tx(1, "50", Category::ShoppingPersonalCare, "2025-01-04"),
        tx(2, "200", Category::ShoppingPersonalCare, "2024-12-24"),
    ];
    let c = top_category_change(&txs, &FixedClock(date("2025-01-20"))).unwrap();
    assert_eq!(c.percent_change, dec("-75"));
    assert!(!c.is_higher);
}

#[test]
fn top_category_absent_without_expenses_this_month() {
    let txs = vec![
        tx(1, "1000", Category::Income, "2025-06-01"),
        tx(2, "40", Category::Transportation, "2025-05-31"),
    ];
    assert!(top_category_change(&txs, &clock()).is_none());
    assert!(top_category_change(&[], &clock()).is_none());
}
