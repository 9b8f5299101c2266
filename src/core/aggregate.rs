//! Aggregation engine - Pure computations behind period reports.
//!
//! This module turns a snapshot of transactions (with their categories
//! already resolved by the store) into grouped totals and descriptive
//! statistics. Everything here is synchronous, single-pass CPU work over a
//! caller-supplied slice; nothing is cached or shared between calls, so
//! concurrent report generations never interfere.
//!
//! Sums are exact integer cent arithmetic. Floating point appears only in
//! the statistics, which are computed on unrounded values; two-decimal
//! rounding is left to the presentation layer.

// Cent amounts stay far below 2^53, so i64 -> f64 is lossless here.
#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    entities::{CategoryKind, category, transaction},
    errors::{Error, Result},
    money::Money,
};

/// One transaction as the engine sees it: an amount plus the identity and
/// kind of its resolved category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// ID of the underlying transaction
    pub transaction_id: i64,
    /// Transaction amount, strictly positive
    pub amount: Money,
    /// ID of the resolved category; the grouping key for every per-category
    /// computation
    pub category_id: i64,
    /// Display name copied from the category
    pub category_name: String,
    /// Income/expense tag copied from the category
    pub kind: CategoryKind,
}

/// Income and expense totals over one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sum of all income amounts
    pub total_income: Money,
    /// Sum of all expense amounts
    pub total_expense: Money,
    /// `total_income - total_expense`; negative when spending exceeds income
    pub balance: Money,
}

/// Total per category, in first-appearance order of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// ID of the category
    pub category_id: i64,
    /// Display name of the category
    pub name: String,
    /// Income/expense tag of the category
    pub kind: CategoryKind,
    /// Exact sum of the group's amounts
    pub total: Money,
}

/// Descriptive statistics over one class of amounts, in major currency
/// units. Every field is 0.0 for an empty class.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct AmountStatistics {
    /// Arithmetic average
    pub mean: f64,
    /// Middle value of the sorted amounts; mean of the two central values
    /// for an even count
    pub median: f64,
    /// Most frequent amount; ties go to the first value in input order that
    /// attains the maximum frequency
    pub mode: f64,
    /// Sample variance (n - 1 divisor); 0.0 for fewer than two amounts
    pub variance: f64,
    /// Square root of the sample variance
    pub std_deviation: f64,
}

/// Statistics for the income and expense partitions of one period.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ClassStatistics {
    /// Statistics over all income amounts
    pub income: AmountStatistics,
    /// Statistics over all expense amounts
    pub expense: AmountStatistics,
}

/// Median, mode and count for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStatistics {
    /// ID of the category
    pub category_id: i64,
    /// Display name of the category
    pub name: String,
    /// Income/expense tag of the category
    pub kind: CategoryKind,
    /// Median of the group's amounts
    pub median: f64,
    /// Mode of the group's amounts, same tie-break as [`AmountStatistics`]
    pub mode: f64,
    /// Number of transactions in the group
    pub transaction_count: usize,
}

/// Validates store rows and produces the engine's working view.
///
/// A row without a resolved category or with a non-positive amount is a
/// contract violation by the store, surfaced immediately rather than
/// skipped, so data-integrity problems stay visible upstream.
pub fn resolve_entries(
    rows: &[(transaction::Model, Option<category::Model>)],
) -> Result<Vec<Entry>> {
    rows.iter()
        .map(|(txn, cat)| {
            let cat = cat.as_ref().ok_or(Error::UnresolvedCategory {
                transaction_id: txn.id,
            })?;

            if txn.amount_cents <= 0 {
                return Err(Error::InvalidAmount {
                    cents: txn.amount_cents,
                });
            }

            Ok(Entry {
                transaction_id: txn.id,
                amount: Money::from_cents(txn.amount_cents),
                category_id: cat.id,
                category_name: cat.name.clone(),
                kind: cat.kind,
            })
        })
        .collect()
}

/// Computes income/expense totals and the resulting balance.
///
/// Both totals default to zero for an empty partition, and the balance may
/// be negative. Pure function over its input.
#[must_use]
pub fn summarize(entries: &[Entry]) -> Summary {
    let mut total_income = Money::zero();
    let mut total_expense = Money::zero();

    for entry in entries {
        match entry.kind {
            CategoryKind::Income => total_income += entry.amount,
            CategoryKind::Expense => total_expense += entry.amount,
        }
    }

    Summary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    }
}

/// Groups entries by category identity and sums each group's amounts.
///
/// The grouping key is the category ID, never the display name, so two
/// same-named categories stay distinct groups. Output order is the order in
/// which categories first appear in the input.
#[must_use]
pub fn group_by_category(entries: &[Entry]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_id: HashMap<i64, usize> = HashMap::new();

    for entry in entries {
        if let Some(&idx) = index_by_id.get(&entry.category_id) {
            totals[idx].total += entry.amount;
        } else {
            index_by_id.insert(entry.category_id, totals.len());
            totals.push(CategoryTotal {
                category_id: entry.category_id,
                name: entry.category_name.clone(),
                kind: entry.kind,
                total: entry.amount,
            });
        }
    }

    totals
}

/// Computes descriptive statistics for the income and expense partitions
/// independently.
#[must_use]
pub fn class_statistics(entries: &[Entry]) -> ClassStatistics {
    let income: Vec<i64> = entries
        .iter()
        .filter(|e| e.kind == CategoryKind::Income)
        .map(|e| e.amount.cents())
        .collect();
    let expense: Vec<i64> = entries
        .iter()
        .filter(|e| e.kind == CategoryKind::Expense)
        .map(|e| e.amount.cents())
        .collect();

    ClassStatistics {
        income: amount_statistics(&income),
        expense: amount_statistics(&expense),
    }
}

/// Computes median, mode and count per category, using the same grouping
/// key as [`group_by_category`] and the same median/mode algorithms as
/// [`class_statistics`]. Mean and variance are deliberately not computed at
/// category granularity.
#[must_use]
pub fn category_statistics(entries: &[Entry]) -> Vec<CategoryStatistics> {
    let mut groups: Vec<(i64, String, CategoryKind, Vec<i64>)> = Vec::new();
    let mut index_by_id: HashMap<i64, usize> = HashMap::new();

    for entry in entries {
        if let Some(&idx) = index_by_id.get(&entry.category_id) {
            groups[idx].3.push(entry.amount.cents());
        } else {
            index_by_id.insert(entry.category_id, groups.len());
            groups.push((
                entry.category_id,
                entry.category_name.clone(),
                entry.kind,
                vec![entry.amount.cents()],
            ));
        }
    }

    groups
        .into_iter()
        .map(|(category_id, name, kind, amounts)| CategoryStatistics {
            category_id,
            name,
            kind,
            median: median_of(&amounts),
            mode: to_major(mode_of(&amounts)),
            transaction_count: amounts.len(),
        })
        .collect()
}

fn amount_statistics(cents: &[i64]) -> AmountStatistics {
    if cents.is_empty() {
        return AmountStatistics::default();
    }

    let mean = mean_of(cents);
    let variance = sample_variance(cents, mean);

    AmountStatistics {
        mean,
        median: median_of(cents),
        mode: to_major(mode_of(cents)),
        variance,
        std_deviation: variance.sqrt(),
    }
}

fn to_major(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn mean_of(cents: &[i64]) -> f64 {
    if cents.is_empty() {
        return 0.0;
    }

    // Exact integer sum first; division is the only inexact step.
    let total: i64 = cents.iter().sum();
    total as f64 / cents.len() as f64 / 100.0
}

fn median_of(cents: &[i64]) -> f64 {
    if cents.is_empty() {
        return 0.0;
    }

    let mut sorted = cents.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    let median_cents = if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    };

    median_cents / 100.0
}

/// Returns the most frequent value; on ties, the first value in original
/// input order to attain the maximum frequency.
fn mode_of(cents: &[i64]) -> i64 {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &value in cents {
        *counts.entry(value).or_insert(0) += 1;
    }

    let max = counts.values().copied().max().unwrap_or(0);
    cents
        .iter()
        .copied()
        .find(|value| counts.get(value) == Some(&max))
        .unwrap_or(0)
}

fn sample_variance(cents: &[i64], mean: f64) -> f64 {
    if cents.len() <= 1 {
        return 0.0;
    }

    let sum_sq: f64 = cents
        .iter()
        .map(|&value| {
            let deviation = to_major(value) - mean;
            deviation * deviation
        })
        .sum();

    sum_sq / (cents.len() as f64 - 1.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn entry(cents: i64, category_id: i64, name: &str, kind: CategoryKind) -> Entry {
        Entry {
            transaction_id: 0,
            amount: Money::from_cents(cents),
            category_id,
            category_name: name.to_string(),
            kind,
        }
    }

    fn income(cents: i64) -> Entry {
        entry(cents, 1, "Salary", CategoryKind::Income)
    }

    fn expense(cents: i64) -> Entry {
        entry(cents, 2, "Groceries", CategoryKind::Expense)
    }

    #[test]
    fn test_summarize_balance_identity() {
        let entries = vec![income(10_000), income(30_000), expense(5_000)];
        let summary = summarize(&entries);

        assert_eq!(summary.total_income, Money::from_cents(40_000));
        assert_eq!(summary.total_expense, Money::from_cents(5_000));
        assert_eq!(summary.balance, summary.total_income - summary.total_expense);
        assert_eq!(summary.balance, Money::from_cents(35_000));
    }

    #[test]
    fn test_summarize_negative_balance() {
        let entries = vec![income(1_000), expense(2_500)];
        let summary = summarize(&entries);

        assert_eq!(summary.balance, Money::from_cents(-1_500));
    }

    #[test]
    fn test_empty_input_degrades_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_income, Money::zero());
        assert_eq!(summary.total_expense, Money::zero());
        assert_eq!(summary.balance, Money::zero());

        assert!(group_by_category(&[]).is_empty());
        assert!(category_statistics(&[]).is_empty());

        let stats = class_statistics(&[]);
        for class in [stats.income, stats.expense] {
            assert_eq!(class.mean, 0.0);
            assert_eq!(class.median, 0.0);
            assert_eq!(class.mode, 0.0);
            assert_eq!(class.variance, 0.0);
            assert_eq!(class.std_deviation, 0.0);
        }
    }

    #[test]
    fn test_grouping_totals_match_summary() {
        let entries = vec![
            income(10_000),
            expense(2_000),
            income(5_500),
            entry(700, 3, "Cafe", CategoryKind::Expense),
            expense(1_300),
        ];

        let summary = summarize(&entries);
        let totals = group_by_category(&entries);

        let income_sum: Money = totals
            .iter()
            .filter(|t| t.kind == CategoryKind::Income)
            .map(|t| t.total)
            .sum();
        let expense_sum: Money = totals
            .iter()
            .filter(|t| t.kind == CategoryKind::Expense)
            .map(|t| t.total)
            .sum();

        assert_eq!(income_sum, summary.total_income);
        assert_eq!(expense_sum, summary.total_expense);
    }

    #[test]
    fn test_grouping_is_by_id_not_name() {
        // Same display name, different ids: must stay two groups.
        let entries = vec![
            entry(1_000, 10, "Misc", CategoryKind::Expense),
            entry(2_000, 11, "Misc", CategoryKind::Expense),
        ];

        let totals = group_by_category(&entries);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].total, Money::from_cents(1_000));
        assert_eq!(totals[1].total, Money::from_cents(2_000));
    }

    #[test]
    fn test_grouping_preserves_first_appearance_order() {
        let entries = vec![
            entry(100, 7, "Cafe", CategoryKind::Expense),
            entry(200, 3, "Rent", CategoryKind::Expense),
            entry(300, 7, "Cafe", CategoryKind::Expense),
        ];

        let totals = group_by_category(&entries);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category_id, 7);
        assert_eq!(totals[0].total, Money::from_cents(400));
        assert_eq!(totals[1].category_id, 3);
    }

    #[test]
    fn test_worked_scenario() {
        // income 100 + 300, expense 50
        let entries = vec![income(10_000), income(30_000), expense(5_000)];

        let summary = summarize(&entries);
        assert_eq!(summary.total_income, Money::from_cents(40_000));
        assert_eq!(summary.total_expense, Money::from_cents(5_000));
        assert_eq!(summary.balance, Money::from_cents(35_000));

        let stats = class_statistics(&entries);
        assert_eq!(stats.income.mean, 200.0);
        assert_eq!(stats.income.median, 200.0);
        assert_eq!(stats.income.mode, 100.0);
        assert_eq!(stats.income.variance, 20_000.0);
        assert_eq!(stats.income.std_deviation, 20_000.0_f64.sqrt());

        assert_eq!(stats.expense.mean, 50.0);
        assert_eq!(stats.expense.median, 50.0);
        assert_eq!(stats.expense.mode, 50.0);
        assert_eq!(stats.expense.variance, 0.0);
        assert_eq!(stats.expense.std_deviation, 0.0);
    }

    #[test]
    fn test_median_odd_and_even_counts() {
        let odd = vec![income(300), income(100), income(200)];
        assert_eq!(class_statistics(&odd).income.median, 2.0);

        let even = vec![income(100), income(400), income(200), income(300)];
        assert_eq!(class_statistics(&even).income.median, 2.5);
    }

    #[test]
    fn test_statistics_are_order_invariant() {
        let forward = vec![income(100), income(250), income(700), income(250)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = class_statistics(&forward).income;
        let b = class_statistics(&reversed).income;

        assert_eq!(a.mean, b.mean);
        assert_eq!(a.median, b.median);
        assert_eq!(a.variance, b.variance);
        assert_eq!(a.std_deviation, b.std_deviation);
    }

    #[test]
    fn test_mode_tie_break_is_first_to_max_frequency() {
        // [10, 20, 10, 20]: both reach frequency 2, 10 is seen first.
        let entries = vec![income(1_000), income(2_000), income(1_000), income(2_000)];
        assert_eq!(class_statistics(&entries).income.mode, 10.0);

        // Reversed input flips the winner: tie-break depends on input order.
        let reversed = vec![income(2_000), income(1_000), income(2_000), income(1_000)];
        assert_eq!(class_statistics(&reversed).income.mode, 20.0);
    }

    #[test]
    fn test_single_value_variance_is_zero() {
        let entries = vec![expense(4_200)];
        let stats = class_statistics(&entries);

        assert_eq!(stats.expense.variance, 0.0);
        assert_eq!(stats.expense.std_deviation, 0.0);
        assert_eq!(stats.expense.mean, 42.0);
    }

    #[test]
    fn test_category_statistics_median_mode_count() {
        let entries = vec![
            entry(1_000, 5, "Cafe", CategoryKind::Expense),
            entry(3_000, 5, "Cafe", CategoryKind::Expense),
            entry(1_000, 5, "Cafe", CategoryKind::Expense),
            entry(9_900, 6, "Salary", CategoryKind::Income),
        ];

        let stats = category_statistics(&entries);
        assert_eq!(stats.len(), 2);

        let cafe = &stats[0];
        assert_eq!(cafe.category_id, 5);
        assert_eq!(cafe.median, 10.0);
        assert_eq!(cafe.mode, 10.0);
        assert_eq!(cafe.transaction_count, 3);

        let salary = &stats[1];
        assert_eq!(salary.median, 99.0);
        assert_eq!(salary.mode, 99.0);
        assert_eq!(salary.transaction_count, 1);
    }

    #[test]
    fn test_resolve_entries_rejects_missing_category() {
        let txn = transaction::Model {
            id: 17,
            user_id: 1,
            category_id: 99,
            amount_cents: 1_000,
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            comment: None,
        };

        let result = resolve_entries(&[(txn, None)]);
        assert!(matches!(
            result,
            Err(Error::UnresolvedCategory { transaction_id: 17 })
        ));
    }

    #[test]
    fn test_resolve_entries_rejects_non_positive_amount() {
        let cat = category::Model {
            id: 1,
            user_id: 1,
            name: "Salary".to_string(),
            kind: CategoryKind::Income,
        };
        let txn = transaction::Model {
            id: 3,
            user_id: 1,
            category_id: 1,
            amount_cents: 0,
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            comment: None,
        };

        let result = resolve_entries(&[(txn, Some(cat))]);
        assert!(matches!(result, Err(Error::InvalidAmount { cents: 0 })));
    }

    #[test]
    fn test_resolve_entries_copies_category_fields() {
        let cat = category::Model {
            id: 8,
            user_id: 1,
            name: "Rent".to_string(),
            kind: CategoryKind::Expense,
        };
        let txn = transaction::Model {
            id: 4,
            user_id: 1,
            category_id: 8,
            amount_cents: 55_000,
            date: chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            comment: Some("February".to_string()),
        };

        let entries = resolve_entries(&[(txn, Some(cat))]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category_id, 8);
        assert_eq!(entries[0].category_name, "Rent");
        assert_eq!(entries[0].kind, CategoryKind::Expense);
        assert_eq!(entries[0].amount, Money::from_cents(55_000));
    }
}
