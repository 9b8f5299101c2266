//! Report generation business logic.
//!
//! This module orchestrates period reports: it pulls a user's transactions
//! for a date range from the store, runs the aggregation engine over them
//! and assembles a single structured payload. It also manages saved report
//! pointers, lightweight range descriptors that never store computed
//! numbers, so reloading a saved report always recomputes from the live
//! transaction data. All functions are framework-agnostic and return
//! structured data that can be formatted by any front end.

use crate::{
    core::aggregate::{
        self, CategoryStatistics, CategoryTotal, ClassStatistics, Summary,
    },
    core::transaction::{ResolvedTransaction, get_transactions_in_range},
    entities::{CategoryKind, Report, report},
    errors::{Error, Result},
    money::Money,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::error;

/// Report type produced by the monthly generator.
pub const MONTHLY_REPORT_TYPE: &str = "monthly";

/// Inclusive calendar date range of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    /// First date of the period, inclusive
    pub from: NaiveDate,
    /// Last date of the period, inclusive
    pub to: NaiveDate,
}

/// Category identity carried on each transaction in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    /// ID of the category
    pub id: i64,
    /// Display name of the category
    pub name: String,
    /// Income/expense tag of the category
    pub kind: CategoryKind,
}

/// One transaction as presented inside a report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTransaction {
    /// ID of the transaction
    pub id: i64,
    /// Transaction amount
    pub amount: Money,
    /// Calendar date of the transaction
    pub date: NaiveDate,
    /// Optional free-text note
    pub comment: Option<String>,
    /// The resolved category
    pub category: CategoryRef,
}

/// A category's total together with its share of the class total: income
/// categories are measured against total income, expense categories against
/// total expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// ID of the category
    pub category_id: i64,
    /// Display name of the category
    pub name: String,
    /// Income/expense tag of the category
    pub kind: CategoryKind,
    /// Exact sum of the group's amounts
    pub total: Money,
    /// Share of the class total, 0-100; 0.0 when the class total is zero
    pub percent: f64,
}

/// The full result of one report generation.
///
/// Produced on demand and never persisted; generating the same range twice
/// against unchanged data yields identical payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPayload {
    /// The inclusive date range the report covers
    pub period: Period,
    /// Income/expense totals and balance
    pub summary: Summary,
    /// Descriptive statistics per income/expense class
    pub statistics: ClassStatistics,
    /// Per-category totals with class-share percentages
    pub categories: Vec<CategoryShare>,
    /// Median, mode and count per category
    pub category_statistics: Vec<CategoryStatistics>,
    /// The transactions the report was computed from
    pub transactions: Vec<ReportTransaction>,
}

/// Generates a report over `[from, to]` for one user.
///
/// Fetches the user's transactions for the inclusive range, runs the
/// aggregation engine and assembles the payload. Read-only and idempotent:
/// nothing is written, and unchanged data yields identical output.
///
/// # Errors
/// * [`Error::InvalidRange`] when `from` lies after `to`
/// * [`Error::UnresolvedCategory`] / [`Error::InvalidAmount`] when the store
///   hands back rows violating its contract
pub async fn generate_monthly_report(
    db: &DatabaseConnection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<ReportPayload> {
    if from > to {
        return Err(Error::InvalidRange { from, to });
    }

    let rows = get_transactions_in_range(db, user_id, from, to).await?;
    let entries = aggregate::resolve_entries(&rows)
        .inspect_err(|e| error!("Refusing report over corrupt transaction data: {e}"))?;

    let summary = aggregate::summarize(&entries);
    let statistics = aggregate::class_statistics(&entries);
    let categories = derive_shares(aggregate::group_by_category(&entries), &summary);
    let category_statistics = aggregate::category_statistics(&entries);
    let transactions = present_transactions(&rows)?;

    Ok(ReportPayload {
        period: Period { from, to },
        summary,
        statistics,
        categories,
        category_statistics,
        transactions,
    })
}

/// Persists a pointer to a generated report: only the range descriptor and
/// type, stamped with the current time. Computed values are never stored;
/// reloading recomputes them from live data.
pub async fn save_report_pointer(
    db: &DatabaseConnection,
    user_id: i64,
    report_type: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<report::Model> {
    if from > to {
        return Err(Error::InvalidRange { from, to });
    }

    let now = chrono::Utc::now();
    let pointer = report::ActiveModel {
        user_id: Set(user_id),
        report_type: Set(report_type.to_string()),
        period_from: Set(from),
        period_to: Set(to),
        created_at: Set(now),
        ..Default::default()
    };

    let result = pointer.insert(db).await?;
    Ok(result)
}

/// Retrieves all report pointers saved by a user, newest first.
pub async fn get_reports_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<report::Model>> {
    Report::find()
        .filter(report::Column::UserId.eq(user_id))
        .order_by_desc(report::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up a report pointer and verifies it belongs to the given user.
pub async fn get_report_by_id(
    db: &DatabaseConnection,
    user_id: i64,
    report_id: i64,
) -> Result<report::Model> {
    let pointer = Report::find_by_id(report_id)
        .one(db)
        .await?
        .ok_or(Error::ReportNotFound { id: report_id })?;

    if pointer.user_id != user_id {
        return Err(Error::AccessDenied);
    }

    Ok(pointer)
}

/// Re-generates a previously saved report from its stored range.
///
/// The payload reflects the transaction data as it is now, not as it was
/// when the pointer was saved; edits or deletions inside the range change
/// what a reload returns.
pub async fn reload_report(
    db: &DatabaseConnection,
    report_id: i64,
    user_id: i64,
) -> Result<ReportPayload> {
    let pointer = get_report_by_id(db, user_id, report_id).await?;
    generate_monthly_report(db, user_id, pointer.period_from, pointer.period_to).await
}

fn derive_shares(totals: Vec<CategoryTotal>, summary: &Summary) -> Vec<CategoryShare> {
    totals
        .into_iter()
        .map(|total| {
            let class_total = match total.kind {
                CategoryKind::Income => summary.total_income,
                CategoryKind::Expense => summary.total_expense,
            };
            let percent = if class_total.is_zero() {
                0.0
            } else {
                total.total.to_f64() / class_total.to_f64() * 100.0
            };

            CategoryShare {
                category_id: total.category_id,
                name: total.name,
                kind: total.kind,
                total: total.total,
                percent,
            }
        })
        .collect()
}

fn present_transactions(rows: &[ResolvedTransaction]) -> Result<Vec<ReportTransaction>> {
    rows.iter()
        .map(|(txn, cat)| {
            let cat = cat.as_ref().ok_or(Error::UnresolvedCategory {
                transaction_id: txn.id,
            })?;

            Ok(ReportTransaction {
                id: txn.id,
                amount: Money::from_cents(txn.amount_cents),
                date: txn.date,
                comment: txn.comment.clone(),
                category: CategoryRef {
                    id: cat.id,
                    name: cat.name.clone(),
                    kind: cat.kind,
                },
            })
        })
        .collect()
}
