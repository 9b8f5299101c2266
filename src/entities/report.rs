//! Report entity - A pointer to a previously requested reporting period.
//!
//! A report row stores only the range descriptor, never the computed totals.
//! Reloading a report re-runs the aggregation engine against the live
//! transaction data for the stored range, so a reloaded report reflects any
//! edits made since it was saved.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    /// Unique identifier for the report
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who saved the report
    pub user_id: i64,
    /// Free-form report kind; the generator produces `"monthly"`
    pub report_type: String,
    /// First calendar date of the period, inclusive
    pub period_from: Date,
    /// Last calendar date of the period, inclusive
    pub period_to: Date,
    /// When the pointer was persisted; immutable afterwards
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Report and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each report belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
