//! Transaction entity - A single recorded income or expense.
//!
//! Amounts are stored as whole cents (`amount_cents`) so summation in the
//! reporting core is exact integer arithmetic. The `date` column is a plain
//! calendar date used for range filtering; there is no time component.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who recorded the transaction
    pub user_id: i64,
    /// ID of the category classifying this transaction
    pub category_id: i64,
    /// Amount in cents, always strictly positive; the direction of the
    /// money flow comes from the category's kind
    pub amount_cents: i64,
    /// Calendar date the transaction occurred on
    pub date: Date,
    /// Optional free-text note, at most 255 characters
    pub comment: Option<String>,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each transaction belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
