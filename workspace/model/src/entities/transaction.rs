use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::automatic_transaction::{self, Direction};

/// A concrete financial transaction.
///
/// Rows generated by the scheduler carry `is_automatic = true` and a link to the
/// automatic transaction that fired them. The scheduler never updates or
/// deletes a row once written.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub currency: String,
    pub direction: Direction,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: String,
    pub notes: Option<String>,
    pub is_mandatory: bool,
    /// Execution day.
    pub date: NaiveDate,
    /// The automatic transaction that generated this row, if any.
    pub automatic_transaction_id: Option<i32>,
    #[sea_orm(default_value = "false")]
    pub is_automatic: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "automatic_transaction::Entity",
        from = "Column::AutomaticTransactionId",
        to = "automatic_transaction::Column::Id",
        on_delete = "SetNull"
    )]
    AutomaticTransaction,
}

impl Related<automatic_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AutomaticTransaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
