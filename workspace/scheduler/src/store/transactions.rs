use async_trait::async_trait;
use model::entities::transaction::{self, Column};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, instrument};

use super::{NewOccurrence, TransactionStore};
use crate::error::StoreError;

/// [`TransactionStore`] backed by the `transactions` table.
#[derive(Debug, Clone)]
pub struct SeaOrmTransactionStore {
    db: DatabaseConnection,
}

impl SeaOrmTransactionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionStore for SeaOrmTransactionStore {
    #[instrument(skip(self, occurrence), fields(rule_id = occurrence.automatic_transaction_id, date = %occurrence.date))]
    async fn create(&self, occurrence: NewOccurrence) -> Result<transaction::Model, StoreError> {
        let created = transaction::ActiveModel {
            owner_id: Set(occurrence.owner_id),
            amount: Set(occurrence.amount),
            currency: Set(occurrence.currency),
            direction: Set(occurrence.direction),
            category: Set(occurrence.category),
            subcategory: Set(occurrence.subcategory),
            description: Set(occurrence.description),
            notes: Set(occurrence.notes),
            is_mandatory: Set(occurrence.is_mandatory),
            date: Set(occurrence.date),
            automatic_transaction_id: Set(Some(occurrence.automatic_transaction_id)),
            is_automatic: Set(true),
            created_at: Set(occurrence.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!("Created transaction {}", created.id);
        Ok(created)
    }

    async fn find_for_rule(&self, rule_id: i32) -> Result<Vec<transaction::Model>, StoreError> {
        Ok(transaction::Entity::find()
            .filter(Column::AutomaticTransactionId.eq(rule_id))
            .order_by_asc(Column::Date)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }
}
