use async_trait::async_trait;
use chrono::NaiveDate;
use model::entities::automatic_transaction::{self, Column, RuleStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, instrument, trace};

use super::{RuleAdvance, ScheduleStore};
use crate::error::StoreError;

/// [`ScheduleStore`] backed by the `automatic_transactions` table.
#[derive(Debug, Clone)]
pub struct SeaOrmScheduleStore {
    db: DatabaseConnection,
}

impl SeaOrmScheduleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleStore for SeaOrmScheduleStore {
    #[instrument(skip(self), fields(today = %today))]
    async fn find_due(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<automatic_transaction::Model>, StoreError> {
        let rules = automatic_transaction::Entity::find()
            .filter(Column::Status.eq(RuleStatus::Active))
            .filter(Column::NextExecutionDate.lte(today))
            .all(&self.db)
            .await?;

        debug!("Found {} due automatic transactions", rules.len());
        Ok(rules)
    }

    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<automatic_transaction::Model>, StoreError> {
        trace!("Loading automatic transaction {}", id);
        Ok(automatic_transaction::Entity::find_by_id(id)
            .one(&self.db)
            .await?)
    }

    #[instrument(skip(self))]
    async fn find_all_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<automatic_transaction::Model>, StoreError> {
        let rules = automatic_transaction::Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        debug!("Found {} automatic transactions for owner", rules.len());
        Ok(rules)
    }

    async fn insert(
        &self,
        rule: automatic_transaction::ActiveModel,
    ) -> Result<automatic_transaction::Model, StoreError> {
        Ok(rule.insert(&self.db).await?)
    }

    async fn save(
        &self,
        rule: automatic_transaction::ActiveModel,
    ) -> Result<automatic_transaction::Model, StoreError> {
        Ok(rule.update(&self.db).await?)
    }

    #[instrument(skip(self, advance), fields(next = %advance.next_execution_date, status = ?advance.status))]
    async fn advance(
        &self,
        id: i32,
        expected_next: NaiveDate,
        advance: RuleAdvance,
    ) -> Result<bool, StoreError> {
        let changes = automatic_transaction::ActiveModel {
            next_execution_date: Set(advance.next_execution_date),
            status: Set(advance.status),
            execution_count: Set(advance.execution_count),
            last_executed: Set(Some(advance.last_executed)),
            updated_at: Set(advance.last_executed),
            ..Default::default()
        };

        // Conditional on the values read before firing; zero rows means someone else moved it.
        let result = automatic_transaction::Entity::update_many()
            .set(changes)
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RuleStatus::Active))
            .filter(Column::NextExecutionDate.eq(expected_next))
            .exec(&self.db)
            .await?;

        trace!("Advance of rule {} affected {} rows", id, result.rows_affected);
        Ok(result.rows_affected == 1)
    }
}
