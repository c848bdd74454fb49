use crate::entity_iden::EntityIden;
use model::entities::automatic_transaction::Column;
use model::entities::prelude::AutomaticTransaction;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AutomaticTransaction::table())
                    .if_not_exists()
                    .col(pk_auto(AutomaticTransaction::column(Column::Id)))
                    .col(string(AutomaticTransaction::column(Column::OwnerId)))
                    .col(decimal(AutomaticTransaction::column(Column::Amount)).decimal_len(16, 4))
                    .col(string(AutomaticTransaction::column(Column::Currency)).string_len(3))
                    .col(string(AutomaticTransaction::column(Column::Description)))
                    .col(string(AutomaticTransaction::column(Column::Category)))
                    .col(string_null(AutomaticTransaction::column(Column::Subcategory)))
                    .col(text_null(AutomaticTransaction::column(Column::Notes)))
                    .col(boolean(AutomaticTransaction::column(Column::IsMandatory)).default(false))
                    .col(string(AutomaticTransaction::column(Column::Direction)).string_len(7))
                    .col(string(AutomaticTransaction::column(Column::RecurrenceType)).string_len(10))
                    .col(integer(AutomaticTransaction::column(Column::RecurrenceInterval)).default(1))
                    .col(integer_null(AutomaticTransaction::column(Column::DayOfMonth)))
                    .col(integer_null(AutomaticTransaction::column(Column::DayOfWeek)))
                    .col(date(AutomaticTransaction::column(Column::StartDate)))
                    .col(date_null(AutomaticTransaction::column(Column::EndDate)))
                    .col(date(AutomaticTransaction::column(Column::NextExecutionDate)))
                    .col(string(AutomaticTransaction::column(Column::Status)).string_len(10))
                    .col(integer(AutomaticTransaction::column(Column::ExecutionCount)).default(0))
                    .col(timestamp_with_time_zone_null(AutomaticTransaction::column(
                        Column::LastExecuted,
                    )))
                    .col(timestamp_with_time_zone(AutomaticTransaction::column(Column::CreatedAt)))
                    .col(timestamp_with_time_zone(AutomaticTransaction::column(Column::UpdatedAt)))
                    .to_owned(),
            )
            .await?;

        // The batch pass looks rules up by (status, next_execution_date).
        manager
            .create_index(
                Index::create()
                    .name("idx_automatic_transactions_due")
                    .table(AutomaticTransaction::table())
                    .col(AutomaticTransaction::column(Column::Status))
                    .col(AutomaticTransaction::column(Column::NextExecutionDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_automatic_transactions_owner")
                    .table(AutomaticTransaction::table())
                    .col(AutomaticTransaction::column(Column::OwnerId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AutomaticTransaction::table()).to_owned())
            .await?;

        Ok(())
    }
}
