use crate::entity_iden::EntityIden;
use model::entities::prelude::{AutomaticTransaction, Transaction};
use model::entities::{automatic_transaction, transaction::Column};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transaction::table())
                    .if_not_exists()
                    .col(pk_auto(Transaction::column(Column::Id)))
                    .col(string(Transaction::column(Column::OwnerId)))
                    .col(decimal(Transaction::column(Column::Amount)).decimal_len(16, 4))
                    .col(string(Transaction::column(Column::Currency)).string_len(3))
                    .col(string(Transaction::column(Column::Direction)).string_len(7))
                    .col(string(Transaction::column(Column::Category)))
                    .col(string_null(Transaction::column(Column::Subcategory)))
                    .col(string(Transaction::column(Column::Description)))
                    .col(text_null(Transaction::column(Column::Notes)))
                    .col(boolean(Transaction::column(Column::IsMandatory)).default(false))
                    .col(date(Transaction::column(Column::Date)))
                    .col(integer_null(Transaction::column(Column::AutomaticTransactionId)))
                    .col(boolean(Transaction::column(Column::IsAutomatic)).default(false))
                    .col(timestamp_with_time_zone(Transaction::column(Column::CreatedAt)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_automatic_transaction")
                            .from(
                                Transaction::table(),
                                Transaction::column(Column::AutomaticTransactionId),
                            )
                            .to(
                                AutomaticTransaction::table(),
                                AutomaticTransaction::column(automatic_transaction::Column::Id),
                            )
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_automatic_transaction")
                    .table(Transaction::table())
                    .col(Transaction::column(Column::AutomaticTransactionId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transaction::table()).to_owned())
            .await?;

        Ok(())
    }
}
