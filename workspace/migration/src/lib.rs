pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_automatic_transactions;
mod m20250601_000002_create_transactions;
pub mod entity_iden;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_automatic_transactions::Migration),
            Box::new(m20250601_000002_create_transactions::Migration),
        ]
    }
}
