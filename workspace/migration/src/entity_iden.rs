//! Table and column identifiers taken from the model entities, so the schema
//! is always spelled the same way the entities read it.

use sea_orm::entity::prelude::*;
use sea_orm::IdenStatic;
use sea_orm_migration::prelude::Alias;

/// Converts an entity and its columns into identifiers usable in migrations.
pub trait EntityIden: EntityTrait {
    /// Table identifier for this entity.
    fn table() -> Alias {
        Alias::new(Self::default().table_name())
    }

    /// Column identifier for one of this entity's columns.
    fn column(column: Self::Column) -> Alias {
        Alias::new(column.as_str())
    }
}

impl<E: EntityTrait> EntityIden for E {}
