//! Root for the SeaORM entity modules.
//!
//! `automatic_transaction` holds the durable recurrence rules and
//! `transaction` the concrete rows they materialize into.

pub mod automatic_transaction;
pub mod transaction;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::automatic_transaction::Entity as AutomaticTransaction;
    pub use super::transaction::Entity as Transaction;
}
