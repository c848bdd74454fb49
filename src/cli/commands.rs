pub mod initdb;
pub mod process_due;
pub mod recalculate;
pub mod serve;

pub use initdb::init_database;
pub use process_due::{process_due, processing_instant};
pub use recalculate::recalculate;
pub use serve::serve;
