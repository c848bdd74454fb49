pub mod admin;
pub mod automatic_transactions;
pub mod cron;
pub mod health;
