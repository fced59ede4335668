pub mod models;
pub mod repositories;

pub use models::{Transaction, TransactionKind, TransactionStatus};
pub use repositories::{MySqlTransactionRepository, TransactionRepository};
