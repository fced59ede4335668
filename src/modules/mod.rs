pub mod groups;
pub mod health;
pub mod loans;
pub mod members;
pub mod reports;
pub mod savings;
pub mod transactions;
