pub mod models;
pub mod repositories;

pub use models::{Account, AccountKind, AccountStatus};
pub use repositories::{AccountRepository, MySqlAccountRepository};
