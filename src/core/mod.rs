pub mod currency;
pub mod error;
pub mod party;
pub mod scope;

pub use currency::CurrencyCode;
pub use error::{AppError, Result};
pub use party::{PartyKind, PartyRef};
pub use scope::{ReportScope, ScopeSelector};
