pub mod models;
pub mod repositories;

pub use models::{Borrower, Installment, InstallmentStatus, Loan, LoanStatus};
pub use repositories::{LoanRepository, MySqlLoanRepository};
