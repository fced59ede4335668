pub mod installment;
pub mod loan;

pub use installment::{Installment, InstallmentStatus};
pub use loan::{Borrower, Loan, LoanStatus};
