pub mod amortization;
pub mod emi;

pub use amortization::{amortize_loan, LoanAmortization, PaymentRow};
pub use emi::{calculate_emi, compound_factor};
