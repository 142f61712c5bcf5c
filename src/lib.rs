pub mod calendar;
pub mod commission;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod installments;
pub mod loan;
pub mod serialization;
pub mod types;

// re-export key types
pub use calendar::{add_months, days_between, AgingBucket};
pub use commission::{
    resolve_commission, CommissionResolver, CommissionResult, CommissionRule, ProjectScope,
    Explanation, RuleEvaluation, RuleVerdict, Sale, SizeRange,
};
pub use config::{InstallmentTerms, InstallmentTermsBuilder, LoanTerms, LoanTermsBuilder};
pub use decimal::{round_currency, Money, Rate};
pub use errors::{FinanceError, Result};
pub use installments::{
    aging_report, aging_report_now, allocate_payment, apply_payment, evaluate_overdue,
    evaluate_overdue_now, generate_installment_plan, AgingReport, Installment, InstallmentPlan,
    OverdueEntry, PaymentAllocation,
};
pub use loan::{amortize_loan, calculate_emi, LoanAmortization, PaymentRow};
pub use serialization::{audit_json, CommissionView, LoanView, PlanView};
pub use types::{
    CommissionBasis, DownPayment, InstallmentStatus, PaymentFrequency, ProjectId, RateKind,
    RuleId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
