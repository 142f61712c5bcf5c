pub mod aging;
pub mod payment;
pub mod plan;

pub use aging::{
    aging_report, aging_report_now, evaluate_overdue, evaluate_overdue_now, AgingReport,
    BucketTotal, OverdueEntry,
};
pub use payment::{allocate_payment, apply_payment, AllocationLine, PaymentAllocation};
pub use plan::{generate_installment_plan, Installment, InstallmentPlan};
