/// flattened json views for reporting and audit
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::commission::{CommissionResult, Sale};
use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};
use crate::installments::InstallmentPlan;
use crate::loan::{LoanAmortization, PaymentRow};
use crate::types::{CommissionBasis, InstallmentStatus, ProjectId, RateKind, RuleId};

/// compact json for audit records; identical values give identical bytes
pub fn audit_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| FinanceError::invalid_input(format!("audit record: {e}")))
}

/// commission decision alongside the sale it was made for
#[derive(Debug, Serialize, Deserialize)]
pub struct CommissionView {
    pub project_id: ProjectId,
    pub plot_size_marla: Decimal,
    pub sale_price: Money,
    pub sale_date: NaiveDate,
    pub rule_id: RuleId,
    pub basis: CommissionBasis,
    pub value: Decimal,
    pub amount: Money,
}

impl CommissionView {
    pub fn new(sale: &Sale, result: &CommissionResult) -> Self {
        CommissionView {
            project_id: sale.project_id.clone(),
            plot_size_marla: sale.plot_size_marla,
            sale_price: sale.sale_price,
            sale_date: sale.sale_date,
            rule_id: result.rule_id,
            basis: result.basis,
            value: result.value,
            amount: result.amount,
        }
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// payment position of an installment plan
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanView {
    pub total_price: Money,
    pub down_payment_amount: Money,
    pub principal: Money,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    pub total_paid: Money,
    pub outstanding: Money,
    pub status_counts: StatusCounts,
    pub next_due: Option<NextDueView>,
    pub fully_paid: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: u32,
    pub partially_paid: u32,
    pub paid: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextDueView {
    pub installment_no: u32,
    pub due_date: NaiveDate,
    pub remaining: Money,
}

impl PlanView {
    pub fn from_plan(plan: &InstallmentPlan) -> Self {
        let mut status_counts = StatusCounts::default();
        for installment in &plan.installments {
            match installment.status {
                InstallmentStatus::Pending => status_counts.pending += 1,
                InstallmentStatus::PartiallyPaid => status_counts.partially_paid += 1,
                InstallmentStatus::Paid => status_counts.paid += 1,
            }
        }

        PlanView {
            total_price: plan.total_price,
            down_payment_amount: plan.down_payment_amount,
            principal: plan.principal,
            installment_count: plan.installment_count,
            start_date: plan.start_date,
            total_paid: plan.total_paid(),
            outstanding: plan.outstanding(),
            status_counts,
            next_due: plan.next_due().map(|next| NextDueView {
                installment_no: next.installment_no,
                due_date: next.due_date,
                remaining: next.remaining(),
            }),
            fully_paid: plan.is_fully_paid(),
        }
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// loan summary without the full schedule
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub property_value: Money,
    pub down_payment_amount: Money,
    pub loan_amount: Money,
    pub annual_rate: Rate,
    pub rate_kind: RateKind,
    pub tenure_months: u32,
    pub monthly_emi: Money,
    pub total_payable: Money,
    pub total_interest: Money,
    pub first_payment: Option<PaymentRow>,
    pub final_payment: Option<PaymentRow>,
}

impl LoanView {
    pub fn from_loan(loan: &LoanAmortization) -> Self {
        LoanView {
            property_value: loan.property_value,
            down_payment_amount: loan.down_payment_amount,
            loan_amount: loan.loan_amount,
            annual_rate: loan.annual_rate,
            rate_kind: loan.rate_kind,
            tenure_months: loan.tenure_months,
            monthly_emi: loan.monthly_emi,
            total_payable: loan.total_payable,
            total_interest: loan.total_interest,
            first_payment: loan.schedule.first().cloned(),
            final_payment: loan.schedule.last().cloned(),
        }
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::{resolve_commission, CommissionRule, ProjectScope, SizeRange};
    use crate::installments::{apply_payment, generate_installment_plan};
    use crate::loan::amortize_loan;
    use crate::types::DownPayment;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_plan_view() {
        let plan = generate_installment_plan(
            Money::from_major(1_000_000),
            DownPayment::Percentage(dec!(20)),
            3,
            date(2024, 1, 15),
        )
        .unwrap();
        let plan = apply_payment(&plan, 1, Money::from_major(266_666)).unwrap();
        let plan = apply_payment(&plan, 2, Money::from_major(66_666)).unwrap();

        let view = PlanView::from_plan(&plan);
        assert_eq!(view.total_paid, Money::from_major(333_332));
        assert_eq!(view.outstanding, Money::from_major(466_668));
        assert_eq!(view.status_counts.paid, 1);
        assert_eq!(view.status_counts.partially_paid, 1);
        assert_eq!(view.status_counts.pending, 1);
        assert!(!view.fully_paid);

        let next = view.next_due.as_ref().unwrap();
        assert_eq!(next.installment_no, 2);
        assert_eq!(next.due_date, date(2024, 2, 15));
        assert_eq!(next.remaining, Money::from_major(200_000));

        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"outstanding\": \"466668\""));
    }

    #[test]
    fn test_loan_view() {
        let loan = amortize_loan(
            Money::from_major(10_000_000),
            DownPayment::Amount(Money::from_major(2_000_000)),
            dec!(12),
            240,
        )
        .unwrap();

        let view = LoanView::from_loan(&loan);
        assert_eq!(view.loan_amount, Money::from_major(8_000_000));
        assert_eq!(view.first_payment.as_ref().unwrap().month, 1);

        let last = view.final_payment.as_ref().unwrap();
        assert_eq!(last.month, 240);
        assert_eq!(last.remaining_balance, Money::ZERO);
        assert!(view.to_json_pretty().is_ok());
    }

    #[test]
    fn test_commission_view_and_audit_json() {
        let range = SizeRange::between(dec!(0), dec!(10));
        let rule = CommissionRule::percent(ProjectScope::Global, range, dec!(2));
        let sale = Sale::new("projectX", dec!(7), Money::from_major(5_000_000), date(2024, 3, 1));
        let result = resolve_commission(&[rule], &sale).unwrap();

        let view = CommissionView::new(&sale, &result);
        assert_eq!(view.amount, Money::from_major(100_000));
        assert_eq!(view.basis, CommissionBasis::Percent);

        let first = audit_json(&view).unwrap();
        let second = audit_json(&CommissionView::new(&sale, &result)).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"project_id\":\"projectX\""));
    }
}
