use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::{FinanceError, Result};
use crate::types::InstallmentStatus;

use super::plan::{status_for, InstallmentPlan};

/// share of a lump-sum receipt applied to one installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub installment_no: u32,
    pub applied: Money,
    pub status: InstallmentStatus,
}

/// result of spreading a receipt across a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub plan: InstallmentPlan,
    pub lines: Vec<AllocationLine>,
}

impl PaymentAllocation {
    pub fn total_applied(&self) -> Money {
        self.lines.iter().map(|line| line.applied).sum()
    }
}

fn ensure_positive(amount: Money) -> Result<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(FinanceError::invalid_input(format!(
            "payment amount {amount} must be positive"
        )))
    }
}

impl InstallmentPlan {
    /// pay `amount` against one installment, returning the updated plan.
    ///
    /// the input plan is left untouched; paying more than the installment's
    /// remaining balance is an error, never clamped
    pub fn apply_payment(&self, installment_no: u32, amount: Money) -> Result<InstallmentPlan> {
        ensure_positive(amount)?;
        self.validate()?;

        let index = self
            .installments
            .iter()
            .position(|i| i.installment_no == installment_no)
            .ok_or_else(|| {
                FinanceError::invalid_input(format!(
                    "installment {installment_no} does not exist in a plan of {}",
                    self.installment_count
                ))
            })?;

        let remaining = self.installments[index].remaining();
        if amount > remaining {
            return Err(FinanceError::Overpayment {
                installment_no: Some(installment_no),
                remaining,
                attempted: amount,
            });
        }

        let mut plan = self.clone();
        let installment = &mut plan.installments[index];
        installment.paid_amount += amount;
        installment.status = status_for(installment.amount, installment.paid_amount);

        debug!(
            installment_no,
            %amount,
            paid = %installment.paid_amount,
            status = ?installment.status,
            "installment payment applied"
        );

        Ok(plan)
    }

    /// spread a single receipt over unpaid installments, earliest due first
    pub fn allocate_payment(&self, amount: Money) -> Result<PaymentAllocation> {
        ensure_positive(amount)?;
        self.validate()?;

        let outstanding = self.outstanding();
        if amount > outstanding {
            return Err(FinanceError::Overpayment {
                installment_no: None,
                remaining: outstanding,
                attempted: amount,
            });
        }

        let mut plan = self.clone();
        let mut left = amount;
        let mut lines = Vec::new();

        for installment in plan.installments.iter_mut().filter(|i| !i.is_paid()) {
            if left.is_zero() {
                break;
            }

            let applied = left.min(installment.remaining());
            installment.paid_amount += applied;
            installment.status = status_for(installment.amount, installment.paid_amount);
            left -= applied;

            lines.push(AllocationLine {
                installment_no: installment.installment_no,
                applied,
                status: installment.status,
            });
        }

        debug!(%amount, installments = lines.len(), "lump-sum payment allocated");

        Ok(PaymentAllocation { plan, lines })
    }
}

/// apply a payment to one installment of a plan
pub fn apply_payment(
    plan: &InstallmentPlan,
    installment_no: u32,
    amount: Money,
) -> Result<InstallmentPlan> {
    plan.apply_payment(installment_no, amount)
}

/// apply a lump-sum payment across a plan, oldest installment first
pub fn allocate_payment(plan: &InstallmentPlan, amount: Money) -> Result<PaymentAllocation> {
    plan.allocate_payment(amount)
}
