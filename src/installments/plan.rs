use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{add_months, monthly_schedule};
use crate::config::InstallmentTerms;
use crate::decimal::Money;
use crate::errors::{FinanceError, Result};
use crate::types::{DownPayment, InstallmentStatus, PaymentFrequency};

/// single dated obligation in an installment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub installment_no: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub paid_amount: Money,
    pub status: InstallmentStatus,
}

impl Installment {
    fn new(installment_no: u32, due_date: NaiveDate, amount: Money) -> Self {
        Self {
            installment_no,
            due_date,
            amount,
            paid_amount: Money::ZERO,
            status: status_for(amount, Money::ZERO),
        }
    }

    pub fn remaining(&self) -> Money {
        self.amount - self.paid_amount
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }
}

/// status implied by an amount and what has been paid against it.
///
/// nothing owed counts as paid, so zero-amount installments never go overdue
pub(crate) fn status_for(amount: Money, paid: Money) -> InstallmentStatus {
    if paid == amount {
        InstallmentStatus::Paid
    } else if paid.is_zero() {
        InstallmentStatus::Pending
    } else {
        InstallmentStatus::PartiallyPaid
    }
}

/// buyer installment plan for a plot sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub total_price: Money,
    pub down_payment: DownPayment,
    pub down_payment_amount: Money,
    pub principal: Money,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    pub frequency: PaymentFrequency,
    pub installments: Vec<Installment>,
}

impl InstallmentPlan {
    /// generate a monthly plan.
    ///
    /// installments 1..N-1 are `floor(principal / N)`; the last one absorbs the remainder
    pub fn generate(
        total_price: Money,
        down_payment: DownPayment,
        installment_count: u32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        if !total_price.is_positive() {
            return Err(FinanceError::invalid_input(format!(
                "total price {total_price} must be positive"
            )));
        }
        total_price.ensure_in_range()?;
        if installment_count < 1 {
            return Err(FinanceError::invalid_input("installment count must be at least 1"));
        }

        let down_payment_amount = down_payment.resolve(total_price)?;
        let principal = total_price - down_payment_amount;
        let (base, remainder) = principal.split(installment_count);

        let installments = monthly_schedule(start_date, installment_count)?
            .into_iter()
            .zip(1..=installment_count)
            .map(|(due_date, no)| {
                let amount = if no == installment_count { base + remainder } else { base };
                Installment::new(no, due_date, amount)
            })
            .collect();

        debug!(
            %total_price,
            %down_payment_amount,
            %principal,
            installment_count,
            %base,
            %remainder,
            "installment plan generated"
        );

        Ok(Self {
            total_price,
            down_payment,
            down_payment_amount,
            principal,
            installment_count,
            start_date,
            frequency: PaymentFrequency::Monthly,
            installments,
        })
    }

    /// generate from persisted terms
    pub fn from_terms(terms: &InstallmentTerms) -> Result<Self> {
        terms.validate()?;
        Self::generate(
            terms.total_price,
            terms.down_payment,
            terms.installment_count,
            terms.start_date,
        )
    }

    /// installment by its 1-based number
    pub fn installment(&self, installment_no: u32) -> Option<&Installment> {
        self.installments.iter().find(|i| i.installment_no == installment_no)
    }

    pub fn total_paid(&self) -> Money {
        self.installments.iter().map(|i| i.paid_amount).sum()
    }

    pub fn outstanding(&self) -> Money {
        self.principal - self.total_paid()
    }

    /// earliest installment not yet fully paid
    pub fn next_due(&self) -> Option<&Installment> {
        self.installments.iter().find(|i| !i.is_paid())
    }

    pub fn is_fully_paid(&self) -> bool {
        self.installments.iter().all(Installment::is_paid)
    }

    /// re-check every plan invariant.
    ///
    /// plans are persisted and handed back by the caller, so payment application
    /// starts here rather than trusting the input
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| -> Result<()> { Err(FinanceError::invalid_input(message)) };

        if self.installment_count < 1
            || self.installments.len() != self.installment_count as usize
        {
            return invalid(format!(
                "plan declares {} installments but carries {}",
                self.installment_count,
                self.installments.len()
            ));
        }

        let down = self.down_payment.resolve(self.total_price)?;
        if down != self.down_payment_amount {
            return invalid(format!(
                "down payment resolves to {down}, plan records {}",
                self.down_payment_amount
            ));
        }
        if self.principal != self.total_price - self.down_payment_amount {
            return invalid(format!(
                "principal {} does not equal price {} less down payment {}",
                self.principal, self.total_price, self.down_payment_amount
            ));
        }

        let scheduled: Money = self.installments.iter().map(|i| i.amount).sum();
        if scheduled != self.principal {
            return invalid(format!(
                "installments sum to {scheduled}, principal is {}",
                self.principal
            ));
        }

        for (offset, installment) in (0u32..).zip(&self.installments) {
            let no = installment.installment_no;
            if no != offset + 1 {
                return invalid(format!(
                    "installment {no} is out of sequence at position {}",
                    offset + 1
                ));
            }
            if installment.due_date != add_months(self.start_date, offset)? {
                return invalid(format!(
                    "installment {no} has an off-schedule due date {}",
                    installment.due_date
                ));
            }
            if installment.amount.is_negative()
                || installment.paid_amount.is_negative()
                || installment.paid_amount > installment.amount
            {
                return invalid(format!(
                    "installment {no} has paid {} against amount {}",
                    installment.paid_amount, installment.amount
                ));
            }
            if installment.status != status_for(installment.amount, installment.paid_amount) {
                return invalid(format!(
                    "installment {no} status {:?} does not match its payments",
                    installment.status
                ));
            }
        }

        Ok(())
    }
}

/// generate a monthly installment plan for a sale
pub fn generate_installment_plan(
    total_price: Money,
    down_payment: DownPayment,
    installment_count: u32,
    start_date: NaiveDate,
) -> Result<InstallmentPlan> {
    InstallmentPlan::generate(total_price, down_payment, installment_count, start_date)
}
