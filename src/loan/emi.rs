use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};

/// `(1 + r)^n`, failing instead of wrapping when the decimal range is exceeded
pub fn compound_factor(monthly_rate: Rate, months: u32) -> Result<Decimal> {
    let base = Decimal::ONE + monthly_rate.as_decimal();

    (0..months).try_fold(Decimal::ONE, |acc, _| {
        acc.checked_mul(base).ok_or_else(|| {
            FinanceError::invalid_input(format!(
                "compounding {monthly_rate} monthly over {months} months overflows"
            ))
        })
    })
}

/// equated monthly installment on a reducing balance.
///
/// `EMI = L * r * (1+r)^n / ((1+r)^n - 1)`, or `L / n` when `r` is zero,
/// rounded to whole currency units
pub fn calculate_emi(loan_amount: Money, monthly_rate: Rate, months: u32) -> Result<Money> {
    if months == 0 {
        return Err(FinanceError::invalid_input("tenure must be at least 1 month"));
    }
    if monthly_rate.as_decimal() < Decimal::ZERO {
        return Err(FinanceError::invalid_input(format!(
            "interest rate {monthly_rate} must not be negative"
        )));
    }

    if monthly_rate.is_zero() {
        return Ok(loan_amount / Decimal::from(months));
    }

    let r = monthly_rate.as_decimal();
    let compound = compound_factor(monthly_rate, months)?;
    let overflow = || FinanceError::invalid_input(format!("emi for loan {loan_amount} overflows"));

    let numerator = loan_amount
        .as_decimal()
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .ok_or_else(overflow)?;
    let denominator = compound - Decimal::ONE;
    let emi = numerator.checked_div(denominator).ok_or_else(overflow)?;

    Ok(Money::from_decimal(emi))
}
