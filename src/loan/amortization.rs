use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::LoanTerms;
use crate::decimal::{Money, Rate};
use crate::errors::{FinanceError, Result};
use crate::types::{DownPayment, RateKind};

use super::emi::calculate_emi;

/// one month of a loan repayment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// reducing-balance loan request priced into a monthly schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAmortization {
    pub property_value: Money,
    pub down_payment: DownPayment,
    pub down_payment_amount: Money,
    pub loan_amount: Money,
    /// annual rate
    pub annual_rate: Rate,
    pub tenure_months: u32,
    pub rate_kind: RateKind,
    pub monthly_emi: Money,
    pub schedule: Vec<PaymentRow>,
    pub total_payable: Money,
    pub total_interest: Money,
}

impl LoanAmortization {
    /// price a loan and build its schedule.
    ///
    /// the last month pays off whatever balance is left, so its payment can
    /// differ from the EMI by the accumulated rounding
    pub fn generate(
        property_value: Money,
        down_payment: DownPayment,
        annual_rate_percent: Decimal,
        tenure_months: u32,
        rate_kind: RateKind,
    ) -> Result<Self> {
        if tenure_months < 1 {
            return Err(FinanceError::invalid_input("tenure must be at least 1 month"));
        }
        if annual_rate_percent < Decimal::ZERO {
            return Err(FinanceError::invalid_input(format!(
                "annual rate {annual_rate_percent}% must not be negative"
            )));
        }

        property_value.ensure_in_range()?;
        let down_payment_amount = down_payment.resolve(property_value)?;
        let loan_amount = property_value - down_payment_amount;
        if !loan_amount.is_positive() {
            return Err(FinanceError::invalid_input(format!(
                "loan amount {loan_amount} must be positive \
                 (value {property_value}, down payment {down_payment_amount})"
            )));
        }

        let annual_rate = Rate::from_percent(annual_rate_percent);
        let monthly_rate = annual_rate.monthly_rate();
        let monthly_emi = calculate_emi(loan_amount, monthly_rate, tenure_months)?;
        let schedule = build_schedule(loan_amount, monthly_rate, monthly_emi, tenure_months);

        let total_payable: Money = schedule.iter().map(|row| row.payment).sum();
        let total_interest = total_payable - loan_amount;

        debug!(
            %loan_amount,
            %annual_rate,
            tenure_months,
            %monthly_emi,
            %total_payable,
            %total_interest,
            "loan amortized"
        );

        Ok(Self {
            property_value,
            down_payment,
            down_payment_amount,
            loan_amount,
            annual_rate,
            tenure_months,
            rate_kind,
            monthly_emi,
            schedule,
            total_payable,
            total_interest,
        })
    }

    /// amortize persisted loan terms
    pub fn from_terms(terms: &LoanTerms) -> Result<Self> {
        terms.validate()?;
        Self::generate(
            terms.property_value,
            terms.down_payment,
            terms.annual_rate_percent,
            terms.tenure_months,
            terms.rate_kind,
        )
    }

    /// schedule row for a 1-based month
    pub fn row(&self, month: u32) -> Option<&PaymentRow> {
        month
            .checked_sub(1)
            .and_then(|index| self.schedule.get(index as usize))
    }

    /// balance left after `month` payments; month 0 is the full loan amount
    pub fn balance_after(&self, month: u32) -> Option<Money> {
        if month == 0 {
            return Some(self.loan_amount);
        }
        self.row(month).map(|row| row.remaining_balance)
    }

    pub fn total_principal(&self) -> Money {
        self.schedule.iter().map(|row| row.principal_portion).sum()
    }
}

fn build_schedule(
    loan_amount: Money,
    monthly_rate: Rate,
    emi: Money,
    months: u32,
) -> Vec<PaymentRow> {
    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = loan_amount;

    for month in 1..=months {
        let interest_portion = balance * monthly_rate.as_decimal();

        // never pay down more than is owed, nor less than nothing
        let principal_portion = if month == months {
            balance
        } else {
            (emi - interest_portion).min(balance).max(Money::ZERO)
        };
        let payment = principal_portion + interest_portion;
        let opening_balance = balance;
        balance -= principal_portion;

        trace!(month, %payment, %principal_portion, %interest_portion, %balance, "schedule row");

        schedule.push(PaymentRow {
            month,
            opening_balance,
            payment,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
        });
    }

    schedule
}

/// amortize a fixed-rate loan request
pub fn amortize_loan(
    property_value: Money,
    down_payment: DownPayment,
    annual_rate_percent: Decimal,
    tenure_months: u32,
) -> Result<LoanAmortization> {
    LoanAmortization::generate(
        property_value,
        down_payment,
        annual_rate_percent,
        tenure_months,
        RateKind::Fixed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn home_loan() -> LoanAmortization {
        amortize_loan(
            Money::from_major(10_000_000),
            DownPayment::Amount(Money::from_major(2_000_000)),
            dec!(12),
            240,
        )
        .unwrap()
    }

    #[test]
    fn test_twenty_year_schedule() {
        let loan = home_loan();

        assert_eq!(loan.loan_amount, Money::from_major(8_000_000));
        assert_eq!(loan.monthly_emi, Money::from_major(88_087));
        assert_eq!(loan.schedule.len(), 240);
        assert_eq!(loan.balance_after(240), Some(Money::ZERO));
        assert_eq!(loan.total_principal(), loan.loan_amount);
        assert_eq!(loan.total_interest, loan.total_payable - loan.loan_amount);
        assert_eq!(loan.rate_kind, RateKind::Fixed);

        let first = loan.row(1).unwrap();
        assert_eq!(first.opening_balance, Money::from_major(8_000_000));
        assert_eq!(first.interest_portion, Money::from_major(80_000));
        assert_eq!(first.principal_portion, Money::from_major(8_087));
        assert_eq!(first.payment, loan.monthly_emi);
        assert_eq!(first.remaining_balance, Money::from_major(7_991_913));
    }

    #[test]
    fn test_schedule_rows_chain() {
        let loan = home_loan();

        for pair in loan.schedule.windows(2) {
            assert_eq!(pair[0].remaining_balance, pair[1].opening_balance);
            assert_eq!(pair[1].month, pair[0].month + 1);
        }
        for row in &loan.schedule {
            assert!(!row.remaining_balance.is_negative());
            assert_eq!(row.payment, row.principal_portion + row.interest_portion);
            assert_eq!(row.remaining_balance, row.opening_balance - row.principal_portion);
        }

        // every month but the last pays the EMI
        assert!(loan.schedule[..239].iter().all(|row| row.payment == loan.monthly_emi));
        let last = loan.row(240).unwrap();
        assert!((last.payment - loan.monthly_emi).abs() < Money::from_major(240));
    }

    #[test]
    fn test_zero_rate_loan() {
        let loan = amortize_loan(
            Money::from_major(1_500_000),
            DownPayment::Percentage(dec!(20)),
            Decimal::ZERO,
            24,
        )
        .unwrap();

        assert_eq!(loan.loan_amount, Money::from_major(1_200_000));
        assert_eq!(loan.monthly_emi, Money::from_major(50_000));
        assert!(loan.schedule.iter().all(|row| row.interest_portion.is_zero()));
        assert_eq!(loan.total_interest, Money::ZERO);
        assert_eq!(loan.total_payable, loan.loan_amount);
    }

    #[test]
    fn test_rounded_up_emi_never_overpays() {
        // 10 over 12 months rounds the EMI to 1, so the loan is settled by month 10
        let loan =
            amortize_loan(Money::from_major(10), DownPayment::none(), Decimal::ZERO, 12).unwrap();

        assert_eq!(loan.monthly_emi, Money::ONE);
        assert_eq!(loan.balance_after(10), Some(Money::ZERO));
        assert_eq!(loan.row(11).unwrap().payment, Money::ZERO);
        assert_eq!(loan.row(12).unwrap().payment, Money::ZERO);
        assert_eq!(loan.total_principal(), Money::from_major(10));
        assert_eq!(loan.total_payable, Money::from_major(10));
    }

    #[test]
    fn test_final_month_takes_the_remainder() {
        // 11 over 2 months rounds the EMI to 6, leaving 5 for the last month
        let loan =
            amortize_loan(Money::from_major(11), DownPayment::none(), Decimal::ZERO, 2).unwrap();

        assert_eq!(loan.monthly_emi, Money::from_major(6));
        assert_eq!(loan.row(2).unwrap().payment, Money::from_major(5));
        assert_eq!(loan.balance_after(2), Some(Money::ZERO));
    }

    #[test]
    fn test_single_month_loan() {
        let loan =
            amortize_loan(Money::from_major(100_000), DownPayment::none(), dec!(12), 1).unwrap();

        assert_eq!(loan.schedule.len(), 1);
        assert_eq!(loan.monthly_emi, Money::from_major(101_000));
        assert_eq!(loan.total_interest, Money::from_major(1_000));
        assert_eq!(loan.balance_after(1), Some(Money::ZERO));
    }

    #[test]
    fn test_row_lookup_bounds() {
        let loan = home_loan();
        assert!(loan.row(0).is_none());
        assert!(loan.row(241).is_none());
        assert_eq!(loan.balance_after(0), Some(loan.loan_amount));
        assert_eq!(loan.balance_after(1), Some(Money::from_major(7_991_913)));
        assert!(loan.balance_after(241).is_none());
    }

    #[test]
    fn test_rejects_invalid_loans() {
        let value = Money::from_major(1_000_000);

        let no_loan = amortize_loan(value, DownPayment::Percentage(dec!(100)), dec!(10), 12);
        assert!(matches!(no_loan, Err(FinanceError::InvalidInput { .. })));

        let no_tenure = amortize_loan(value, DownPayment::none(), dec!(10), 0);
        assert!(matches!(no_tenure, Err(FinanceError::InvalidInput { .. })));

        let negative_rate = amortize_loan(value, DownPayment::none(), dec!(-1), 12);
        assert!(matches!(negative_rate, Err(FinanceError::InvalidInput { .. })));

        let big_down =
            amortize_loan(value, DownPayment::Amount(Money::from_major(2_000_000)), dec!(10), 12);
        assert!(matches!(big_down, Err(FinanceError::InvalidInput { .. })));
    }

    #[test]
    fn test_floating_rate_amortizes_identically() {
        let fixed = home_loan();
        let floating = LoanAmortization::generate(
            Money::from_major(10_000_000),
            DownPayment::Amount(Money::from_major(2_000_000)),
            dec!(12),
            240,
            RateKind::Floating,
        )
        .unwrap();

        assert_eq!(floating.rate_kind, RateKind::Floating);
        assert_eq!(floating.schedule, fixed.schedule);
        assert_eq!(floating.monthly_emi, fixed.monthly_emi);
    }

    #[test]
    fn test_schedule_json_is_stable() {
        let first = serde_json::to_string(&home_loan()).unwrap();
        let second = serde_json::to_string(&home_loan()).unwrap();
        assert_eq!(first, second);

        let back: LoanAmortization = serde_json::from_str(&first).unwrap();
        assert_eq!(back, home_loan());
    }
}
