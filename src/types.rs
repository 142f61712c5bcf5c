use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{FinanceError, Result};

/// unique identifier for a commission rule
pub type RuleId = Uuid;

/// identifier of a project, as issued by the project registry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        ProjectId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        ProjectId::new(id)
    }
}

/// down payment, either absolute or as a share of the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownPayment {
    Amount(Money),
    /// percentage of the price (e.g., 20 for 20%)
    Percentage(Decimal),
}

impl DownPayment {
    pub fn none() -> Self {
        DownPayment::Amount(Money::ZERO)
    }

    /// resolve to an absolute amount against `total`.
    ///
    /// Fails when the resolved amount is negative or exceeds `total`.
    pub fn resolve(&self, total: Money) -> Result<Money> {
        let amount = match self {
            DownPayment::Amount(amount) => *amount,
            DownPayment::Percentage(pct) => total.percentage(*pct)?,
        };

        if amount.is_negative() {
            return Err(FinanceError::invalid_input(format!(
                "down payment {amount} is negative"
            )));
        }
        if amount > total {
            return Err(FinanceError::invalid_input(format!(
                "down payment {amount} exceeds price {total}"
            )));
        }

        Ok(amount)
    }
}

/// commission rule kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionBasis {
    /// percentage of the sale price
    Percent,
    /// flat amount per sale
    Fixed,
}

/// installment payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Pending,
    PartiallyPaid,
    Paid,
}

/// installment frequency; plans are monthly only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
}

/// interest rate kind on a loan request.
///
/// informational: both kinds amortize identically at request time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    #[default]
    Fixed,
    Floating,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_down_payment_percentage() {
        let total = Money::from_major(1_000_000);
        let down = DownPayment::Percentage(dec!(20)).resolve(total).unwrap();
        assert_eq!(down, Money::from_major(200_000));
    }

    #[test]
    fn test_down_payment_bounds() {
        let total = Money::from_major(1_000);

        assert_eq!(DownPayment::Amount(total).resolve(total).unwrap(), total);
        assert_eq!(DownPayment::none().resolve(total).unwrap(), Money::ZERO);

        assert!(DownPayment::Amount(Money::from_major(1_001)).resolve(total).is_err());
        assert!(DownPayment::Amount(Money::from_major(-1)).resolve(total).is_err());
        assert!(DownPayment::Percentage(dec!(120)).resolve(total).is_err());
        assert!(DownPayment::Percentage(dec!(-5)).resolve(total).is_err());
    }

    #[test]
    fn test_down_payment_json_shape() {
        let json = serde_json::to_string(&DownPayment::Percentage(dec!(20))).unwrap();
        assert_eq!(json, r#"{"percentage":"20"}"#);

        let parsed: DownPayment = serde_json::from_str(r#"{"amount":"2000000"}"#).unwrap();
        assert_eq!(parsed, DownPayment::Amount(Money::from_major(2_000_000)));
    }
}
