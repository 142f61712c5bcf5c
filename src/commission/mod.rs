pub mod resolver;
pub mod rule;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{FinanceError, Result};
use crate::types::{CommissionBasis, ProjectId, RuleId};

pub use resolver::{rank, resolve_commission, CommissionResolver};
pub use rule::{CommissionRule, ProjectScope, SizeRange};

/// plot sale submitted for commission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub project_id: ProjectId,
    pub plot_size_marla: Decimal,
    pub sale_price: Money,
    pub sale_date: NaiveDate,
}

impl Sale {
    pub fn new(
        project_id: impl Into<String>,
        plot_size_marla: Decimal,
        sale_price: Money,
        sale_date: NaiveDate,
    ) -> Self {
        Self {
            project_id: ProjectId::new(project_id),
            plot_size_marla,
            sale_price,
            sale_date,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.plot_size_marla <= Decimal::ZERO {
            return Err(FinanceError::invalid_input(format!(
                "plot size {} marla must be positive",
                self.plot_size_marla
            )));
        }
        if !self.sale_price.is_positive() {
            return Err(FinanceError::invalid_input(format!(
                "sale price {} must be positive",
                self.sale_price
            )));
        }
        self.sale_price.ensure_in_range()?;
        Ok(())
    }
}

/// resolved commission, with the applied rule kept for audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionResult {
    pub rule_id: RuleId,
    pub amount: Money,
    pub basis: CommissionBasis,
    pub value: Decimal,
}

/// outcome of the resolution filters for a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVerdict {
    Inactive,
    OutsideEffectiveWindow,
    PlotSizeOutOfRange,
    OtherProject,
    Eligible,
}

/// per-rule audit line produced by [`CommissionResolver::explain`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub rule_id: RuleId,
    pub verdict: RuleVerdict,
    /// set on the single winning rule
    pub selected: bool,
}

/// every rule's verdict together with how resolution ended
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub evaluations: Vec<RuleEvaluation>,
    pub outcome: Result<CommissionResult>,
}

impl Explanation {
    pub fn winner(&self) -> Option<&RuleEvaluation> {
        self.evaluations.iter().find(|evaluation| evaluation.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sale_validation() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert!(Sale::new("p", dec!(5), Money::from_major(1_000), day).validate().is_ok());
        assert!(Sale::new("p", dec!(0), Money::from_major(1_000), day).validate().is_err());
        assert!(Sale::new("p", dec!(5), Money::ZERO, day).validate().is_err());
        assert!(Sale::new("p", dec!(5), Money::MAX, day).validate().is_ok());
        assert!(Sale::new("p", dec!(5), Money::MAX + Money::ONE, day).validate().is_err());
    }

    #[test]
    fn test_fractional_sale_price_is_rejected() {
        let json = r#"{
            "project_id": "projectX",
            "plot_size_marla": "7",
            "sale_price": "1000000.5",
            "sale_date": "2024-03-01"
        }"#;
        let err = serde_json::from_str::<Sale>(json).unwrap_err();
        assert!(err.to_string().contains("not a whole currency unit"));

        let whole = json.replace("1000000.5", "1000000");
        let sale: Sale = serde_json::from_str(&whole).unwrap();
        assert_eq!(sale.sale_price, Money::from_major(1_000_000));
    }
}
