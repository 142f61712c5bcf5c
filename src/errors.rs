use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::{ProjectId, RuleId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinanceError {
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error(
        "no commission rule applies to a {plot_size_marla} marla plot \
         in project {project_id} sold on {sale_date}"
    )]
    NotFound {
        project_id: ProjectId,
        plot_size_marla: Decimal,
        sale_date: NaiveDate,
    },

    #[error("ambiguous commission rules: {rule_ids:?} tie on scope, priority and size range")]
    AmbiguousRule {
        rule_ids: Vec<RuleId>,
    },

    /// `installment_no` is `None` when a lump sum exceeds the whole plan's outstanding amount
    #[error(
        "overpayment{}: remaining {remaining}, attempted {attempted}",
        .installment_no.map(|no| format!(" on installment {no}")).unwrap_or_default()
    )]
    Overpayment {
        installment_no: Option<u32>,
        remaining: Money,
        attempted: Money,
    },
}

impl FinanceError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        FinanceError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinanceError>;
