use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{FinanceError, Result};
use crate::types::{CommissionBasis, ProjectId, RuleId};

use super::{RuleVerdict, Sale};

/// which projects a rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "project_id")]
pub enum ProjectScope {
    /// any project, unless a more specific rule wins
    Global,
    Project(ProjectId),
}

impl ProjectScope {
    pub fn project(id: impl Into<String>) -> Self {
        ProjectScope::Project(ProjectId::new(id))
    }

    pub fn is_project_specific(&self) -> bool {
        matches!(self, ProjectScope::Project(_))
    }

    pub fn admits(&self, project_id: &ProjectId) -> bool {
        match self {
            ProjectScope::Global => true,
            ProjectScope::Project(id) => id == project_id,
        }
    }
}

/// inclusive plot size range in marla; `max: None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl SizeRange {
    pub fn between(min: Decimal, max: Decimal) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn at_least(min: Decimal) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, size: Decimal) -> bool {
        size >= self.min && self.max.map_or(true, |max| size <= max)
    }

    /// `max - min`, or `None` when unbounded
    pub fn width(&self) -> Option<Decimal> {
        self.max.map(|max| max - self.min)
    }

    /// ordering by breadth: `Less` means `self` is narrower than `other`
    pub fn cmp_width(&self, other: &SizeRange) -> Ordering {
        match (self.width(), other.width()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min < Decimal::ZERO {
            return Err(FinanceError::invalid_input(format!(
                "plot size range minimum {} is negative",
                self.min
            )));
        }
        if let Some(max) = self.max {
            if max < self.min {
                return Err(FinanceError::invalid_input(format!(
                    "plot size range [{}, {}] has min above max",
                    self.min, max
                )));
            }
        }
        Ok(())
    }
}

/// commission policy record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRule {
    pub id: RuleId,
    pub project_scope: ProjectScope,
    pub plot_size_range: SizeRange,
    pub kind: CommissionBasis,
    /// percent (0-100) for percent rules, whole currency units for fixed rules
    pub value: Decimal,
    pub priority: i32,
    pub active: bool,
    pub effective_from: Option<NaiveDate>,
    pub effective_to: Option<NaiveDate>,
    pub description: String,
}

impl CommissionRule {
    pub fn new(
        project_scope: ProjectScope,
        plot_size_range: SizeRange,
        kind: CommissionBasis,
        value: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_scope,
            plot_size_range,
            kind,
            value,
            priority: 0,
            active: true,
            effective_from: None,
            effective_to: None,
            description: String::new(),
        }
    }

    /// percentage-of-price rule
    pub fn percent(project_scope: ProjectScope, plot_size_range: SizeRange, pct: Decimal) -> Self {
        Self::new(project_scope, plot_size_range, CommissionBasis::Percent, pct)
    }

    /// flat-amount rule
    pub fn fixed(project_scope: ProjectScope, plot_size_range: SizeRange, amount: Money) -> Self {
        Self::new(project_scope, plot_size_range, CommissionBasis::Fixed, amount.as_decimal())
    }

    pub fn with_id(mut self, id: RuleId) -> Self {
        self.id = id;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_effective_window(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.effective_from = from;
        self.effective_to = to;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// soft delete: the record is kept so past resolutions stay reproducible
    pub fn deactivate(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.plot_size_range.validate().map_err(|e| self.annotate(e))?;

        if self.value < Decimal::ZERO {
            return Err(self.invalid(format!("value {} is negative", self.value)));
        }
        match self.kind {
            CommissionBasis::Percent if self.value > Decimal::ONE_HUNDRED => {
                return Err(self.invalid(format!("percent value {} exceeds 100", self.value)));
            }
            CommissionBasis::Fixed => {
                Money::from_whole(self.value).map_err(|e| self.annotate(e))?;
            }
            CommissionBasis::Percent => {}
        }

        if let (Some(from), Some(to)) = (self.effective_from, self.effective_to) {
            if from > to {
                return Err(self.invalid(format!("effective window {from}..{to} is inverted")));
            }
        }

        Ok(())
    }

    /// inclusive on both bounds
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from.map_or(true, |from| date >= from)
            && self.effective_to.map_or(true, |to| date <= to)
    }

    /// first filter this rule fails for `sale`, in resolution order
    pub fn verdict(&self, sale: &Sale) -> RuleVerdict {
        if !self.active {
            RuleVerdict::Inactive
        } else if !self.is_effective_on(sale.sale_date) {
            RuleVerdict::OutsideEffectiveWindow
        } else if !self.plot_size_range.contains(sale.plot_size_marla) {
            RuleVerdict::PlotSizeOutOfRange
        } else if !self.project_scope.admits(&sale.project_id) {
            RuleVerdict::OtherProject
        } else {
            RuleVerdict::Eligible
        }
    }

    pub fn commission_for(&self, sale_price: Money) -> Result<Money> {
        let amount = match self.kind {
            CommissionBasis::Percent => sale_price.percentage(self.value),
            CommissionBasis::Fixed => Money::from_whole(self.value),
        };
        amount.map_err(|e| self.annotate(e))
    }

    fn invalid(&self, message: String) -> FinanceError {
        FinanceError::invalid_input(format!("commission rule {}: {}", self.id, message))
    }

    fn annotate(&self, err: FinanceError) -> FinanceError {
        match err {
            FinanceError::InvalidInput { message } => self.invalid(message),
            other => other,
        }
    }
}
