use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::errors::{FinanceError, Result};
use crate::types::RuleId;

use super::{CommissionResult, CommissionRule, Explanation, RuleEvaluation, RuleVerdict, Sale};

/// precedence between two eligible rules; `Greater` means `a` outranks `b`.
///
/// project scope first, then priority, then the narrower size range.
pub fn rank(a: &CommissionRule, b: &CommissionRule) -> Ordering {
    a.project_scope
        .is_project_specific()
        .cmp(&b.project_scope.is_project_specific())
        .then(a.priority.cmp(&b.priority))
        .then_with(|| b.plot_size_range.cmp_width(&a.plot_size_range))
}

/// selects the single commission rule that governs a sale
pub struct CommissionResolver<'a> {
    rules: &'a [CommissionRule],
}

impl<'a> CommissionResolver<'a> {
    pub fn new(rules: &'a [CommissionRule]) -> Self {
        Self { rules }
    }

    /// rules surviving every filter, in input order.
    ///
    /// only survivors are validated; a malformed eligible rule fails the whole call
    pub fn candidates(&self, sale: &Sale) -> Result<Vec<&'a CommissionRule>> {
        let eligible: Vec<&'a CommissionRule> = self
            .rules
            .iter()
            .filter(|rule| {
                let verdict = rule.verdict(sale);
                trace!(rule_id = %rule.id, ?verdict, "commission rule filtered");
                verdict == RuleVerdict::Eligible
            })
            .collect();

        for rule in &eligible {
            rule.validate()?;
        }
        Ok(eligible)
    }

    pub fn resolve(&self, sale: &Sale) -> Result<CommissionResult> {
        sale.validate()?;
        let candidates = self.candidates(sale)?;

        let best = candidates
            .iter()
            .copied()
            .max_by(|a, b| rank(a, b))
            .ok_or_else(|| FinanceError::NotFound {
                project_id: sale.project_id.clone(),
                plot_size_marla: sale.plot_size_marla,
                sale_date: sale.sale_date,
            })?;

        let tied: Vec<RuleId> = candidates
            .iter()
            .filter(|rule| rank(rule, best) == Ordering::Equal)
            .map(|rule| rule.id)
            .collect();
        if tied.len() > 1 {
            debug!(project_id = %sale.project_id, ?tied, "commission rules tie");
            return Err(FinanceError::AmbiguousRule { rule_ids: tied });
        }

        let amount = best.commission_for(sale.sale_price)?;
        debug!(
            rule_id = %best.id,
            project_id = %sale.project_id,
            %amount,
            candidates = candidates.len(),
            "commission resolved"
        );

        Ok(CommissionResult {
            rule_id: best.id,
            amount,
            basis: best.kind,
            value: best.value,
        })
    }

    /// verdict for every rule plus the resolution outcome, error included
    pub fn explain(&self, sale: &Sale) -> Explanation {
        let outcome = self.resolve(sale);
        let winner = outcome.as_ref().ok().map(|result| result.rule_id);

        let evaluations = self
            .rules
            .iter()
            .map(|rule| RuleEvaluation {
                rule_id: rule.id,
                verdict: rule.verdict(sale),
                selected: winner == Some(rule.id),
            })
            .collect();

        Explanation { evaluations, outcome }
    }
}

/// resolve the commission for a sale against a candidate rule set
pub fn resolve_commission(rules: &[CommissionRule], sale: &Sale) -> Result<CommissionResult> {
    CommissionResolver::new(rules).resolve(sale)
}
