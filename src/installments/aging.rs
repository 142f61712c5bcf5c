use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::calendar::{days_between, AgingBucket};
use crate::decimal::Money;

use super::plan::{Installment, InstallmentPlan};

/// installment past its due date and not fully paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueEntry {
    pub installment: Installment,
    pub days_overdue: i64,
    pub bucket: AgingBucket,
}

impl OverdueEntry {
    pub fn outstanding(&self) -> Money {
        self.installment.remaining()
    }
}

/// overdue installments as of a date, in installment order.
///
/// an installment due on `as_of` itself is not yet overdue
pub fn evaluate_overdue(plan: &InstallmentPlan, as_of: NaiveDate) -> Vec<OverdueEntry> {
    plan.installments
        .iter()
        .filter(|installment| !installment.is_paid() && installment.due_date < as_of)
        .map(|installment| {
            let days_overdue = days_between(installment.due_date, as_of);
            OverdueEntry {
                installment: installment.clone(),
                days_overdue,
                bucket: AgingBucket::classify(days_overdue),
            }
        })
        .collect()
}

/// overdue installments as of today on the given clock
pub fn evaluate_overdue_now(plan: &InstallmentPlan, time: &SafeTimeProvider) -> Vec<OverdueEntry> {
    evaluate_overdue(plan, time.now().date_naive())
}

/// totals for one aging bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotal {
    pub bucket: AgingBucket,
    pub count: u32,
    pub outstanding: Money,
}

/// overdue position of a plan grouped by aging bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingReport {
    pub as_of: NaiveDate,
    /// one entry per bucket, youngest first, including empty buckets
    pub buckets: Vec<BucketTotal>,
    pub overdue_count: u32,
    pub total_overdue: Money,
}

impl AgingReport {
    pub fn bucket(&self, bucket: AgingBucket) -> Option<&BucketTotal> {
        self.buckets.iter().find(|total| total.bucket == bucket)
    }
}

pub fn aging_report(plan: &InstallmentPlan, as_of: NaiveDate) -> AgingReport {
    let entries = evaluate_overdue(plan, as_of);

    let buckets = AgingBucket::ALL
        .iter()
        .map(|&bucket| {
            let in_bucket = entries.iter().filter(|entry| entry.bucket == bucket);
            BucketTotal {
                bucket,
                count: in_bucket.clone().count() as u32,
                outstanding: in_bucket.map(OverdueEntry::outstanding).sum(),
            }
        })
        .collect();

    AgingReport {
        as_of,
        buckets,
        overdue_count: entries.len() as u32,
        total_overdue: entries.iter().map(OverdueEntry::outstanding).sum(),
    }
}

pub fn aging_report_now(plan: &InstallmentPlan, time: &SafeTimeProvider) -> AgingReport {
    aging_report(plan, time.now().date_naive())
}
