/// installments - plan, pay, and age a buyer's schedule
use property_finance_rs::installments::aging_report_now;
use property_finance_rs::serialization::PlanView;
use property_finance_rs::{
    allocate_payment, apply_payment, DownPayment, InstallmentPlan, InstallmentTermsBuilder, Money,
    SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== installments example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    // plan starts today on the controlled clock
    let terms = InstallmentTermsBuilder::new()
        .total_price(Money::from_major(1_000_000))
        .down_payment(DownPayment::Percentage(dec!(20)))
        .installment_count(3)
        .build_with_time(&time)?;
    let plan = InstallmentPlan::from_terms(&terms)?;

    for installment in &plan.installments {
        println!(
            "#{} due {} amount {}",
            installment.installment_no, installment.due_date, installment.amount
        );
    }

    // first installment paid in two parts
    let plan = apply_payment(&plan, 1, Money::from_major(100_000))?;
    let plan = apply_payment(&plan, 1, Money::from_major(166_666))?;

    // three months on, nothing else has been paid
    controller.advance(Duration::days(90));
    let report = aging_report_now(&plan, &time);
    println!("\naging as of {}:", report.as_of);
    for bucket in &report.buckets {
        println!("  {:>5}: {} installments, {}", bucket.bucket, bucket.count, bucket.outstanding);
    }

    // buyer clears the arrears with one transfer
    let allocation = allocate_payment(&plan, report.total_overdue)?;
    for line in &allocation.lines {
        println!("applied {} to #{} -> {:?}", line.applied, line.installment_no, line.status);
    }

    println!("\n{}", PlanView::from_plan(&allocation.plan).to_json_pretty()?);

    Ok(())
}
