/// commission - project rules override global ones, with an audit trail
use property_finance_rs::serialization::CommissionView;
use property_finance_rs::{
    CommissionResolver, CommissionRule, FinanceError, Money, ProjectId, ProjectScope, Sale,
    SizeRange,
};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=property_finance_rs=trace shows every rule decision
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== commission example ===\n");

    let date = |m, d| NaiveDate::from_ymd_opt(2024, m, d).ok_or("bad date");
    let project_x = ProjectScope::Project(ProjectId::new("projectX"));

    let rules = vec![
        CommissionRule::percent(
            ProjectScope::Global,
            SizeRange::between(dec!(0), dec!(10)),
            dec!(2),
        )
        .with_priority(1)
        .with_description("standard 2%"),
        CommissionRule::fixed(
            project_x.clone(),
            SizeRange::between(dec!(5), dec!(10)),
            Money::from_major(50_000),
        )
        .with_priority(1)
        .with_description("projectX launch flat fee"),
        CommissionRule::percent(project_x, SizeRange::at_least(dec!(10)), dec!(1.5))
            .with_effective_window(Some(date(6, 1)?), None)
            .with_description("projectX large plots from june"),
    ];
    let resolver = CommissionResolver::new(&rules);

    let sale = Sale::new("projectX", dec!(7), Money::from_major(5_000_000), date(3, 10)?);
    let result = resolver.resolve(&sale)?;
    println!("{}", CommissionView::new(&sale, &result).to_json_pretty()?);

    println!("\nwhy:");
    for evaluation in &resolver.explain(&sale).evaluations {
        println!(
            "  {} {:?}{}",
            evaluation.rule_id,
            evaluation.verdict,
            if evaluation.selected { " (selected)" } else { "" }
        );
    }

    // a 12 marla plot in march has no rule yet
    let early = Sale::new("projectX", dec!(12), Money::from_major(9_000_000), date(3, 10)?);
    match resolver.explain(&early).outcome {
        Err(FinanceError::NotFound { .. }) => println!("\nno rule for a 12 marla plot in march"),
        other => println!("\nunexpected: {other:?}"),
    }

    Ok(())
}
