/// loan schedule - reducing-balance EMI for a home loan
use property_finance_rs::serialization::LoanView;
use property_finance_rs::{LoanAmortization, LoanTerms};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== loan schedule example ===\n");

    let terms = LoanTerms::from_json(
        r#"{
            "property_value": "10000000",
            "down_payment": { "amount": "2000000" },
            "annual_rate_percent": "12",
            "tenure_months": 240,
            "rate_kind": "floating"
        }"#,
    )?;
    let loan = LoanAmortization::from_terms(&terms)?;

    println!("{}", LoanView::from_loan(&loan).to_json_pretty()?);

    println!("\nfirst year:");
    println!(
        "{:>5} {:>10} {:>10} {:>10} {:>12}",
        "month", "payment", "principal", "interest", "balance"
    );
    for row in loan.schedule.iter().take(12) {
        println!(
            "{:>5} {:>10} {:>10} {:>10} {:>12}",
            row.month,
            row.payment,
            row.principal_portion,
            row.interest_portion,
            row.remaining_balance
        );
    }

    for year in [5, 10, 15] {
        if let Some(balance) = loan.balance_after(year * 12) {
            println!("balance after {year} years: {balance}");
        }
    }

    Ok(())
}
