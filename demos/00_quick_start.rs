/// quick start - price a plot sale end to end
use property_finance_rs::{
    amortize_loan, generate_installment_plan, resolve_commission, CommissionRule, DownPayment,
    Money, ProjectScope, Sale, SizeRange,
};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sale_date = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?;

    // 2% on every plot up to 10 marla
    let rules = vec![CommissionRule::percent(
        ProjectScope::Global,
        SizeRange::between(dec!(0), dec!(10)),
        dec!(2),
    )];
    let sale = Sale::new("green-valley", dec!(5), Money::from_major(2_500_000), sale_date);
    let commission = resolve_commission(&rules, &sale)?;
    println!("commission: {}", commission.amount);

    // 25% down, rest over 12 months
    let plan = generate_installment_plan(
        sale.sale_price,
        DownPayment::Percentage(dec!(25)),
        12,
        sale_date,
    )?;
    println!("monthly installment: {}", plan.installments[0].amount);

    // or finance it at 14% over 10 years
    let loan = amortize_loan(sale.sale_price, DownPayment::Percentage(dec!(25)), dec!(14), 120)?;
    println!("monthly emi: {}", loan.monthly_emi);

    Ok(())
}
