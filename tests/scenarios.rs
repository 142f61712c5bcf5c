use chrono::NaiveDate;
use property_finance_rs::{
    amortize_loan, apply_payment, audit_json, evaluate_overdue, generate_installment_plan,
    resolve_commission, AgingBucket, CommissionBasis, CommissionRule, DownPayment, FinanceError,
    InstallmentStatus, Money, ProjectId, ProjectScope, Sale, SizeRange,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn project_flat_fee_beats_global_percent() {
    let up_to_ten = SizeRange::between(dec!(0), dec!(10));
    let global = CommissionRule::percent(ProjectScope::Global, up_to_ten, dec!(2)).with_priority(1);
    let project = CommissionRule::fixed(
        ProjectScope::Project(ProjectId::new("projectX")),
        SizeRange::between(dec!(5), dec!(10)),
        Money::from_major(50_000),
    )
    .with_priority(1);

    let sale = Sale::new("projectX", dec!(7), Money::from_major(5_000_000), date(2024, 2, 1));

    // rule order must not matter
    for rules in [vec![global.clone(), project.clone()], vec![project.clone(), global.clone()]] {
        let result = resolve_commission(&rules, &sale).unwrap();
        assert_eq!(result.rule_id, project.id);
        assert_eq!(result.basis, CommissionBasis::Fixed);
        assert_eq!(result.amount, Money::from_major(50_000));
    }

    // the same plot elsewhere falls back to the global 2%
    let elsewhere = Sale::new("projectY", dec!(7), Money::from_major(5_000_000), date(2024, 2, 1));
    let result = resolve_commission(&[global.clone(), project], &elsewhere).unwrap();
    assert_eq!(result.rule_id, global.id);
    assert_eq!(result.amount, Money::from_major(100_000));
}

#[test]
fn unmatched_sale_is_not_found() {
    let up_to_ten = SizeRange::between(dec!(0), dec!(10));
    let rule = CommissionRule::percent(ProjectScope::Global, up_to_ten, dec!(2));
    let sale = Sale::new("projectX", dec!(20), Money::from_major(5_000_000), date(2024, 2, 1));

    let err = resolve_commission(&[rule], &sale).unwrap_err();
    assert_eq!(
        err,
        FinanceError::NotFound {
            project_id: ProjectId::new("projectX"),
            plot_size_marla: dec!(20),
            sale_date: date(2024, 2, 1),
        }
    );
}

#[test]
fn twenty_percent_down_over_three_installments() {
    let plan = generate_installment_plan(
        Money::from_major(1_000_000),
        DownPayment::Percentage(dec!(20)),
        3,
        date(2024, 1, 31),
    )
    .unwrap();

    assert_eq!(plan.down_payment_amount, Money::from_major(200_000));
    assert_eq!(plan.principal, Money::from_major(800_000));

    let amounts: Vec<Money> = plan.installments.iter().map(|i| i.amount).collect();
    assert_eq!(
        amounts,
        vec![Money::from_major(266_666), Money::from_major(266_666), Money::from_major(266_668)]
    );

    let due: Vec<NaiveDate> = plan.installments.iter().map(|i| i.due_date).collect();
    assert_eq!(due, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
}

#[test]
fn payments_and_aging_over_a_plan() {
    let plan = generate_installment_plan(
        Money::from_major(1_000_000),
        DownPayment::Percentage(dec!(20)),
        3,
        date(2024, 1, 31),
    )
    .unwrap();

    let plan = apply_payment(&plan, 1, Money::from_major(266_666)).unwrap();
    let plan = apply_payment(&plan, 2, Money::from_major(100_000)).unwrap();
    assert_eq!(plan.installments[1].status, InstallmentStatus::PartiallyPaid);

    let overdue = evaluate_overdue(&plan, date(2024, 5, 1));
    let summary: Vec<(u32, i64, AgingBucket)> = overdue
        .iter()
        .map(|e| (e.installment.installment_no, e.days_overdue, e.bucket))
        .collect();
    assert_eq!(
        summary,
        vec![(2, 62, AgingBucket::Days61To90), (3, 31, AgingBucket::Days31To60)]
    );
    assert_eq!(overdue[0].outstanding(), Money::from_major(166_666));

    let err = apply_payment(&plan, 3, Money::from_major(266_669)).unwrap_err();
    assert!(matches!(err, FinanceError::Overpayment { installment_no: Some(3), .. }));
}

#[test]
fn twenty_year_home_loan() {
    let loan = amortize_loan(
        Money::from_major(10_000_000),
        DownPayment::Amount(Money::from_major(2_000_000)),
        dec!(12),
        240,
    )
    .unwrap();

    assert_eq!(loan.schedule.len(), 240);
    assert_eq!(loan.schedule.last().unwrap().remaining_balance, Money::ZERO);

    let principal: Money = loan.schedule.iter().map(|row| row.principal_portion).sum();
    assert_eq!(principal, Money::from_major(8_000_000));

    let payable: Money = loan.schedule.iter().map(|row| row.payment).sum();
    assert_eq!(payable, loan.total_payable);
    assert_eq!(loan.total_interest, loan.total_payable - Money::from_major(8_000_000));
}

#[test]
fn zero_rate_loan_has_no_interest() {
    let price = Money::from_major(3_600_000);
    let loan = amortize_loan(price, DownPayment::none(), Decimal::ZERO, 36).unwrap();

    assert_eq!(loan.monthly_emi, Money::from_major(100_000));
    assert!(loan.schedule.iter().all(|row| row.interest_portion == Money::ZERO));
    assert_eq!(loan.total_interest, Money::ZERO);
}

#[test]
fn identical_inputs_give_identical_json() {
    let build = || {
        let plan = generate_installment_plan(
            Money::from_major(2_750_000),
            DownPayment::Percentage(dec!(15)),
            18,
            date(2024, 3, 31),
        )
        .unwrap();
        let loan = amortize_loan(
            Money::from_major(2_750_000),
            DownPayment::Percentage(dec!(15)),
            dec!(11.5),
            60,
        )
        .unwrap();
        (audit_json(&plan).unwrap(), audit_json(&loan).unwrap())
    };

    assert_eq!(build(), build());
}
