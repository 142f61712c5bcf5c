use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{FinanceError, Result};
use crate::types::{DownPayment, PaymentFrequency, RateKind};

/// persisted terms of a buyer installment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentTerms {
    pub total_price: Money,
    pub down_payment: DownPayment,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub frequency: PaymentFrequency,
}

impl InstallmentTerms {
    /// monthly plan terms
    pub fn monthly(
        total_price: Money,
        down_payment: DownPayment,
        installment_count: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            total_price,
            down_payment,
            installment_count,
            start_date,
            frequency: PaymentFrequency::Monthly,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.total_price.is_positive() {
            return Err(FinanceError::invalid_input(format!(
                "total price {} must be positive",
                self.total_price
            )));
        }
        self.total_price.ensure_in_range()?;
        if self.installment_count < 1 {
            return Err(FinanceError::invalid_input("installment count must be at least 1"));
        }
        self.down_payment.resolve(self.total_price)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FinanceError::invalid_input(format!("installment terms: {e}")))
    }
}

/// persisted terms of a loan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub property_value: Money,
    pub down_payment: DownPayment,
    /// annual rate in percent (e.g., 12 for 12%)
    pub annual_rate_percent: Decimal,
    pub tenure_months: u32,
    #[serde(default)]
    pub rate_kind: RateKind,
}

impl LoanTerms {
    pub fn fixed_rate(
        property_value: Money,
        down_payment: DownPayment,
        annual_rate_percent: Decimal,
        tenure_months: u32,
    ) -> Self {
        Self {
            property_value,
            down_payment,
            annual_rate_percent,
            tenure_months,
            rate_kind: RateKind::Fixed,
        }
    }

    /// floating-rate request, priced at today's rate
    pub fn floating_rate(
        property_value: Money,
        down_payment: DownPayment,
        annual_rate_percent: Decimal,
        tenure_months: u32,
    ) -> Self {
        Self {
            rate_kind: RateKind::Floating,
            ..Self::fixed_rate(property_value, down_payment, annual_rate_percent, tenure_months)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tenure_months < 1 {
            return Err(FinanceError::invalid_input("tenure must be at least 1 month"));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(FinanceError::invalid_input(format!(
                "annual rate {}% must not be negative",
                self.annual_rate_percent
            )));
        }

        self.property_value.ensure_in_range()?;
        let down = self.down_payment.resolve(self.property_value)?;
        let loan_amount = self.property_value - down;
        if !loan_amount.is_positive() {
            return Err(FinanceError::invalid_input(format!(
                "loan amount {loan_amount} must be positive"
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FinanceError::invalid_input(format!("loan terms: {e}")))
    }
}

/// builder for installment terms
#[derive(Debug, Default)]
pub struct InstallmentTermsBuilder {
    total_price: Option<Money>,
    down_payment: Option<DownPayment>,
    installment_count: Option<u32>,
    start_date: Option<NaiveDate>,
}

impl InstallmentTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_price(mut self, price: Money) -> Self {
        self.total_price = Some(price);
        self
    }

    pub fn down_payment(mut self, down_payment: DownPayment) -> Self {
        self.down_payment = Some(down_payment);
        self
    }

    pub fn installment_count(mut self, count: u32) -> Self {
        self.installment_count = Some(count);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn build(self) -> Result<InstallmentTerms> {
        let start_date = self
            .start_date
            .ok_or_else(|| FinanceError::invalid_input("start date required"))?;
        self.finish(start_date)
    }

    /// build, starting today on the given clock unless a start date was set
    pub fn build_with_time(self, time: &SafeTimeProvider) -> Result<InstallmentTerms> {
        let start_date = self.start_date.unwrap_or_else(|| time.now().date_naive());
        self.finish(start_date)
    }

    fn finish(self, start_date: NaiveDate) -> Result<InstallmentTerms> {
        let total_price = self
            .total_price
            .ok_or_else(|| FinanceError::invalid_input("total price required"))?;
        let installment_count = self
            .installment_count
            .ok_or_else(|| FinanceError::invalid_input("installment count required"))?;

        let terms = InstallmentTerms::monthly(
            total_price,
            self.down_payment.unwrap_or_else(DownPayment::none),
            installment_count,
            start_date,
        );
        terms.validate()?;
        Ok(terms)
    }
}

/// builder for loan terms
#[derive(Debug, Default)]
pub struct LoanTermsBuilder {
    property_value: Option<Money>,
    down_payment: Option<DownPayment>,
    annual_rate_percent: Option<Decimal>,
    tenure_months: Option<u32>,
    rate_kind: Option<RateKind>,
}

impl LoanTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property_value(mut self, value: Money) -> Self {
        self.property_value = Some(value);
        self
    }

    pub fn down_payment(mut self, down_payment: DownPayment) -> Self {
        self.down_payment = Some(down_payment);
        self
    }

    pub fn annual_rate_percent(mut self, rate: Decimal) -> Self {
        self.annual_rate_percent = Some(rate);
        self
    }

    pub fn tenure_months(mut self, months: u32) -> Self {
        self.tenure_months = Some(months);
        self
    }

    pub fn rate_kind(mut self, kind: RateKind) -> Self {
        self.rate_kind = Some(kind);
        self
    }

    pub fn build(self) -> Result<LoanTerms> {
        let property_value = self
            .property_value
            .ok_or_else(|| FinanceError::invalid_input("property value required"))?;
        let annual_rate_percent = self
            .annual_rate_percent
            .ok_or_else(|| FinanceError::invalid_input("annual rate required"))?;
        let tenure_months = self
            .tenure_months
            .ok_or_else(|| FinanceError::invalid_input("tenure required"))?;

        let terms = LoanTerms {
            property_value,
            down_payment: self.down_payment.unwrap_or_else(DownPayment::none),
            annual_rate_percent,
            tenure_months,
            rate_kind: self.rate_kind.unwrap_or_default(),
        };
        terms.validate()?;
        Ok(terms)
    }
}
