//! Interest income on a TRY deposit.

use std::fmt::Display;

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateKind {
    /// Annual percent rate applied linearly over the term.
    Simple,
    /// Daily percent rate compounded every day of the term.
    Compound,
}

impl Display for RateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateKind::Simple => "Simple (annual %)",
                RateKind::Compound => "Compound (daily %)",
            }
        )
    }
}

impl RateKind {
    pub fn calculate(&self, principal: f64, rate_percent: f64, days: u32) -> InterestOutcome {
        match self {
            RateKind::Simple => simple_interest(principal, rate_percent, days),
            RateKind::Compound => compound_interest(principal, rate_percent / 100.0, days),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestOutcome {
    pub final_balance: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationResult {
    pub gross_interest: f64,
    pub withheld_amount: f64,
    pub net_gain: f64,
    pub net_balance: f64,
}

/// Credits `daily_rate` to the running balance once per day.
pub fn compound_interest(principal: f64, daily_rate: f64, days: u32) -> InterestOutcome {
    let mut balance = principal;
    for _ in 0..days {
        balance *= 1.0 + daily_rate;
    }
    InterestOutcome {
        final_balance: balance,
        total_interest: balance - principal,
    }
}

pub fn simple_interest(principal: f64, annual_rate_percent: f64, days: u32) -> InterestOutcome {
    let total_interest =
        principal * (annual_rate_percent / 100.0) * (f64::from(days) / DAYS_PER_YEAR);
    InterestOutcome {
        final_balance: principal + total_interest,
        total_interest,
    }
}

/// Deducts withholding tax from the interest, independent of how it accrued.
pub fn apply_withholding(
    principal: f64,
    outcome: &InterestOutcome,
    withholding_percent: f64,
) -> CalculationResult {
    let gross_interest = outcome.total_interest;
    let withheld_amount = gross_interest * (withholding_percent / 100.0);
    let net_gain = gross_interest - withheld_amount;
    CalculationResult {
        gross_interest,
        withheld_amount,
        net_gain,
        net_balance: principal + net_gain,
    }
}
