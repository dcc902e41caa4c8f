//! Interest income versus holding foreign currency over the same term.

use crate::core::interest::RateKind;
use crate::core::rates::{Currency, RateQuote};
use chrono::{Duration, NaiveDate};
use std::fmt::Display;
use thiserror::Error;

/// How far back a start or end date may reach.
pub const MAX_HISTORY_DAYS: i64 = 10 * 365;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("End date must be after the start date")]
    EndNotAfterStart,
    #[error("Start date {date} must be between {earliest} and {latest}")]
    StartOutOfRange {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    #[error("End date {date} must be between {earliest} and {latest}")]
    EndOutOfRange {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    #[error("Principal must be a non-negative amount, got {0}")]
    InvalidPrincipal(f64),
    #[error("Interest rate must be a finite percentage, got {0}")]
    InvalidRate(f64),
    #[error("Withholding must be between 0 and 100 percent, got {0}")]
    InvalidWithholding(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInput {
    /// Deposit in TRY.
    pub principal: f64,
    pub rate_kind: RateKind,
    /// Annual percent for simple interest, daily percent for compound.
    pub rate_value: f64,
    pub withholding_percent: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CalculationInput {
    /// Checks the input against the date window ending at `today` and
    /// returns the term length in days.
    pub fn validate(&self, today: NaiveDate) -> Result<u32, InputError> {
        if self.end <= self.start {
            return Err(InputError::EndNotAfterStart);
        }

        let earliest = today - Duration::days(MAX_HISTORY_DAYS);
        let latest_start = today.pred_opt().unwrap_or(today);
        if self.start < earliest || self.start > latest_start {
            return Err(InputError::StartOutOfRange {
                date: self.start,
                earliest,
                latest: latest_start,
            });
        }
        if self.end < earliest || self.end > today {
            return Err(InputError::EndOutOfRange {
                date: self.end,
                earliest,
                latest: today,
            });
        }

        if !self.principal.is_finite() || self.principal < 0.0 {
            return Err(InputError::InvalidPrincipal(self.principal));
        }
        if !self.rate_value.is_finite() {
            return Err(InputError::InvalidRate(self.rate_value));
        }
        if !(0.0..=100.0).contains(&self.withholding_percent) {
            return Err(InputError::InvalidWithholding(self.withholding_percent));
        }

        let days = (self.end - self.start).num_days();
        u32::try_from(days).map_err(|_| InputError::EndNotAfterStart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestOption {
    Interest,
    Usd,
    Eur,
}

impl Display for BestOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BestOption::Interest => "Interest",
                BestOption::Usd => "USD",
                BestOption::Eur => "EUR",
            }
        )
    }
}

/// Picks the largest total. Ties go to interest, then USD.
pub fn best_option(interest_total: f64, usd_total: f64, eur_total: f64) -> BestOption {
    if interest_total >= usd_total && interest_total >= eur_total {
        BestOption::Interest
    } else if usd_total >= eur_total {
        BestOption::Usd
    } else {
        BestOption::Eur
    }
}

/// TRY value at the end of the term of `principal` converted to foreign
/// currency at the start.
pub fn fx_counterfactual(principal: f64, start_rate: f64, end_rate: f64) -> f64 {
    principal / start_rate * end_rate
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonResult {
    /// Net TRY balance after interest and withholding.
    pub net_balance: f64,
    pub usd_total: f64,
    pub eur_total: f64,
    pub best: BestOption,
}

impl ComparisonResult {
    pub fn new(net_balance: f64, principal: f64, start: &RateQuote, end: &RateQuote) -> Self {
        let usd_total = fx_counterfactual(
            principal,
            start.rate(Currency::Usd),
            end.rate(Currency::Usd),
        );
        let eur_total = fx_counterfactual(
            principal,
            start.rate(Currency::Eur),
            end.rate(Currency::Eur),
        );
        ComparisonResult {
            net_balance,
            usd_total,
            eur_total,
            best: best_option(net_balance, usd_total, eur_total),
        }
    }

    /// The three totals in display order.
    pub fn totals(&self) -> [(BestOption, f64); 3] {
        [
            (BestOption::Interest, self.net_balance),
            (BestOption::Usd, self.usd_total),
            (BestOption::Eur, self.eur_total),
        ]
    }
}
