//! Exchange rate abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Foreign currencies the comparison is made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Eur,
}

impl Currency {
    /// Value of the `Kod` attribute in the central bank feed.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

/// Bank-note selling rates in TRY per one unit of foreign currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateQuote {
    /// Date the quote was actually published for.
    pub date: NaiveDate,
    pub usd: f64,
    pub eur: f64,
}

impl RateQuote {
    pub fn rate(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLookupError {
    #[error("No exchange rate published within {attempts} days up to {requested}")]
    NotFound { requested: NaiveDate, attempts: usize },
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Fetches the most recently published rates.
    async fn fetch_current(&self) -> Result<RateQuote>;

    /// Fetches the rates published for exactly `date`. Fails when nothing was
    /// published that day.
    async fn fetch_day(&self, date: NaiveDate) -> Result<RateQuote>;
}
