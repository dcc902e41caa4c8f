//! Runs one interest-versus-currency comparison end to end.

use crate::core::comparison::{CalculationInput, ComparisonResult};
use crate::core::interest::{CalculationResult, apply_withholding};
use crate::core::rates::{ExchangeRateProvider, RateQuote};
use crate::providers::util::{WalkBack, fetch_historical};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Everything needed to present a comparison, as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub input: CalculationInput,
    pub days: u32,
    pub calculation: CalculationResult,
    pub current: RateQuote,
    /// Net TRY balance expressed in USD at the current rate.
    pub net_balance_usd: f64,
    /// Net TRY balance expressed in EUR at the current rate.
    pub net_balance_eur: f64,
    pub start_quote: RateQuote,
    pub end_quote: RateQuote,
    pub comparison: ComparisonResult,
}

/// Validates `input`, computes the interest scenario and compares it against
/// holding USD or EUR over the same term.
///
/// Input errors are returned as [`InputError`](crate::core::InputError)
/// inside the `anyhow::Error` before any rate is fetched.
pub async fn simulate(
    input: &CalculationInput,
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    policy: &WalkBack,
    today: NaiveDate,
) -> Result<SimulationReport> {
    let days = input.validate(today)?;
    info!(days, kind = %input.rate_kind, "Simulating deposit");

    let outcome = input
        .rate_kind
        .calculate(input.principal, input.rate_value, days);
    let calculation = apply_withholding(input.principal, &outcome, input.withholding_percent);
    debug!(?calculation, "Calculated interest");

    let current = provider
        .fetch_current()
        .await
        .context("Failed to fetch current exchange rates")?;

    let start_quote = fetch_historical(provider, input.start, policy).await?;
    let end_quote = fetch_historical(provider, input.end, policy).await?;
    debug!(?start_quote, ?end_quote, "Resolved historical rates");

    let comparison =
        ComparisonResult::new(calculation.net_balance, input.principal, &start_quote, &end_quote);

    Ok(SimulationReport {
        input: input.clone(),
        days,
        calculation,
        net_balance_usd: calculation.net_balance / current.usd,
        net_balance_eur: calculation.net_balance / current.eur,
        current,
        start_quote,
        end_quote,
        comparison,
    })
}
