use crate::core::rates::{ExchangeRateProvider, RateLookupError, RateQuote};
use anyhow::Result;
use chrono::NaiveDate;
use std::future::Future;
use tracing::debug;

/// Feeds are not published on weekends and holidays; ten days covers the
/// longest holiday stretch.
pub const DEFAULT_LOOKBACK_ATTEMPTS: usize = 10;

/// Retry policy that walks a date backward one calendar day per failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkBack {
    /// Total number of attempts, including the first one on the requested date.
    pub max_attempts: usize,
}

impl Default for WalkBack {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_LOOKBACK_ATTEMPTS,
        }
    }
}

impl WalkBack {
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Runs `operation` for `start`, then for each preceding day, until it
    /// succeeds or the attempts run out.
    ///
    /// # Returns
    /// The successful value together with the date it was obtained for, or
    /// `None` once every attempt has failed
    pub async fn run<F, Fut, T>(&self, start: NaiveDate, mut operation: F) -> Option<(T, NaiveDate)>
    where
        F: FnMut(NaiveDate) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut date = start;
        for attempt in 1..=self.max_attempts {
            match operation(date).await {
                Ok(val) => return Some((val, date)),
                Err(err) => {
                    debug!(
                        "Attempt {}/{} for {} failed: {}. Stepping back...",
                        attempt, self.max_attempts, date, err
                    );
                    date = date.pred_opt()?;
                }
            }
        }
        None
    }
}

/// Resolves the quote for `date`, falling back to the nearest earlier day
/// with a published feed.
pub async fn fetch_historical(
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    date: NaiveDate,
    policy: &WalkBack,
) -> Result<RateQuote, RateLookupError> {
    policy
        .run(date, |day| provider.fetch_day(day))
        .await
        .map(|(quote, resolved)| RateQuote {
            date: resolved,
            ..quote
        })
        .ok_or(RateLookupError::NotFound {
            requested: date,
            attempts: policy.max_attempts,
        })
}
