pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{CalculationInput, RateKind};
use crate::providers::tcmb::TcmbProvider;
use crate::providers::util::WalkBack;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// Deposit parameters as entered on the command line. Dates left out default
/// to yesterday and today.
#[derive(Debug, Clone)]
pub struct CompareArgs {
    pub principal: f64,
    pub rate_kind: RateKind,
    pub rate_value: f64,
    pub withholding_percent: f64,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl CompareArgs {
    fn into_input(self, today: NaiveDate) -> CalculationInput {
        CalculationInput {
            principal: self.principal,
            rate_kind: self.rate_kind,
            rate_value: self.rate_value,
            withholding_percent: self.withholding_percent,
            start: self
                .start
                .unwrap_or_else(|| today.pred_opt().unwrap_or(today)),
            end: self.end.unwrap_or(today),
        }
    }
}

pub enum AppCommand {
    Compare(CompareArgs),
    Rates { date: Option<NaiveDate> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_on(command, config_path, Local::now().date_naive()).await
}

/// Runs `command` as if the current date were `today`.
pub async fn run_command_on(
    command: AppCommand,
    config_path: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    info!("faizdoviz starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = TcmbProvider::new(config.tcmb_base_url(), config.request_timeout())?;
    let policy = WalkBack::new(config.lookback_attempts);

    match command {
        AppCommand::Compare(args) => {
            let input = args.into_input(today);
            cli::compare::run(&input, &provider, &policy, today).await
        }
        AppCommand::Rates { date } => cli::rates::run(&provider, &policy, date).await,
    }
}
