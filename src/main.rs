use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use faizdoviz::core::RateKind;
use faizdoviz::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    /// Annual rate, accrued linearly
    Simple,
    /// Daily rate, compounded every day
    Compound,
}

impl From<Kind> for RateKind {
    fn from(kind: Kind) -> RateKind {
        match kind {
            Kind::Simple => RateKind::Simple,
            Kind::Compound => RateKind::Compound,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Compare deposit interest against holding USD or EUR
    Compare {
        /// Principal in TL
        #[arg(short, long)]
        principal: f64,
        /// Interest type
        #[arg(short, long, value_enum, default_value_t = Kind::Simple)]
        kind: Kind,
        /// Interest rate in percent: annual for simple, daily for compound
        #[arg(short, long)]
        rate: f64,
        /// Withholding tax in percent
        #[arg(short, long, default_value_t = 0.0)]
        withholding: f64,
        /// Start date (YYYY-MM-DD), defaults to yesterday
        #[arg(long)]
        start: Option<NaiveDate>,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Display TCMB bank-note selling rates
    Rates {
        /// Historical date (YYYY-MM-DD), defaults to the latest bulletin
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

impl From<Commands> for faizdoviz::AppCommand {
    fn from(cmd: Commands) -> faizdoviz::AppCommand {
        match cmd {
            Commands::Compare {
                principal,
                kind,
                rate,
                withholding,
                start,
                end,
            } => faizdoviz::AppCommand::Compare(faizdoviz::CompareArgs {
                principal,
                rate_kind: kind.into(),
                rate_value: rate,
                withholding_percent: withholding,
                start,
                end,
            }),
            Commands::Rates { date } => faizdoviz::AppCommand::Rates { date },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => faizdoviz::cli::setup::setup(),
        Some(cmd) => faizdoviz::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
