//! Core business logic abstractions

pub mod comparison;
pub mod config;
pub mod interest;
pub mod log;
pub mod rates;
pub mod simulation;

// Re-export main types for cleaner imports
pub use comparison::{BestOption, CalculationInput, ComparisonResult, InputError};
pub use interest::{CalculationResult, RateKind};
pub use rates::{Currency, ExchangeRateProvider, RateLookupError, RateQuote};
pub use simulation::{SimulationReport, simulate};
