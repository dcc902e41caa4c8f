//! Terminal presentation and subcommands

pub mod chart;
pub mod compare;
pub mod rates;
pub mod setup;
pub mod ui;
