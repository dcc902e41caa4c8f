use super::ui;
use crate::core::{Currency, ExchangeRateProvider, RateQuote};
use crate::providers::util::{WalkBack, fetch_historical};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::Cell;

fn display_quote(quote: &RateQuote, requested: Option<NaiveDate>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Bank-note Selling"),
    ]);
    for currency in [Currency::Usd, Currency::Eur] {
        table.add_row(vec![
            Cell::new(format!("{currency}/TL")),
            ui::amount_cell(quote.rate(currency), "TL"),
        ]);
    }

    let mut output = format!(
        "{}\n\n{table}",
        ui::style_text(
            &format!("TCMB rates for {}", quote.date),
            ui::StyleType::Title
        )
    );
    if let Some(requested) = requested.filter(|d| *d != quote.date) {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("No bulletin published on {requested}, showing {}", quote.date),
                ui::StyleType::Subtle
            )
        ));
    }
    output
}

/// Prints the current rates, or the rates in effect on `date`.
pub async fn run(
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    policy: &WalkBack,
    date: Option<NaiveDate>,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = match date {
        Some(date) => fetch_historical(provider, date, policy)
            .await
            .map_err(anyhow::Error::from),
        None => provider
            .fetch_current()
            .await
            .context("Failed to fetch current exchange rates"),
    };
    pb.finish_and_clear();

    println!("{}", display_quote(&result?, date));
    Ok(())
}
