use super::{chart, ui};
use crate::core::{
    BestOption, CalculationInput, ExchangeRateProvider, SimulationReport, simulate,
};
use crate::providers::util::WalkBack;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell};
use tracing::warn;

/// Percent gained on `principal`; undefined for an empty deposit.
fn return_percent(total: f64, principal: f64) -> Option<f64> {
    (principal > 0.0).then(|| (total - principal) / principal * 100.0)
}

impl SimulationReport {
    fn interest_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Gross Interest"),
            ui::header_cell("Withholding"),
            ui::header_cell("Net Gain"),
            ui::header_cell("Net Balance"),
            ui::header_cell("Term"),
        ]);
        table.add_row(vec![
            ui::amount_cell(self.calculation.gross_interest, "TL"),
            ui::amount_cell(self.calculation.withheld_amount, "TL"),
            ui::amount_cell(self.calculation.net_gain, "TL"),
            ui::amount_cell(self.calculation.net_balance, "TL").add_attribute(Attribute::Bold),
            Cell::new(format!("{} days", self.days)),
        ]);
        table.to_string()
    }

    fn currency_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate ({})", self.current.date)),
            ui::header_cell("Net Balance Equivalent"),
        ]);
        table.add_row(vec![
            Cell::new("USD"),
            ui::amount_cell(self.current.usd, "TL"),
            ui::amount_cell(self.net_balance_usd, "USD"),
        ]);
        table.add_row(vec![
            Cell::new("EUR"),
            ui::amount_cell(self.current.eur, "TL"),
            ui::amount_cell(self.net_balance_eur, "EUR"),
        ]);
        table.to_string()
    }

    fn scenario_table(&self) -> String {
        let principal = self.input.principal;
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Option"),
            ui::header_cell("Start"),
            ui::header_cell("End"),
            ui::header_cell("Value (TL)"),
            ui::header_cell("Return"),
        ]);

        for (option, total) in self.comparison.totals() {
            let (start, end) = match option {
                BestOption::Interest => (
                    format!("{}", self.input.start),
                    format!("{}", self.input.end),
                ),
                BestOption::Usd => (
                    format!("{} @ {:.4}", self.start_quote.date, self.start_quote.usd),
                    format!("{} @ {:.4}", self.end_quote.date, self.end_quote.usd),
                ),
                BestOption::Eur => (
                    format!("{} @ {:.4}", self.start_quote.date, self.start_quote.eur),
                    format!("{} @ {:.4}", self.end_quote.date, self.end_quote.eur),
                ),
            };

            let mut name = Cell::new(option.to_string());
            if option == self.comparison.best {
                name = name.add_attribute(Attribute::Bold);
            }
            let change = return_percent(total, principal).map_or_else(ui::na_cell, ui::change_cell);

            table.add_row(vec![
                name,
                Cell::new(start),
                Cell::new(end),
                ui::amount_cell(total, "TL"),
                change,
            ]);
        }
        table.to_string()
    }

    pub fn display_as_text(&self) -> String {
        let mut output = format!(
            "{}\n\n{}\n\n",
            ui::style_text("Interest Summary", ui::StyleType::Title),
            self.interest_table()
        );

        output.push_str(&format!(
            "{}\n\n{}\n\n",
            ui::style_text("TCMB Current Rates", ui::StyleType::Title),
            self.currency_table()
        ));

        output.push_str(&format!(
            "{}\n\n{}\n\n",
            ui::style_text("What If You Had Bought Currency?", ui::StyleType::Title),
            self.scenario_table()
        ));

        output.push_str(&format!(
            "After {} days your net gain is {} TL and your net balance is {} TL.\n",
            self.days,
            ui::format_amount(self.calculation.net_gain),
            ui::format_amount(self.calculation.net_balance),
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            ui::style_text("Best return:", ui::StyleType::TotalLabel),
            ui::style_text(&self.comparison.best.to_string(), ui::StyleType::TotalValue),
        ));

        output.push_str(&ui::separator());
        output.push_str("\n\n");
        output.push_str(&chart::render(
            "Interest vs Currency Returns",
            &self.comparison.totals(),
            &format!("Period: {} - {}", self.input.start, self.input.end),
        ));

        output
    }
}

pub async fn run(
    input: &CalculationInput,
    provider: &(dyn ExchangeRateProvider + Send + Sync),
    policy: &WalkBack,
    today: NaiveDate,
) -> Result<()> {
    if let Err(e) = input.validate(today) {
        warn!(error = %e, "Rejected input");
        println!("{}", ui::style_text(&format!("⚠ {e}"), ui::StyleType::Warning));
        return Ok(());
    }

    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = simulate(input, provider, policy, today).await;
    pb.finish_and_clear();

    println!("{}", result?.display_as_text());
    Ok(())
}
