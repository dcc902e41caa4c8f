//! Terminal bar chart of the three comparison totals.

use super::ui;
use crate::core::BestOption;
use console::style;

/// Share of the value range added above and below the bars.
const ZOOM: f64 = 0.2;
const LABEL_WIDTH: usize = 8;

/// Value axis of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Zooms the axis onto `values`, padding 20% of their spread on each side.
    /// Equal values are padded by 20% of their magnitude instead.
    pub fn zoomed(values: &[f64]) -> Option<Self> {
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }

        let spread = hi - lo;
        let pad = if spread > 0.0 {
            spread * ZOOM
        } else if lo != 0.0 {
            lo.abs() * ZOOM
        } else {
            1.0
        };

        Some(AxisRange {
            min: lo - pad,
            max: hi + pad,
        })
    }

    /// Position of `value` on the axis in `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

fn bar_color(option: BestOption, bar: String) -> String {
    match option {
        BestOption::Interest => style(bar).yellow().to_string(),
        BestOption::Usd => style(bar).green().to_string(),
        BestOption::Eur => style(bar).blue().to_string(),
    }
}

/// Renders one horizontal bar per total, each labelled with its TL value.
pub fn render(title: &str, totals: &[(BestOption, f64)], caption: &str) -> String {
    let values: Vec<f64> = totals.iter().map(|(_, v)| *v).collect();
    let Some(axis) = AxisRange::zoomed(&values) else {
        return String::new();
    };

    // Room for the label and the value text next to the bar
    let bar_width = ui::term_width().saturating_sub(LABEL_WIDTH + 24).clamp(10, 60);

    let mut output = format!("{}\n\n", ui::style_text(title, ui::StyleType::Title));
    for (option, value) in totals {
        let len = (axis.fraction(*value) * bar_width as f64).round() as usize;
        let bar = bar_color(*option, "█".repeat(len));
        output.push_str(&format!(
            "{:<width$}{bar}{} {} TL\n",
            option.to_string(),
            " ".repeat(bar_width - len),
            ui::format_amount(*value),
            width = LABEL_WIDTH,
        ));
    }
    output.push_str(&format!(
        "\n{}\n{}",
        ui::style_text(
            &format!(
                "Axis: {} TL to {} TL",
                ui::format_amount(axis.min),
                ui::format_amount(axis.max)
            ),
            ui::StyleType::Subtle
        ),
        ui::style_text(caption, ui::StyleType::Subtle)
    ));
    output
}
