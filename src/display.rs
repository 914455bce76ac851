//! Terminal formatting for the `stats` command.

use analytics::DashboardMetrics;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use core_types::round_money;
use rust_decimal::{Decimal, RoundingStrategy};

/// `$1,234.56` / `-$1,234.56`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_money(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_percent(value: Decimal) -> String {
    format!("{:.1}%", value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

pub fn format_ratio(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

/// The dashboard's headline numbers as a two-column table.
pub fn metrics_table(metrics: &DashboardMetrics) -> Table {
    let breakdown = metrics.win_loss_breakdown;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    let rows = [
        ("Total Trades", metrics.total_trades.to_string()),
        ("Total P/L", format_currency(metrics.total_pl)),
        ("Win Rate", format_percent(metrics.win_rate)),
        ("Profit Factor", format_ratio(metrics.profit_factor)),
        ("Expectancy", format_currency(metrics.expectancy)),
        ("Avg Win", format_currency(metrics.avg_win)),
        ("Avg Loss", format_currency(metrics.avg_loss)),
        ("Avg Win / Avg Loss", format_ratio(metrics.avg_win_loss_ratio)),
        ("Max Drawdown", format_currency(metrics.max_drawdown)),
        (
            "Wins / Losses / Breakeven",
            format!("{} / {} / {}", breakdown.win, breakdown.loss, breakdown.breakeven),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table
}
