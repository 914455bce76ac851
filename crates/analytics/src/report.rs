use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The dashboard summary of a trade history.
///
/// This struct is the final output of the `AnalyticsEngine`. Every metric is a
/// plain number: values that would be undefined (a ratio with a zero
/// denominator, an average over nothing) are reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    // I. Profitability
    pub total_trades: usize,
    #[serde(rename = "totalPL")]
    pub total_pl: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub profit_factor: Decimal,
    pub expectancy: Decimal,

    // II. Trade-Level Statistics
    pub win_rate: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    /// Raw `avg_win / avg_loss`; rounding for display is up to the caller.
    pub avg_win_loss_ratio: Decimal,
    pub win_loss_breakdown: WinLossBreakdown,

    // III. Risk and Drawdown
    pub max_drawdown: Decimal,
    pub equity_curve: Vec<EquityPoint>,
    pub drawdown_curve: Vec<DrawdownPoint>,
}

impl DashboardMetrics {
    /// Creates a zeroed-out report, which is also the answer for an empty history.
    pub fn new() -> Self {
        Self {
            total_trades: 0,
            total_pl: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
            expectancy: Decimal::ZERO,
            win_rate: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            avg_win_loss_ratio: Decimal::ZERO,
            win_loss_breakdown: WinLossBreakdown::default(),
            max_drawdown: Decimal::ZERO,
            equity_curve: Vec::new(),
            drawdown_curve: Vec::new(),
        }
    }
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Cumulative P/L after a trade, labelled with that trade's date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub label: NaiveDate,
    #[serde(rename = "cumulativePL")]
    pub cumulative_pl: Decimal,
}

/// Distance below the running equity peak after a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownPoint {
    pub label: NaiveDate,
    pub drawdown: Decimal,
}

/// Trade counts per outcome. The three buckets partition the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WinLossBreakdown {
    pub win: usize,
    pub loss: usize,
    pub breakeven: usize,
}

impl WinLossBreakdown {
    pub fn total(&self) -> usize {
        self.win + self.loss + self.breakeven
    }

    /// `count` as a percentage of all trades, zero for an empty history.
    pub fn percent_of_total(&self, count: usize) -> Decimal {
        let total = self.total();
        if total == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(count) / Decimal::from(total) * Decimal::ONE_HUNDRED
    }
}
