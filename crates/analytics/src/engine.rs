use crate::report::{DashboardMetrics, DrawdownPoint, EquityPoint};
use core_types::{round_money, Outcome, TradeRecord};
use rust_decimal::Decimal;

/// A stateless calculator for the dashboard metrics of a trade history.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating dashboard metrics.
    ///
    /// # Arguments
    ///
    /// * `trades` - The user's trades, most recent first (descending by date).
    ///
    /// # Returns
    ///
    /// The `DashboardMetrics` for the history. An empty slice yields the zeroed report.
    pub fn compute_dashboard_metrics(&self, trades: &[TradeRecord]) -> DashboardMetrics {
        let mut metrics = DashboardMetrics::new();

        if trades.is_empty() {
            return metrics;
        }

        self.calculate_profitability(trades, &mut metrics);
        self.calculate_equity_and_drawdown(trades, &mut metrics);

        tracing::debug!(
            trades = metrics.total_trades,
            total_pl = %metrics.total_pl,
            max_drawdown = %metrics.max_drawdown,
            "Computed dashboard metrics."
        );

        metrics
    }

    /// Totals, averages and the ratios built on them. Order-independent.
    fn calculate_profitability(&self, trades: &[TradeRecord], metrics: &mut DashboardMetrics) {
        metrics.total_trades = trades.len();

        for trade in trades {
            metrics.total_pl = metrics.total_pl.saturating_add(trade.pl);

            match trade.outcome {
                Outcome::Win => {
                    metrics.gross_profit = metrics.gross_profit.saturating_add(trade.pl);
                    metrics.win_loss_breakdown.win += 1;
                }
                Outcome::Loss => {
                    metrics.gross_loss = metrics.gross_loss.saturating_add(trade.pl.abs());
                    metrics.win_loss_breakdown.loss += 1;
                }
                Outcome::Breakeven => metrics.win_loss_breakdown.breakeven += 1,
            }
        }

        let wins = metrics.win_loss_breakdown.win;
        let losses = metrics.win_loss_breakdown.loss;

        metrics.win_rate =
            Decimal::from(wins) / Decimal::from(metrics.total_trades) * Decimal::ONE_HUNDRED;

        if wins > 0 {
            metrics.avg_win = metrics.gross_profit / Decimal::from(wins);
        }
        if losses > 0 {
            metrics.avg_loss = metrics.gross_loss / Decimal::from(losses);
        }

        // avg_win * wins / (avg_loss * losses) reduces to gross profit over gross loss.
        if metrics.avg_loss > Decimal::ZERO {
            metrics.profit_factor = saturating_ratio(metrics.gross_profit, metrics.gross_loss);
            metrics.avg_win_loss_ratio = saturating_ratio(metrics.avg_win, metrics.avg_loss);
        }

        let win_fraction = metrics.win_rate / Decimal::ONE_HUNDRED;
        metrics.expectancy =
            win_fraction * metrics.avg_win - (Decimal::ONE - win_fraction) * metrics.avg_loss;
    }

    /// Walks the history oldest-first, tracking running P/L against its peak.
    fn calculate_equity_and_drawdown(&self, trades: &[TradeRecord], metrics: &mut DashboardMetrics) {
        let mut running = Decimal::ZERO;
        let mut peak = Decimal::ZERO;
        let mut max_drawdown = Decimal::ZERO;

        for trade in chronological(trades) {
            running = running.saturating_add(trade.pl);
            if running > peak {
                peak = running;
            }
            let drawdown = peak.saturating_sub(running);
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }

            metrics.equity_curve.push(EquityPoint {
                label: trade.date,
                cumulative_pl: round_money(running),
            });
            metrics.drawdown_curve.push(DrawdownPoint {
                label: trade.date,
                drawdown: round_money(drawdown),
            });
        }

        metrics.max_drawdown = max_drawdown;
    }
}

/// `numerator / denominator` for a positive denominator, capped at `Decimal::MAX`.
fn saturating_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::MAX)
}

/// Computes the dashboard metrics with a throwaway engine.
pub fn compute_dashboard_metrics(trades: &[TradeRecord]) -> DashboardMetrics {
    AnalyticsEngine::new().compute_dashboard_metrics(trades)
}

/// The trades oldest-first.
///
/// Reverses the most-recent-first input, then stable-sorts by date. For input in
/// the expected order this is exactly the reversal; for unordered input the
/// result is still chronological by date.
pub fn chronological(trades: &[TradeRecord]) -> Vec<&TradeRecord> {
    let mut ordered: Vec<&TradeRecord> = trades.iter().rev().collect();
    ordered.sort_by_key(|trade| trade.date);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use core_types::{Side, TradeInput};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    // ============================================================
    // Test Helpers
    // ============================================================

    /// A long trade of one share whose P/L is exactly `pl`.
    fn trade(date: &str, pl: Decimal) -> TradeRecord {
        let input = TradeInput {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            symbol: "SPY".to_string(),
            side: Side::Long,
            quantity: dec!(1),
            entry_price: dec!(500),
            exit_price: dec!(500) + pl,
            stop_loss: None,
            strategy: None,
            tags: vec![],
            notes: None,
        };
        TradeRecord::derive(Uuid::new_v4(), input, Utc::now()).unwrap()
    }

    /// Builds a most-recent-first history from P/L values given oldest-first.
    fn history(pls_oldest_first: &[Decimal]) -> Vec<TradeRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut trades: Vec<TradeRecord> = pls_oldest_first
            .iter()
            .enumerate()
            .map(|(i, pl)| {
                let date = start + chrono::Duration::days(i as i64);
                trade(&date.format("%Y-%m-%d").to_string(), *pl)
            })
            .collect();
        trades.reverse();
        trades
    }

    // ============================================================
    // Scenarios
    // ============================================================

    #[test]
    fn empty_history_is_all_zero() {
        let metrics = compute_dashboard_metrics(&[]);
        assert_eq!(metrics, DashboardMetrics::new());
        assert!(metrics.equity_curve.is_empty());
        assert!(metrics.drawdown_curve.is_empty());
        assert_eq!(metrics.win_loss_breakdown.total(), 0);
    }

    #[test]
    fn win_loss_breakeven_scenario() {
        let trades = vec![
            trade("2024-01-03", dec!(100)),
            trade("2024-01-02", dec!(-50)),
            trade("2024-01-01", dec!(0)),
        ];
        let metrics = compute_dashboard_metrics(&trades);

        assert_eq!(metrics.total_pl, dec!(50));
        assert_eq!(metrics.win_rate.round_dp(1), dec!(33.3));
        assert_eq!(metrics.avg_win, dec!(100));
        assert_eq!(metrics.avg_loss, dec!(50));
        assert_eq!(metrics.profit_factor, dec!(2));
        assert_eq!(metrics.avg_win_loss_ratio, dec!(2));
        assert_eq!(
            metrics.win_loss_breakdown,
            crate::WinLossBreakdown { win: 1, loss: 1, breakeven: 1 }
        );
    }

    #[test]
    fn max_drawdown_follows_running_peak() {
        let metrics = compute_dashboard_metrics(&history(&[dec!(100), dec!(-150), dec!(30)]));

        let drawdowns: Vec<Decimal> = metrics.drawdown_curve.iter().map(|p| p.drawdown).collect();
        assert_eq!(drawdowns, vec![dec!(0), dec!(150), dec!(120)]);
        assert_eq!(metrics.max_drawdown, dec!(150));

        let equity: Vec<Decimal> = metrics.equity_curve.iter().map(|p| p.cumulative_pl).collect();
        assert_eq!(equity, vec![dec!(100), dec!(-50), dec!(-20)]);
    }

    #[test]
    fn drawdown_counts_from_zero_when_first_trade_loses() {
        let metrics = compute_dashboard_metrics(&history(&[dec!(-40), dec!(10)]));
        assert_eq!(metrics.max_drawdown, dec!(40));
    }

    #[test]
    fn all_winners_have_no_drawdown_and_guarded_ratios() {
        let metrics = compute_dashboard_metrics(&history(&[dec!(10), dec!(20), dec!(30)]));

        assert_eq!(metrics.max_drawdown, Decimal::ZERO);
        assert_eq!(metrics.avg_loss, Decimal::ZERO);
        assert_eq!(metrics.profit_factor, Decimal::ZERO);
        assert_eq!(metrics.avg_win_loss_ratio, Decimal::ZERO);
        assert_eq!(metrics.win_rate, dec!(100));
        assert_eq!(metrics.expectancy, dec!(20));
    }

    #[test]
    fn expectancy_weights_average_win_and_loss() {
        // wr = 50%: 0.5 * 150 - 0.5 * 50
        let metrics = compute_dashboard_metrics(&history(&[dec!(100), dec!(-50), dec!(200), dec!(-50)]));
        assert_eq!(metrics.expectancy, dec!(50));
        assert_eq!(metrics.profit_factor, dec!(3));
    }

    #[test]
    fn breakeven_trades_count_against_expectancy_but_not_averages() {
        let metrics = compute_dashboard_metrics(&history(&[dec!(90), dec!(0), dec!(0)]));
        assert_eq!(metrics.avg_win, dec!(90));
        assert_eq!(metrics.avg_loss, Decimal::ZERO);
        assert_eq!(metrics.total_pl, dec!(90));
        assert_eq!(metrics.expectancy.round_dp(6), dec!(30));
    }

    // ============================================================
    // Properties
    // ============================================================

    #[test]
    fn outcome_percentages_sum_to_one_hundred() {
        let metrics = compute_dashboard_metrics(&history(&[dec!(5), dec!(-3), dec!(0), dec!(7), dec!(-1), dec!(0), dec!(2)]));
        let breakdown = metrics.win_loss_breakdown;
        let sum = metrics.win_rate
            + breakdown.percent_of_total(breakdown.loss)
            + breakdown.percent_of_total(breakdown.breakeven);
        assert!((sum - dec!(100)).abs() < dec!(0.000001), "sum was {sum}");
    }

    #[test]
    fn total_pl_equals_last_equity_point() {
        let metrics = compute_dashboard_metrics(&history(&[dec!(12.34), dec!(-5.67), dec!(100.01)]));
        let last = metrics.equity_curve.last().unwrap();
        assert_eq!(last.cumulative_pl, metrics.total_pl);
        assert_eq!(metrics.total_pl, dec!(106.68));
    }

    #[test]
    fn non_negative_pl_never_draws_down() {
        let metrics = compute_dashboard_metrics(&history(&[dec!(0), dec!(3), dec!(0), dec!(1)]));
        assert_eq!(metrics.max_drawdown, Decimal::ZERO);
        assert!(metrics.drawdown_curve.iter().all(|p| p.drawdown == Decimal::ZERO));
    }

    #[test]
    fn reordering_leaves_aggregates_unchanged() {
        let ordered = history(&[dec!(100), dec!(-150), dec!(30), dec!(0), dec!(-10)]);
        let mut shuffled = ordered.clone();
        shuffled.swap(0, 3);
        shuffled.swap(1, 4);

        let a = compute_dashboard_metrics(&ordered);
        let b = compute_dashboard_metrics(&shuffled);

        assert_eq!(a.total_pl, b.total_pl);
        assert_eq!(a.win_rate, b.win_rate);
        assert_eq!(a.avg_win, b.avg_win);
        assert_eq!(a.avg_loss, b.avg_loss);
        assert_eq!(a.profit_factor, b.profit_factor);
        assert_eq!(a.expectancy, b.expectancy);
        assert_eq!(a.win_loss_breakdown, b.win_loss_breakdown);
        // Distinct dates, so the date sort rebuilds the same chronology.
        assert_eq!(a.equity_curve, b.equity_curve);
        assert_eq!(a.max_drawdown, b.max_drawdown);
    }

    #[test]
    fn extreme_pl_saturates_instead_of_panicking() {
        let mut trades = history(&[dec!(1), dec!(1), dec!(-1)]);
        trades[1].pl = Decimal::MAX;
        trades[2].pl = Decimal::MAX;
        trades[0].pl = dec!(-0.01);

        let metrics = compute_dashboard_metrics(&trades);
        assert_eq!(metrics.total_pl, Decimal::MAX);
        assert_eq!(metrics.gross_profit, Decimal::MAX);
        assert_eq!(metrics.profit_factor, Decimal::MAX);
        assert_eq!(metrics.equity_curve.len(), 3);
    }

    #[test]
    fn chronological_reverses_same_day_trades() {
        let newest = trade("2024-02-01", dec!(1));
        let oldest = trade("2024-02-01", dec!(2));
        let trades = vec![newest.clone(), oldest.clone()];

        let ordered = chronological(&trades);
        assert_eq!(ordered[0].id, oldest.id);
        assert_eq!(ordered[1].id, newest.id);
    }

    #[test]
    fn equity_curve_is_labelled_with_trade_dates() {
        let metrics = compute_dashboard_metrics(&history(&[dec!(1), dec!(2)]));
        let labels: Vec<String> = metrics
            .equity_curve
            .iter()
            .map(|p| p.label.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(labels, vec!["2024-01-01", "2024-01-02"]);
    }
}
