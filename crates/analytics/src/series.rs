use crate::engine::chronological;
use crate::error::AnalyticsError;
use chrono::{Datelike, Weekday};
use core_types::{round_money, TradeRecord};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

const UNKNOWN_STRATEGY: &str = "Unknown";
const TRADING_DAYS: [Weekday; 5] = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];

/// The charts offered on the reports page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Drawdown,
    RiskReward,
    StrategyComparison,
    DayOfWeek,
    PerformanceTime,
    TagPerformance,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Drawdown,
        ReportKind::RiskReward,
        ReportKind::StrategyComparison,
        ReportKind::DayOfWeek,
        ReportKind::PerformanceTime,
        ReportKind::TagPerformance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Drawdown => "drawdown",
            ReportKind::RiskReward => "risk_reward",
            ReportKind::StrategyComparison => "strategy_comparison",
            ReportKind::DayOfWeek => "day_of_week",
            ReportKind::PerformanceTime => "performance_time",
            ReportKind::TagPerformance => "tag_performance",
        }
    }
}

impl FromStr for ReportKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AnalyticsError::UnknownReport(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPoint {
    pub label: String,
    pub value: Decimal,
}

/// A labelled series ready to be charted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSeries {
    pub kind: ReportKind,
    pub points: Vec<ReportPoint>,
}

/// Builds one report series over a most-recent-first trade history.
pub fn build_report(kind: ReportKind, trades: &[TradeRecord]) -> ReportSeries {
    let ordered = chronological(trades);

    let points = match kind {
        ReportKind::Drawdown => drawdown_points(&ordered),
        ReportKind::RiskReward => risk_reward_points(&ordered),
        ReportKind::StrategyComparison => {
            let mut by_strategy: IndexMap<String, Decimal> = IndexMap::new();
            for trade in &ordered {
                let strategy = trade.strategy.as_deref().unwrap_or(UNKNOWN_STRATEGY);
                let total = by_strategy.entry(strategy.to_string()).or_default();
                *total = total.saturating_add(trade.pl);
            }
            to_points(by_strategy)
        }
        ReportKind::DayOfWeek => {
            let mut by_day: IndexMap<String, Decimal> = TRADING_DAYS
                .iter()
                .map(|day| (day.to_string(), Decimal::ZERO))
                .collect();
            for trade in &ordered {
                if let Some(total) = by_day.get_mut(&trade.date.weekday().to_string()) {
                    *total = total.saturating_add(trade.pl);
                }
            }
            to_points(by_day)
        }
        ReportKind::PerformanceTime => {
            let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();
            for trade in &ordered {
                let total = by_month.entry(trade.date.format("%Y-%m").to_string()).or_default();
                *total = total.saturating_add(trade.pl);
            }
            to_points(by_month)
        }
        ReportKind::TagPerformance => {
            let mut by_tag: IndexMap<String, Decimal> = IndexMap::new();
            for trade in &ordered {
                for tag in &trade.tags {
                    let total = by_tag.entry(tag.clone()).or_default();
                    *total = total.saturating_add(trade.pl);
                }
            }
            to_points(by_tag)
        }
    };

    ReportSeries { kind, points }
}

fn drawdown_points(ordered: &[&TradeRecord]) -> Vec<ReportPoint> {
    let mut running = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    ordered
        .iter()
        .map(|trade| {
            running = running.saturating_add(trade.pl);
            if running > peak {
                peak = running;
            }
            ReportPoint {
                label: trade.date.to_string(),
                value: round_money(peak.saturating_sub(running)),
            }
        })
        .collect()
}

fn risk_reward_points(ordered: &[&TradeRecord]) -> Vec<ReportPoint> {
    ordered
        .iter()
        .filter_map(|trade| {
            trade.r_multiple.map(|r| ReportPoint {
                label: format!("{} {}", trade.symbol, trade.date),
                value: r,
            })
        })
        .collect()
}

fn to_points(totals: impl IntoIterator<Item = (String, Decimal)>) -> Vec<ReportPoint> {
    totals
        .into_iter()
        .map(|(label, total)| ReportPoint { label, value: round_money(total) })
        .collect()
}
