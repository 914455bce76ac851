//! # Tradebook Analytics Engine
//!
//! This crate turns a user's trade history into the numbers on the dashboard:
//! win rate, expectancy, profit factor, drawdown and the equity curve, plus the
//! breakdown series behind the reports page.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` takes the trade list as an explicit
//!   parameter and returns a `DashboardMetrics` value. It performs no I/O, holds no state
//!   and cannot fail, so it may be called from any number of request handlers at once.
//! - **Input Ordering:** Trades arrive most-recent-first, the order the journal displays
//!   them in. Anything that walks time (equity, drawdown, calendar buckets) reverses that
//!   order internally.
//!
//! ## Public API
//!
//! - `AnalyticsEngine` / `compute_dashboard_metrics`: the dashboard calculation.
//! - `DashboardMetrics`: the summary and curves consumed by the presentation layer.
//! - `build_report` / `ReportKind`: per-strategy, per-tag, per-weekday and per-month series.
//! - `TradeQuery` / `recent_trades`: trade list search and filtering.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod query;
pub mod report;
pub mod series;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{chronological, compute_dashboard_metrics, AnalyticsEngine};
pub use error::AnalyticsError;
pub use query::{recent_trades, OutcomeFilter, TradeQuery};
pub use report::{DashboardMetrics, DrawdownPoint, EquityPoint, WinLossBreakdown};
pub use series::{build_report, ReportKind, ReportPoint, ReportSeries};
