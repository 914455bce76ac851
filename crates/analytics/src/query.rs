use crate::error::AnalyticsError;
use core_types::{Outcome, TradeRecord};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Outcome filter of the trade list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeFilter {
    #[default]
    All,
    Winning,
    Losing,
    Breakeven,
}

impl OutcomeFilter {
    fn admits(&self, outcome: Outcome) -> bool {
        match self {
            OutcomeFilter::All => true,
            OutcomeFilter::Winning => outcome == Outcome::Win,
            OutcomeFilter::Losing => outcome == Outcome::Loss,
            OutcomeFilter::Breakeven => outcome == Outcome::Breakeven,
        }
    }
}

impl FromStr for OutcomeFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(OutcomeFilter::All),
            "winning" => Ok(OutcomeFilter::Winning),
            "losing" => Ok(OutcomeFilter::Losing),
            "breakeven" => Ok(OutcomeFilter::Breakeven),
            other => Err(AnalyticsError::UnknownFilter(other.to_string())),
        }
    }
}

/// Search box plus outcome filter, as on the trades page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeQuery {
    pub search: Option<String>,
    pub filter: OutcomeFilter,
}

impl TradeQuery {
    /// Case-insensitive substring match on symbol, strategy or any tag.
    pub fn matches(&self, trade: &TradeRecord) -> bool {
        if !self.filter.admits(trade.outcome) {
            return false;
        }

        let needle = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => needle.to_lowercase(),
            _ => return true,
        };

        trade.symbol.to_lowercase().contains(&needle)
            || trade
                .strategy
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
            || trade.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
    }

    /// The matching trades, in input order.
    pub fn apply<'a>(&self, trades: &'a [TradeRecord]) -> Vec<&'a TradeRecord> {
        trades.iter().filter(|trade| self.matches(trade)).collect()
    }
}

/// The newest `limit` trades of a most-recent-first history.
pub fn recent_trades(trades: &[TradeRecord], limit: usize) -> &[TradeRecord] {
    &trades[..trades.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use core_types::{Side, TradeInput};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn trade(symbol: &str, pl: Decimal, strategy: Option<&str>, tags: &[&str]) -> TradeRecord {
        let input = TradeInput {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            symbol: symbol.to_string(),
            side: Side::Long,
            quantity: dec!(1),
            entry_price: dec!(50),
            exit_price: dec!(50) + pl,
            stop_loss: None,
            strategy: strategy.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            notes: None,
        };
        TradeRecord::derive(Uuid::new_v4(), input, Utc::now()).unwrap()
    }

    fn sample() -> Vec<TradeRecord> {
        vec![
            trade("TSLA", dec!(12), Some("Opening Range"), &["momentum"]),
            trade("AAPL", dec!(-4), None, &["Earnings"]),
            trade("QQQ", dec!(0), Some("fade"), &[]),
        ]
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let trades = sample();
        let kept = TradeQuery::default().apply(&trades);
        let symbols: Vec<&str> = kept.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TSLA", "AAPL", "QQQ"]);
    }

    #[test]
    fn search_looks_at_symbol_strategy_and_tags() {
        let trades = sample();
        let search = |s: &str| {
            TradeQuery { search: Some(s.to_string()), filter: OutcomeFilter::All }
                .apply(&trades)
                .iter()
                .map(|t| t.symbol.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(search("aap"), vec!["AAPL"]);
        assert_eq!(search("range"), vec!["TSLA"]);
        assert_eq!(search("earn"), vec!["AAPL"]);
        assert_eq!(search("   "), vec!["TSLA", "AAPL", "QQQ"]);
        assert!(search("zzz").is_empty());
    }

    #[test]
    fn outcome_filter_combines_with_search() {
        let trades = sample();
        let query = TradeQuery { search: Some("a".to_string()), filter: OutcomeFilter::Losing };
        let kept = query.apply(&trades);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].symbol, "AAPL");

        let breakeven = TradeQuery { search: None, filter: OutcomeFilter::Breakeven }.apply(&trades);
        assert_eq!(breakeven[0].symbol, "QQQ");
    }

    #[test]
    fn recent_trades_caps_at_limit() {
        let trades = sample();
        assert_eq!(recent_trades(&trades, 2).len(), 2);
        assert_eq!(recent_trades(&trades, 10).len(), 3);
        assert!(recent_trades(&[], 10).is_empty());
    }

    #[test]
    fn filter_parses_from_query_string_values() {
        assert_eq!("winning".parse::<OutcomeFilter>().unwrap(), OutcomeFilter::Winning);
        assert!("wins".parse::<OutcomeFilter>().is_err());
    }
}
