use crate::enums::{Outcome, Side};
use crate::error::CoreError;
use crate::money::round_money;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest accepted magnitude for a quantity or price. Keeps every derived P/L,
/// and any realistic sum of them, inside `Decimal`'s range.
pub const MAX_TRADE_MAGNITUDE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// The user-editable half of a trade, exactly as submitted from the trade form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInput {
    pub date: NaiveDate,
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TradeInput {
    /// Trims and canonicalises the submitted fields.
    ///
    /// The symbol is uppercased and must not be empty, the quantity must be
    /// strictly positive, blank text becomes `None` and blank tags are dropped.
    /// Quantity, prices and stop are bounded by `MAX_TRADE_MAGNITUDE`.
    /// A stop of exactly zero means no stop was set.
    pub fn normalize(mut self) -> Result<Self, CoreError> {
        self.symbol = self.symbol.trim().to_uppercase();
        if self.symbol.is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "must not be empty".to_string(),
            ));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                format!("must be positive, got {}", self.quantity),
            ));
        }

        check_magnitude("quantity", self.quantity)?;
        check_magnitude("entryPrice", self.entry_price)?;
        check_magnitude("exitPrice", self.exit_price)?;
        if let Some(stop) = self.stop_loss {
            check_magnitude("stopLoss", stop)?;
        }

        self.stop_loss = self.stop_loss.filter(|stop| !stop.is_zero());
        self.strategy = non_blank(self.strategy);
        self.notes = non_blank(self.notes);
        self.tags = self
            .tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        Ok(self)
    }
}

/// A persisted trade. `pl`, `r_multiple` and `outcome` are always derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub stop_loss: Option<Decimal>,
    pub pl: Decimal,
    pub r_multiple: Option<Decimal>,
    pub outcome: Outcome,
    pub strategy: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TradeRecord {
    /// Builds a new record from form input, computing every derived field.
    pub fn derive(id: Uuid, input: TradeInput, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let input = input.normalize()?;

        let pl = derive_pl(input.side, input.entry_price, input.exit_price, input.quantity)?;
        let r_multiple = derive_r_multiple(
            input.side,
            input.entry_price,
            input.exit_price,
            input.stop_loss,
            input.quantity,
        )?;

        Ok(Self {
            id,
            date: input.date,
            symbol: input.symbol,
            side: input.side,
            quantity: input.quantity,
            entry_price: input.entry_price,
            exit_price: input.exit_price,
            stop_loss: input.stop_loss,
            pl,
            r_multiple,
            outcome: Outcome::from_pl(pl),
            strategy: input.strategy,
            tags: input.tags,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces this trade with an edited version. Identity and creation time
    /// are kept; everything else is re-derived from `input`.
    pub fn rederive(&self, input: TradeInput, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let mut updated = Self::derive(self.id, input, now)?;
        updated.created_at = self.created_at;
        Ok(updated)
    }

    /// The user-supplied fields of this record, e.g. to re-derive an imported trade.
    pub fn to_input(&self) -> TradeInput {
        TradeInput {
            date: self.date,
            symbol: self.symbol.clone(),
            side: self.side,
            quantity: self.quantity,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            stop_loss: self.stop_loss,
            strategy: self.strategy.clone(),
            tags: self.tags.clone(),
            notes: self.notes.clone(),
        }
    }
}

fn out_of_range(field: &str) -> CoreError {
    CoreError::InvalidInput(field.to_string(), "out of range".to_string())
}

fn check_magnitude(field: &str, value: Decimal) -> Result<(), CoreError> {
    if value.abs() > MAX_TRADE_MAGNITUDE {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            format!("out of range, magnitude must not exceed {}", MAX_TRADE_MAGNITUDE),
        ));
    }
    Ok(())
}

fn raw_pl(
    side: Side,
    entry_price: Decimal,
    exit_price: Decimal,
    quantity: Decimal,
) -> Result<Decimal, CoreError> {
    let move_per_unit = match side {
        Side::Long => exit_price.checked_sub(entry_price),
        Side::Short => entry_price.checked_sub(exit_price),
    }
    .ok_or_else(|| out_of_range("price"))?;
    move_per_unit
        .checked_mul(quantity)
        .ok_or_else(|| out_of_range("quantity"))
}

/// P/L of a closed position in currency units, rounded to cents.
///
/// Fails with `InvalidInput` instead of overflowing.
pub fn derive_pl(
    side: Side,
    entry_price: Decimal,
    exit_price: Decimal,
    quantity: Decimal,
) -> Result<Decimal, CoreError> {
    raw_pl(side, entry_price, exit_price, quantity).map(round_money)
}

/// P/L as a multiple of the dollar risk implied by the stop distance.
///
/// `None` when there is no stop or the stop sits exactly on the entry price.
/// Uses the unrounded P/L, then rounds the ratio to two places. A stop so close
/// to the entry that the ratio leaves `Decimal`'s range is an `InvalidInput`.
pub fn derive_r_multiple(
    side: Side,
    entry_price: Decimal,
    exit_price: Decimal,
    stop_loss: Option<Decimal>,
    quantity: Decimal,
) -> Result<Option<Decimal>, CoreError> {
    let Some(stop) = stop_loss else {
        return Ok(None);
    };
    let risk = entry_price
        .checked_sub(stop)
        .and_then(|distance| distance.abs().checked_mul(quantity))
        .ok_or_else(|| out_of_range("stopLoss"))?;
    if risk <= Decimal::ZERO {
        return Ok(None);
    }
    let pl = raw_pl(side, entry_price, exit_price, quantity)?;
    pl.checked_div(risk)
        .map(|r| Some(round_money(r)))
        .ok_or_else(|| out_of_range("stopLoss"))
}

/// Splits the comma-separated tag field of the trade form.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
