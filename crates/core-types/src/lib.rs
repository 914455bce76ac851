//! # Tradebook Core Types
//!
//! The shared vocabulary of the journal: trades, playbooks, journal entries and
//! user profiles. Every other crate in the workspace speaks in these types.
//!
//! A `TradeRecord` can only be produced through `TradeRecord::derive` (or
//! `rederive` when editing), which recomputes `pl`, `r_multiple` and `outcome`
//! from the trade's prices, quantity, side and stop. Derived fields are never
//! taken from a client.

pub mod enums;
pub mod error;
pub mod journal;
pub mod money;
pub mod trade;
pub mod user;

// Re-export the core types to provide a clean public API.
pub use enums::{Outcome, Side, UserRole};
pub use error::CoreError;
pub use journal::{JournalEntry, JournalInput, Playbook, PlaybookInput};
pub use money::round_money;
pub use trade::{
    derive_pl, derive_r_multiple, parse_tags, TradeInput, TradeRecord, MAX_TRADE_MAGNITUDE,
};
pub use user::{UserProfile, UserSettings};
