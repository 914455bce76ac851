//! Route handlers, grouped by page of the journal.

pub mod account;
pub mod dashboard;
pub mod library;
pub mod trades;
pub mod university;
