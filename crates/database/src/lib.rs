//! # Tradebook Database Crate
//!
//! This crate is the journal's "permanent archive": every trade, playbook,
//! journal entry, profile and settings record, plus the shared education
//! content, is read and written through it.
//!
//! ## Architectural Principles
//!
//! - **Adapter Behind a Trait:** The rest of the application only sees the
//!   `JournalStore` trait. SQL and row layouts stay inside this crate.
//! - **Per-User Scoping:** Every journal operation takes the caller's user id;
//!   another user's records are indistinguishable from missing ones.
//! - **Asynchronous & Pooled:** The PostgreSQL implementation uses a `PgPool` and
//!   wraps multi-row writes (reset, import) in transactions.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: establish the pool and bring the schema up to date.
//! - `JournalStore`: the persistence contract used by the web server and CLI.
//! - `DbRepository`: the PostgreSQL implementation.
//! - `MemoryStore`: an in-process implementation for tests and demo runs.
//! - `DbError`: the specific error types that can be returned from this crate.

pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::MemoryStore;
pub use repository::DbRepository;
pub use store::JournalStore;
