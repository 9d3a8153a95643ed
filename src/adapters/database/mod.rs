//! Durable store abstraction
//!
//! Traits for the three persistent record types plus in-memory
//! implementations for tests and dry runs. The PostgreSQL implementations
//! live in [`crate::adapters::postgresql`].

pub mod memory;
pub mod traits;

pub use traits::{AuditStore, MappingStore, SignalStore};
