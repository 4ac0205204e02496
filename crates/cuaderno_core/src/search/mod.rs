//! Case lookup entry points.
//!
//! # Responsibility
//! - Expose the dashboard's case search over the in-memory store.
//! - Keep query normalization inside core.

pub mod case_lookup;
