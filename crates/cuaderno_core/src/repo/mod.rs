//! Store snapshot and persistence collaborator contracts.
//!
//! # Responsibility
//! - Hold the in-memory case collection the aggregation engine reads.
//! - Define the external-store contract invoked on save/delete.
//!
//! # Invariants
//! - The store routes interventions by `case_id`; a general intervention
//!   never carries a case and a case-scoped one never lands on the
//!   general list.
//! - Persistence failures leave in-memory state untouched.

pub mod case_store;
pub mod persistence;
