//! Domain model for cases, interventions and professionals.
//!
//! # Responsibility
//! - Define the canonical records exchanged with persistence collaborators.
//! - Keep lifecycle rules (status stamping, notebook registration) on the
//!   records themselves so every mutation path shares them.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - A registered intervention always belongs to a case.
//! - An intervention window never ends before it starts.

pub mod case;
pub mod intervention;
pub mod professional;
