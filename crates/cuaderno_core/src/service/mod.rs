//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model mutations behind use-case level APIs.
//! - Keep the UI shell decoupled from validation, gating and persistence
//!   details.

pub mod agenda_service;
pub mod case_service;
pub mod caseload_service;
pub mod editor_service;
pub mod task_service;
