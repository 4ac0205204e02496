//! Core domain logic for Cuaderno, a practice-management backend for
//! social-work case tracking.
//! This crate is the single source of truth for business invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::case::{
    Case, CaseId, CaseRecord, CaseStatus, FamilyMember, NoteId, PrivateNote, Task, TaskId,
};
pub use model::intervention::{
    Intervention, InterventionId, InterventionKind, InterventionStatus,
    InterventionValidationError,
};
pub use model::professional::{Professional, ProfessionalId, ProfessionalRole};
pub use repo::case_store::{CaseStore, StoreError, StoreResult};
pub use repo::persistence::{
    CasePersistence, InMemoryPersistence, PersistenceCall, PersistenceError, PersistenceResult,
};
pub use search::case_lookup::{normalize_query, search_cases};
pub use service::agenda_service::{expired_actions, today_agenda, EXPIRED_ACTION_GRACE_HOURS};
pub use service::case_service::{
    confirm_case_delete, propose_case_delete, save_case, CaseDeleteProposal, CaseServiceError,
};
pub use service::caseload_service::{
    ceas_breakdown, status_breakdown, team_gaps, CeasSlice, StatusSlice, TeamGap,
};
pub use service::editor_service::{
    EditorError, GateOutcome, InterventionEditor, InterventionSeed, ProposalToken,
    LOCAL_FIELD_FORMAT,
};
pub use service::task_service::{
    intervention_seed_from_task, seed_for_case_task, TaskBridgeError, TASK_TITLE_PREFIX,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
