//! Case file save and confirmed-delete use-cases.
//!
//! # Responsibility
//! - Persist case aggregates and keep the store snapshot in step.
//! - Gate case removal behind an explicit two-phase confirmation.
//!
//! # Invariants
//! - The store is only mutated after the external store accepted the
//!   write; a persistence failure leaves the snapshot untouched.
//! - A delete proposal applies at most once: confirming consumes it, and
//!   dropping it declines with no side effect.

use crate::model::case::{Case, CaseId};
use crate::repo::case_store::{CaseStore, StoreError};
use crate::repo::persistence::{CasePersistence, PersistenceError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from case save/delete use-cases.
#[derive(Debug)]
pub enum CaseServiceError {
    /// Target case is not in the store.
    CaseNotFound(CaseId),
    /// External store failure; in-memory state stands for retry.
    Persistence(PersistenceError),
    /// Store-level failure.
    Store(StoreError),
}

impl Display for CaseServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaseNotFound(id) => write!(f, "case not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CaseServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::CaseNotFound(_) => None,
        }
    }
}

impl From<PersistenceError> for CaseServiceError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<StoreError> for CaseServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::CaseNotFound(id) => Self::CaseNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Persists a case aggregate, then mirrors it into the store.
///
/// A case already in the store is replaced wholesale; a new one is added.
///
/// # Errors
/// - `Persistence` when the external store refuses; the snapshot is left
///   untouched so the caller can retry.
pub fn save_case<P: CasePersistence>(
    persistence: &P,
    store: &mut CaseStore,
    case: Case,
) -> Result<(), CaseServiceError> {
    if let Err(err) = persistence.save_case(&case) {
        warn!(
            "event=case_save_failed module=case status=error id={} reason={}",
            case.id, err
        );
        return Err(err.into());
    }
    info!("event=case_saved module=case status=ok id={}", case.id);

    let case_id = case.id;
    if store.case(case_id).is_some() {
        store.remove_case(case_id)?;
    }
    store.add_case(case)?;
    Ok(())
}

/// Confirmed-delete handle for one case.
///
/// Ownership is the gate: `confirm_case_delete` consumes the proposal,
/// so it can apply at most once; dropping it declines the deletion.
#[must_use = "dropping a delete proposal declines it"]
#[derive(Debug)]
pub struct CaseDeleteProposal {
    case_id: CaseId,
}

impl CaseDeleteProposal {
    pub fn case_id(&self) -> CaseId {
        self.case_id
    }
}

/// Proposes deleting one case; nothing is removed yet.
///
/// # Errors
/// - `CaseNotFound` when the case is not in the store.
pub fn propose_case_delete(
    store: &CaseStore,
    case_id: CaseId,
) -> Result<CaseDeleteProposal, CaseServiceError> {
    store
        .case(case_id)
        .ok_or(CaseServiceError::CaseNotFound(case_id))?;
    Ok(CaseDeleteProposal { case_id })
}

/// Applies a confirmed case deletion.
///
/// Returns the removed aggregate so the shell can offer an undo draft.
///
/// # Errors
/// - `Persistence` when the external store refuses; the case stays in the
///   store and a fresh proposal is required to retry.
pub fn confirm_case_delete<P: CasePersistence>(
    persistence: &P,
    store: &mut CaseStore,
    proposal: CaseDeleteProposal,
) -> Result<Case, CaseServiceError> {
    let case_id = proposal.case_id;
    if let Err(err) = persistence.delete_case(case_id) {
        warn!(
            "event=case_delete_failed module=case status=error id={case_id} reason={err}"
        );
        return Err(err.into());
    }
    info!("event=case_deleted module=case status=ok id={case_id}");
    Ok(store.remove_case(case_id)?)
}

#[cfg(test)]
mod tests {
    use super::{confirm_case_delete, propose_case_delete, save_case, CaseServiceError};
    use crate::model::case::{Case, CaseStatus};
    use crate::repo::case_store::CaseStore;
    use crate::repo::persistence::{InMemoryPersistence, PersistenceError};
    use uuid::Uuid;

    #[test]
    fn save_adds_then_replaces_the_snapshot_copy() {
        let persistence = InMemoryPersistence::new();
        let mut store = CaseStore::new();
        let mut case = Case::new("Familia Ortega");
        let case_id = case.id;

        save_case(&persistence, &mut store, case.clone()).unwrap();
        assert_eq!(store.cases().len(), 1);

        case.set_status(CaseStatus::Welcome);
        save_case(&persistence, &mut store, case).unwrap();
        assert_eq!(store.cases().len(), 1);
        assert_eq!(store.case(case_id).unwrap().status, CaseStatus::Welcome);
    }

    #[test]
    fn failed_save_leaves_the_snapshot_untouched() {
        let persistence = InMemoryPersistence::new();
        let mut store = CaseStore::new();
        let case = Case::new("Familia Ortega");

        persistence.fail_next_call(PersistenceError::Unavailable("offline".to_string()));
        let err = save_case(&persistence, &mut store, case).unwrap_err();
        assert!(matches!(err, CaseServiceError::Persistence(_)));
        assert!(store.cases().is_empty());
    }

    #[test]
    fn delete_requires_a_confirmed_proposal() {
        let persistence = InMemoryPersistence::new();
        let mut store = CaseStore::new();
        let case = Case::new("Familia Ortega");
        let case_id = case.id;
        store.add_case(case).unwrap();

        let proposal = propose_case_delete(&store, case_id).unwrap();
        // Declining by dropping leaves the case in place.
        drop(proposal);
        assert!(store.case(case_id).is_some());

        let proposal = propose_case_delete(&store, case_id).unwrap();
        let removed = confirm_case_delete(&persistence, &mut store, proposal).unwrap();
        assert_eq!(removed.id, case_id);
        assert!(store.case(case_id).is_none());
    }

    #[test]
    fn proposing_delete_for_unknown_case_fails() {
        let store = CaseStore::new();
        let missing = Uuid::new_v4();
        assert!(matches!(
            propose_case_delete(&store, missing),
            Err(CaseServiceError::CaseNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn failed_delete_keeps_the_case_for_retry() {
        let persistence = InMemoryPersistence::new();
        let mut store = CaseStore::new();
        let case = Case::new("Familia Ortega");
        let case_id = case.id;
        store.add_case(case).unwrap();

        let proposal = propose_case_delete(&store, case_id).unwrap();
        persistence.fail_next_call(PersistenceError::Rejected("conflict".to_string()));
        let err = confirm_case_delete(&persistence, &mut store, proposal).unwrap_err();
        assert!(matches!(err, CaseServiceError::Persistence(_)));
        assert!(store.case(case_id).is_some());
    }
}
