//! External-store collaborator contract.
//!
//! # Responsibility
//! - Define the save/delete contract the core invokes on case and
//!   intervention mutations.
//! - Provide an in-memory reference implementation for tests and probes.
//!
//! # Invariants
//! - A failed call must leave the caller's in-memory draft usable for
//!   manual retry; implementations never consume state.
//! - No call here is fatal to the core.

use crate::model::case::{Case, CaseId};
use crate::model::intervention::{Intervention, InterventionId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Recoverable failure reported by the external store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Store could not be reached.
    Unavailable(String),
    /// Store refused the write.
    Rejected(String),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "store unavailable: {reason}"),
            Self::Rejected(reason) => write!(f, "store rejected write: {reason}"),
        }
    }
}

impl Error for PersistenceError {}

/// Save/delete contract for the external case store.
///
/// The core calls these synchronously and treats every failure as
/// recoverable; serialization of concurrent writers stays with the
/// implementation (last-write-wins).
pub trait CasePersistence {
    fn save_case(&self, case: &Case) -> PersistenceResult<()>;
    fn delete_case(&self, case_id: CaseId) -> PersistenceResult<()>;
    fn save_intervention(&self, intervention: &Intervention) -> PersistenceResult<()>;
    fn delete_intervention(&self, intervention: &Intervention) -> PersistenceResult<()>;
}

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceCall {
    SaveCase(CaseId),
    DeleteCase(CaseId),
    SaveIntervention(InterventionId),
    DeleteIntervention(InterventionId),
}

/// Call-recording in-memory store double.
///
/// `fail_next_call` arms a one-shot failure so retry paths can be
/// exercised; the armed reason is consumed by the next call regardless of
/// which operation it is.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    calls: Mutex<Vec<PersistenceCall>>,
    armed_failure: Mutex<Option<PersistenceError>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms one failure returned by the next call.
    pub fn fail_next_call(&self, error: PersistenceError) {
        *self
            .armed_failure
            .lock()
            .expect("persistence failure lock poisoned") = Some(error);
    }

    /// Returns the calls recorded so far.
    pub fn calls(&self) -> Vec<PersistenceCall> {
        self.calls
            .lock()
            .expect("persistence call-log lock poisoned")
            .clone()
    }

    fn record(&self, call: PersistenceCall) -> PersistenceResult<()> {
        if let Some(error) = self
            .armed_failure
            .lock()
            .expect("persistence failure lock poisoned")
            .take()
        {
            return Err(error);
        }
        self.calls
            .lock()
            .expect("persistence call-log lock poisoned")
            .push(call);
        Ok(())
    }
}

impl CasePersistence for InMemoryPersistence {
    fn save_case(&self, case: &Case) -> PersistenceResult<()> {
        self.record(PersistenceCall::SaveCase(case.id))
    }

    fn delete_case(&self, case_id: CaseId) -> PersistenceResult<()> {
        self.record(PersistenceCall::DeleteCase(case_id))
    }

    fn save_intervention(&self, intervention: &Intervention) -> PersistenceResult<()> {
        self.record(PersistenceCall::SaveIntervention(intervention.id))
    }

    fn delete_intervention(&self, intervention: &Intervention) -> PersistenceResult<()> {
        self.record(PersistenceCall::DeleteIntervention(intervention.id))
    }
}

#[cfg(test)]
mod tests {
    use super::{CasePersistence, InMemoryPersistence, PersistenceCall, PersistenceError};
    use crate::model::case::Case;

    #[test]
    fn records_calls_in_order() {
        let persistence = InMemoryPersistence::new();
        let case = Case::new("Familia Soto");

        persistence.save_case(&case).unwrap();
        persistence.delete_case(case.id).unwrap();

        assert_eq!(
            persistence.calls(),
            vec![
                PersistenceCall::SaveCase(case.id),
                PersistenceCall::DeleteCase(case.id),
            ]
        );
    }

    #[test]
    fn armed_failure_fires_once() {
        let persistence = InMemoryPersistence::new();
        let case = Case::new("Familia Soto");

        persistence.fail_next_call(PersistenceError::Unavailable("offline".to_string()));
        let err = persistence.save_case(&case).unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable(_)));
        assert!(persistence.calls().is_empty());

        persistence.save_case(&case).unwrap();
        assert_eq!(persistence.calls().len(), 1);
    }
}
