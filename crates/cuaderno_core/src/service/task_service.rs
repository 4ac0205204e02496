//! Task to field-notebook bridge.
//!
//! # Responsibility
//! - Turn a completed case task into a pre-filled intervention seed for
//!   the editor.
//!
//! # Invariants
//! - The seed is forced `Completed` and registered, tied to the owning
//!   case.
//! - The source task is never mutated or deleted; conversion only
//!   proposes a new intervention.

use crate::model::case::{CaseId, Task, TaskId};
use crate::model::intervention::{InterventionKind, InterventionStatus};
use crate::repo::case_store::CaseStore;
use crate::service::editor_service::InterventionSeed;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Title prefix marking a converted task in the notebook.
pub const TASK_TITLE_PREFIX: &str = "Tarea: ";

/// Errors from task conversion lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskBridgeError {
    /// Owning case is not in the store.
    CaseNotFound(CaseId),
    /// Task is not on the owning case.
    TaskNotFound(TaskId),
}

impl Display for TaskBridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaseNotFound(id) => write!(f, "case not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for TaskBridgeError {}

/// Builds the editor seed for one case task.
///
/// Title becomes `"Tarea: {text}"`, kind `Accompaniment`, status forced
/// `Completed` and registration forced on; the notes carry a reference
/// back to the task text. Only case-scoped tasks reach this call: a task
/// always lives on a case file, which becomes the seed's case.
pub fn intervention_seed_from_task(case_id: CaseId, task: &Task) -> InterventionSeed {
    InterventionSeed {
        case_id: Some(case_id),
        title: Some(format!("{TASK_TITLE_PREFIX}{}", task.text)),
        kind: Some(InterventionKind::Accompaniment),
        notes: Some(format!(
            "Registro generado desde la tarea: \"{}\"",
            task.text
        )),
        status: Some(InterventionStatus::Completed),
        is_registered: true,
        start: None,
        end: None,
    }
}

/// Looks up a case task in the store and builds its editor seed.
///
/// # Errors
/// - `CaseNotFound` / `TaskNotFound` when the lookup misses; the store is
///   left untouched either way.
pub fn seed_for_case_task(
    store: &CaseStore,
    case_id: CaseId,
    task_id: TaskId,
) -> Result<InterventionSeed, TaskBridgeError> {
    let case = store
        .case(case_id)
        .ok_or(TaskBridgeError::CaseNotFound(case_id))?;
    let task = case
        .task(task_id)
        .ok_or(TaskBridgeError::TaskNotFound(task_id))?;
    Ok(intervention_seed_from_task(case_id, task))
}
