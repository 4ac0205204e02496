//! Case aggregate model.
//!
//! # Responsibility
//! - Define the case file: interventions, tasks, records, family grid,
//!   private notes and team assignments.
//! - Keep the advisory status workflow free of transition gating.
//!
//! # Invariants
//! - `id` is stable and never reused for another case.
//! - Private notes are visible only to their author.
//! - `status` never restricts which status may come next.

use crate::model::intervention::Intervention;
use crate::model::professional::ProfessionalId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a case file.
pub type CaseId = Uuid;
/// Stable identifier for a case task.
pub type TaskId = Uuid;
/// Stable identifier for a private note.
pub type NoteId = Uuid;

/// Advisory intervention-process stage of a case.
///
/// The stage drives default-view selection only; arbitrary jumps are
/// permitted and nothing in core gates a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    PendingReferral,
    Welcome,
    CoDiagnosis,
    SharedPlanning,
    Accompaniment,
    FollowUp,
    Closed,
}

impl CaseStatus {
    /// Workflow display order, from referral to closure.
    pub const ALL: [CaseStatus; 7] = [
        CaseStatus::PendingReferral,
        CaseStatus::Welcome,
        CaseStatus::CoDiagnosis,
        CaseStatus::SharedPlanning,
        CaseStatus::Accompaniment,
        CaseStatus::FollowUp,
        CaseStatus::Closed,
    ];

    /// Returns whether the case has left the active case-load.
    pub fn is_closed(self) -> bool {
        self == CaseStatus::Closed
    }

    /// Stable display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::PendingReferral => "Pendiente de derivación",
            Self::Welcome => "Acogida",
            Self::CoDiagnosis => "Codiagnóstico",
            Self::SharedPlanning => "Planificación compartida",
            Self::Accompaniment => "Acompañamiento",
            Self::FollowUp => "Seguimiento",
            Self::Closed => "Cerrado",
        }
    }
}

/// Actionable task attached to a case file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub assigned_to: Vec<ProfessionalId>,
}

impl Task {
    /// Creates an open task with a generated stable ID.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            assigned_to: Vec::new(),
        }
    }
}

/// Historical record entry carried in the case file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub summary: String,
    pub author_id: ProfessionalId,
}

/// Household member row of the family grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub name: String,
    pub relationship: String,
    pub birth_date: Option<NaiveDate>,
    pub occupation: Option<String>,
}

/// Private caseworker note, visible only to its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateNote {
    pub id: NoteId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: ProfessionalId,
}

/// Tracked individual/family record progressing through the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub name: String,
    pub nickname: Option<String>,
    pub status: CaseStatus,
    pub address: Option<String>,
    pub interventions: Vec<Intervention>,
    pub tasks: Vec<Task>,
    pub records: Vec<CaseRecord>,
    pub family_grid: Vec<FamilyMember>,
    pub my_notes: Vec<PrivateNote>,
    pub professional_ids: Vec<ProfessionalId>,
}

impl Case {
    /// Creates an empty case file awaiting referral intake.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nickname: None,
            status: CaseStatus::PendingReferral,
            address: None,
            interventions: Vec::new(),
            tasks: Vec::new(),
            records: Vec::new(),
            family_grid: Vec::new(),
            my_notes: Vec::new(),
            professional_ids: Vec::new(),
        }
    }

    /// Moves the case to `next` without any transition gating.
    pub fn set_status(&mut self, next: CaseStatus) {
        self.status = next;
    }

    /// Returns the private notes the viewer authored.
    pub fn notes_for(&self, viewer: ProfessionalId) -> Vec<&PrivateNote> {
        self.my_notes
            .iter()
            .filter(|note| note.author_id == viewer)
            .collect()
    }

    /// Field-notebook view: the registered interventions on this file.
    pub fn field_notebook(&self) -> Vec<&Intervention> {
        self.interventions
            .iter()
            .filter(|item| item.is_registered)
            .collect()
    }

    /// Looks up one task by stable ID.
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Looks up one intervention by stable ID.
    pub fn intervention(&self, id: Uuid) -> Option<&Intervention> {
        self.interventions.iter().find(|item| item.id == id)
    }
}
