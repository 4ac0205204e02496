//! Intervention domain model.
//!
//! # Responsibility
//! - Define the scheduled/logged event record shared by the editor, the
//!   field notebook and the aggregation engine.
//! - Keep status stamping and window validation on the record itself.
//!
//! # Invariants
//! - `id` is stable and never nil on validated construction.
//! - `is_registered == true` implies `case_id.is_some()`.
//! - `end >= start`; equality is a valid zero-length window.
//! - `cancellation_time` is stamped exactly when the status enters
//!   `Cancelled` from a non-`Cancelled` state, and never overwritten.

use crate::model::case::CaseId;
use crate::model::professional::ProfessionalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an intervention.
pub type InterventionId = Uuid;

/// Closed kind set for interventions.
///
/// Case-scoped kinds describe work on one case file; general kinds cover
/// case-less work that still lands on the shared calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    HomeVisit,
    OfficeInterview,
    Accompaniment,
    FamilyMeeting,
    Coordination,
    Training,
    TeamMeeting,
    Other,
}

impl InterventionKind {
    /// Returns whether this kind describes case-less, general work.
    pub fn is_general(self) -> bool {
        matches!(
            self,
            Self::Coordination | Self::Training | Self::TeamMeeting | Self::Other
        )
    }

    /// Default kind for an editor seeded with a case.
    pub fn default_case_scoped() -> Self {
        Self::HomeVisit
    }

    /// Default kind for an editor seeded without a case.
    pub fn default_general() -> Self {
        Self::Coordination
    }
}

/// Intervention lifecycle state.
///
/// Three states with no terminal state: the status menu may move an
/// intervention between any pair of states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    Planned,
    Completed,
    Cancelled,
}

/// Validation errors for intervention records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterventionValidationError {
    /// Nil UUID provided for a stable identifier.
    NilId,
    /// Title is empty after trimming.
    EmptyTitle,
    /// Window ends before it starts.
    InvalidTimeWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Notebook registration without an owning case.
    RegisteredWithoutCase,
}

impl Display for InterventionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "intervention id must not be nil"),
            Self::EmptyTitle => write!(f, "intervention title must not be blank"),
            Self::InvalidTimeWindow { start, end } => {
                write!(f, "end ({end}) must be >= start ({start})")
            }
            Self::RegisteredWithoutCase => {
                write!(f, "a registered intervention must belong to a case")
            }
        }
    }
}

impl Error for InterventionValidationError {}

/// Scheduled or logged event, optionally tied to a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: InterventionId,
    /// Owning case; `None` marks a general, case-less intervention.
    pub case_id: Option<CaseId>,
    pub title: String,
    pub kind: InterventionKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_all_day: bool,
    pub notes: String,
    pub status: InterventionStatus,
    /// First instant the status entered `Cancelled`.
    pub cancellation_time: Option<DateTime<Utc>>,
    /// Whether this intervention appears in the field notebook.
    pub is_registered: bool,
    pub created_by: ProfessionalId,
}

impl Intervention {
    /// Creates a planned intervention with a generated stable ID.
    pub fn new(
        case_id: Option<CaseId>,
        title: impl Into<String>,
        kind: InterventionKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        created_by: ProfessionalId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            case_id,
            title: title.into(),
            kind,
            start,
            end,
            is_all_day: false,
            notes: String::new(),
            status: InterventionStatus::Planned,
            cancellation_time: None,
            is_registered: false,
            created_by,
        }
    }

    /// Creates an intervention with a caller-provided stable ID.
    ///
    /// Used where identity already exists externally.
    pub fn with_id(
        id: InterventionId,
        case_id: Option<CaseId>,
        title: impl Into<String>,
        kind: InterventionKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        created_by: ProfessionalId,
    ) -> Result<Self, InterventionValidationError> {
        if id.is_nil() {
            return Err(InterventionValidationError::NilId);
        }
        Ok(Self {
            id,
            ..Self::new(case_id, title, kind, start, end, created_by)
        })
    }

    /// Moves the status, stamping the first cancellation instant.
    ///
    /// Entering `Cancelled` from a non-`Cancelled` state records `now`;
    /// re-cancelling keeps the first stamp; leaving `Cancelled` keeps the
    /// historical stamp untouched.
    pub fn transition_status(&mut self, next: InterventionStatus, now: DateTime<Utc>) {
        if next == InterventionStatus::Cancelled && self.status != InterventionStatus::Cancelled {
            self.cancellation_time = Some(now);
        }
        self.status = next;
    }

    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `NilId` for a nil identifier.
    /// - `EmptyTitle` for a blank title.
    /// - `InvalidTimeWindow` when `end < start`.
    /// - `RegisteredWithoutCase` for notebook registration without a case.
    pub fn validate(&self) -> Result<(), InterventionValidationError> {
        if self.id.is_nil() {
            return Err(InterventionValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(InterventionValidationError::EmptyTitle);
        }
        if self.end < self.start {
            return Err(InterventionValidationError::InvalidTimeWindow {
                start: self.start,
                end: self.end,
            });
        }
        if self.is_registered && self.case_id.is_none() {
            return Err(InterventionValidationError::RegisteredWithoutCase);
        }
        Ok(())
    }

    /// Returns whether this intervention appears in the field notebook.
    pub fn is_notebook_entry(&self) -> bool {
        self.is_registered && self.case_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Intervention, InterventionKind, InterventionStatus, InterventionValidationError};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample() -> Intervention {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap();
        Intervention::new(
            None,
            "coordinación semanal",
            InterventionKind::Coordination,
            start,
            end,
            Uuid::new_v4(),
        )
    }

    #[test]
    fn new_sets_planned_unregistered_defaults() {
        let intervention = sample();
        assert!(!intervention.id.is_nil());
        assert_eq!(intervention.status, InterventionStatus::Planned);
        assert_eq!(intervention.cancellation_time, None);
        assert!(!intervention.is_registered);
        assert!(!intervention.is_all_day);
    }

    #[test]
    fn with_id_rejects_nil_uuid() {
        let probe = sample();
        let err = Intervention::with_id(
            Uuid::nil(),
            None,
            "x",
            InterventionKind::Other,
            probe.start,
            probe.end,
            probe.created_by,
        )
        .unwrap_err();
        assert_eq!(err, InterventionValidationError::NilId);
    }

    #[test]
    fn zero_length_window_is_valid() {
        let mut intervention = sample();
        intervention.end = intervention.start;
        assert!(intervention.validate().is_ok());
    }

    #[test]
    fn reversed_window_is_rejected() {
        let mut intervention = sample();
        intervention.end = intervention.start - chrono::Duration::minutes(1);
        let err = intervention.validate().unwrap_err();
        assert!(matches!(
            err,
            InterventionValidationError::InvalidTimeWindow { .. }
        ));
    }

    #[test]
    fn registration_requires_case() {
        let mut intervention = sample();
        intervention.is_registered = true;
        assert_eq!(
            intervention.validate().unwrap_err(),
            InterventionValidationError::RegisteredWithoutCase
        );

        intervention.case_id = Some(Uuid::new_v4());
        assert!(intervention.validate().is_ok());
        assert!(intervention.is_notebook_entry());
    }

    #[test]
    fn cancellation_stamp_is_first_write_wins() {
        let mut intervention = sample();
        let first = Utc.with_ymd_and_hms(2026, 3, 11, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 3, 12, 8, 0, 0).unwrap();

        intervention.transition_status(InterventionStatus::Cancelled, first);
        assert_eq!(intervention.cancellation_time, Some(first));

        intervention.transition_status(InterventionStatus::Cancelled, later);
        assert_eq!(intervention.cancellation_time, Some(first));

        intervention.transition_status(InterventionStatus::Planned, later);
        assert_eq!(intervention.cancellation_time, Some(first));

        intervention.transition_status(InterventionStatus::Cancelled, later);
        assert_eq!(intervention.cancellation_time, Some(later));
    }

    #[test]
    fn cancelling_from_completed_stamps_now() {
        let mut intervention = sample();
        let done = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        intervention.transition_status(InterventionStatus::Completed, done);
        assert_eq!(intervention.cancellation_time, None);

        intervention.transition_status(InterventionStatus::Cancelled, done);
        assert_eq!(intervention.cancellation_time, Some(done));
    }

    #[test]
    fn general_kind_classification() {
        assert!(InterventionKind::Coordination.is_general());
        assert!(InterventionKind::TeamMeeting.is_general());
        assert!(!InterventionKind::HomeVisit.is_general());
        assert!(!InterventionKind::Accompaniment.is_general());
    }
}
