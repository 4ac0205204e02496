//! Intervention editor state machine.
//!
//! # Responsibility
//! - Produce a validated intervention from incremental field edits.
//! - Preserve temporal consistency: duration-preserving start shifts and
//!   lossless local-time field round-trips.
//! - Gate de-registration and delete behind a two-phase confirmation.
//!
//! # Invariants
//! - Clearing the case assignment forces `is_registered = false`.
//! - A reversed window is reported as a field issue, never silently fixed.
//! - A pending proposal applies at most once, only on explicit confirm.
//! - A failed save leaves the draft untouched for manual retry.

use crate::model::case::CaseId;
use crate::model::intervention::{
    Intervention, InterventionId, InterventionKind, InterventionStatus,
    InterventionValidationError,
};
use crate::model::professional::ProfessionalId;
use crate::repo::persistence::{CasePersistence, PersistenceError};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Wall-clock format of `datetime-local` style editor fields.
pub const LOCAL_FIELD_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DEFAULT_WINDOW_MINUTES: i64 = 60;

/// Pre-filled initial state handed to the editor.
///
/// Unset fields fall back to seed derivation: kind by case scope, start at
/// the opening instant, end one hour later, status `Planned`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterventionSeed {
    pub case_id: Option<CaseId>,
    pub title: Option<String>,
    pub kind: Option<InterventionKind>,
    pub notes: Option<String>,
    pub status: Option<InterventionStatus>,
    pub is_registered: bool,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Handle for one proposed gated mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingMutation {
    Deregister,
    Delete,
}

/// Result of requesting a mutation that may need confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Mutation applied directly; no data loss involved.
    Applied,
    /// Mutation held until `confirm_*` is called with this token.
    Proposed(ProposalToken),
}

/// Errors from editor operations.
#[derive(Debug)]
pub enum EditorError {
    /// Field-scoped validation issues blocking submission.
    Invalid(Vec<InterventionValidationError>),
    /// Local wall-clock field could not be parsed.
    InvalidLocalField(String),
    /// External store failed; the draft is retained for retry.
    Persistence(PersistenceError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(issues) => {
                write!(f, "draft is not valid: ")?;
                for (index, issue) in issues.iter().enumerate() {
                    if index > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{issue}")?;
                }
                Ok(())
            }
            Self::InvalidLocalField(field) => {
                write!(f, "unparseable local date-time field: `{field}`")
            }
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersistenceError> for EditorError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Draft state machine for one intervention.
pub struct InterventionEditor {
    saved_id: Option<InterventionId>,
    original: Option<Intervention>,
    case_id: Option<CaseId>,
    title: String,
    kind: InterventionKind,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    is_all_day: bool,
    notes: String,
    status: InterventionStatus,
    cancellation_time: Option<DateTime<Utc>>,
    is_registered: bool,
    created_by: ProfessionalId,
    /// Registration state last persisted; gates de-registration.
    was_registered: bool,
    pending: Option<(ProposalToken, PendingMutation)>,
    next_token: u64,
}

impl InterventionEditor {
    /// Derives a fresh draft from a seed.
    ///
    /// Kind defaults by case scope; `start = now`, `end = start + 1h`
    /// unless the seed provides a window. A seed asking for registration
    /// without a case is downgraded to unregistered.
    pub fn from_seed(seed: InterventionSeed, author: ProfessionalId, now: DateTime<Utc>) -> Self {
        let kind = seed.kind.unwrap_or_else(|| {
            if seed.case_id.is_some() {
                InterventionKind::default_case_scoped()
            } else {
                InterventionKind::default_general()
            }
        });
        let start = seed.start.unwrap_or(now);
        let end = seed
            .end
            .unwrap_or(start + Duration::minutes(DEFAULT_WINDOW_MINUTES));
        let is_registered = seed.is_registered && seed.case_id.is_some();

        Self {
            saved_id: None,
            original: None,
            case_id: seed.case_id,
            title: seed.title.unwrap_or_default(),
            kind,
            start,
            end,
            is_all_day: false,
            notes: seed.notes.unwrap_or_default(),
            status: seed.status.unwrap_or(InterventionStatus::Planned),
            cancellation_time: None,
            is_registered,
            created_by: author,
            was_registered: false,
            pending: None,
            next_token: 0,
        }
    }

    /// Opens the editor on an already-persisted intervention.
    pub fn from_existing(intervention: Intervention) -> Self {
        Self {
            saved_id: Some(intervention.id),
            case_id: intervention.case_id,
            title: intervention.title.clone(),
            kind: intervention.kind,
            start: intervention.start,
            end: intervention.end,
            is_all_day: intervention.is_all_day,
            notes: intervention.notes.clone(),
            status: intervention.status,
            cancellation_time: intervention.cancellation_time,
            is_registered: intervention.is_registered,
            created_by: intervention.created_by,
            was_registered: intervention.is_registered,
            original: Some(intervention),
            pending: None,
            next_token: 0,
        }
    }

    pub fn saved_id(&self) -> Option<InterventionId> {
        self.saved_id
    }

    pub fn case_id(&self) -> Option<CaseId> {
        self.case_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> InterventionKind {
        self.kind
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn is_all_day(&self) -> bool {
        self.is_all_day
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn status(&self) -> InterventionStatus {
        self.status
    }

    pub fn is_registered(&self) -> bool {
        self.is_registered
    }

    pub fn pending_proposal(&self) -> Option<ProposalToken> {
        self.pending.map(|(token, _)| token)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_kind(&mut self, kind: InterventionKind) {
        self.kind = kind;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_all_day(&mut self, is_all_day: bool) {
        self.is_all_day = is_all_day;
    }

    /// Moves the draft status, stamping the first cancellation instant.
    pub fn set_status(&mut self, next: InterventionStatus, now: DateTime<Utc>) {
        if next == InterventionStatus::Cancelled && self.status != InterventionStatus::Cancelled {
            self.cancellation_time = Some(now);
        }
        self.status = next;
    }

    /// Assigns or clears the owning case.
    ///
    /// Clearing forces `is_registered = false`: an intervention without a
    /// case cannot stay in the field notebook.
    pub fn set_case(&mut self, case_id: Option<CaseId>) {
        self.case_id = case_id;
        if self.case_id.is_none() {
            self.is_registered = false;
        }
    }

    /// Shifts the start, carrying the end by the same delta.
    ///
    /// The draft window duration is preserved exactly.
    pub fn set_start(&mut self, new_start: DateTime<Utc>) {
        let delta = new_start - self.start;
        self.start = new_start;
        self.end = self.end + delta;
    }

    /// Sets the end freely; a reversed window surfaces as a field issue.
    pub fn set_end(&mut self, new_end: DateTime<Utc>) {
        self.end = new_end;
    }

    /// Sets the start from a `YYYY-MM-DDTHH:MM` wall-clock field.
    pub fn set_start_local(&mut self, field: &str, offset: FixedOffset) -> Result<(), EditorError> {
        let instant = parse_local_field(field, offset)?;
        self.set_start(instant);
        Ok(())
    }

    /// Sets the end from a `YYYY-MM-DDTHH:MM` wall-clock field.
    pub fn set_end_local(&mut self, field: &str, offset: FixedOffset) -> Result<(), EditorError> {
        self.end = parse_local_field(field, offset)?;
        Ok(())
    }

    /// Formats the start back into the wall-clock field format.
    pub fn start_local_field(&self, offset: FixedOffset) -> String {
        self.start
            .with_timezone(&offset)
            .format(LOCAL_FIELD_FORMAT)
            .to_string()
    }

    /// Formats the end back into the wall-clock field format.
    pub fn end_local_field(&self, offset: FixedOffset) -> String {
        self.end
            .with_timezone(&offset)
            .format(LOCAL_FIELD_FORMAT)
            .to_string()
    }

    /// Marks the draft registered in the field notebook.
    ///
    /// Re-checking is unconditional and withdraws a pending
    /// de-registration proposal.
    pub fn set_registered(&mut self) {
        if matches!(self.pending, Some((_, PendingMutation::Deregister))) {
            self.pending = None;
        }
        if self.case_id.is_some() {
            self.is_registered = true;
        }
    }

    /// Requests removal of the notebook registration.
    ///
    /// Unchecking a registration that was already persisted is visible
    /// data loss, so it is proposed rather than applied; a draft that was
    /// never saved as registered unchecks directly.
    pub fn request_deregistration(&mut self) -> GateOutcome {
        if self.is_registered && self.was_registered {
            GateOutcome::Proposed(self.issue_token(PendingMutation::Deregister))
        } else {
            self.is_registered = false;
            GateOutcome::Applied
        }
    }

    /// Proposes deleting the intervention; applies only on confirm.
    pub fn propose_delete(&mut self) -> ProposalToken {
        self.issue_token(PendingMutation::Delete)
    }

    /// Applies a proposed de-registration.
    ///
    /// Returns `true` when the live proposal was consumed and applied; a
    /// stale or mismatched token is a no-op.
    pub fn confirm_deregistration(&mut self, token: ProposalToken) -> bool {
        match self.pending {
            Some((live, PendingMutation::Deregister)) if live == token => {
                self.pending = None;
                self.is_registered = false;
                true
            }
            _ => false,
        }
    }

    /// Applies a proposed delete against the external store.
    ///
    /// Returns `Ok(true)` when the proposal was consumed and the persisted
    /// copy (if any) deleted; `Ok(false)` for a stale or mismatched token.
    ///
    /// # Errors
    /// - `Persistence` when the store rejects the delete; the proposal is
    ///   already consumed, so retrying requires a fresh proposal.
    pub fn confirm_delete<P: CasePersistence>(
        &mut self,
        token: ProposalToken,
        persistence: &P,
    ) -> Result<bool, EditorError> {
        match self.pending {
            Some((live, PendingMutation::Delete)) if live == token => {}
            _ => return Ok(false),
        }
        self.pending = None;

        if let Some(original) = &self.original {
            if let Err(err) = persistence.delete_intervention(original) {
                warn!(
                    "event=intervention_delete_failed module=editor status=error id={} reason={}",
                    original.id, err
                );
                return Err(err.into());
            }
            info!(
                "event=intervention_deleted module=editor status=ok id={}",
                original.id
            );
        }
        Ok(true)
    }

    /// Discards the pending proposal; prior state stands unchanged.
    pub fn cancel_proposal(&mut self, token: ProposalToken) {
        if matches!(self.pending, Some((live, _)) if live == token) {
            self.pending = None;
        }
    }

    /// Field-scoped validation issues for the current draft.
    ///
    /// Derived purely from draft state, so an issue disappears the moment
    /// its field becomes valid.
    pub fn field_issues(&self) -> Vec<InterventionValidationError> {
        let mut issues = Vec::new();
        if self.title.trim().is_empty() {
            issues.push(InterventionValidationError::EmptyTitle);
        }
        if self.end < self.start {
            issues.push(InterventionValidationError::InvalidTimeWindow {
                start: self.start,
                end: self.end,
            });
        }
        issues
    }

    /// Current title field issue, if any.
    pub fn title_issue(&self) -> Option<InterventionValidationError> {
        self.field_issues()
            .into_iter()
            .find(|issue| matches!(issue, InterventionValidationError::EmptyTitle))
    }

    /// Current date-range field issue, if any.
    pub fn date_range_issue(&self) -> Option<InterventionValidationError> {
        self.field_issues()
            .into_iter()
            .find(|issue| matches!(issue, InterventionValidationError::InvalidTimeWindow { .. }))
    }

    /// Validates and saves the draft through the external store.
    ///
    /// A draft without a saved ID creates; one with a saved ID updates.
    /// On success the editor adopts the saved identity, so the next submit
    /// is an update.
    ///
    /// # Errors
    /// - `Invalid` with every open field issue; nothing is persisted.
    /// - `Persistence` when the store fails; the draft is retained
    ///   untouched for manual retry.
    pub fn submit<P: CasePersistence>(
        &mut self,
        persistence: &P,
    ) -> Result<Intervention, EditorError> {
        let issues = self.field_issues();
        if !issues.is_empty() {
            return Err(EditorError::Invalid(issues));
        }

        let intervention = self.build_record()?;
        if let Err(err) = persistence.save_intervention(&intervention) {
            warn!(
                "event=intervention_save_failed module=editor status=error id={} reason={}",
                intervention.id, err
            );
            return Err(err.into());
        }

        info!(
            "event=intervention_saved module=editor status=ok id={} case_scoped={} registered={}",
            intervention.id,
            intervention.case_id.is_some(),
            intervention.is_registered
        );
        self.saved_id = Some(intervention.id);
        self.was_registered = intervention.is_registered;
        self.original = Some(intervention.clone());
        Ok(intervention)
    }

    fn build_record(&self) -> Result<Intervention, EditorError> {
        let record = Intervention {
            id: self.saved_id.unwrap_or_else(Uuid::new_v4),
            case_id: self.case_id,
            title: self.title.clone(),
            kind: self.kind,
            start: self.start,
            end: self.end,
            is_all_day: self.is_all_day,
            notes: self.notes.clone(),
            status: self.status,
            cancellation_time: self.cancellation_time,
            is_registered: self.is_registered,
            created_by: self.created_by,
        };
        record
            .validate()
            .map_err(|issue| EditorError::Invalid(vec![issue]))?;
        Ok(record)
    }

    fn issue_token(&mut self, mutation: PendingMutation) -> ProposalToken {
        self.next_token += 1;
        let token = ProposalToken(self.next_token);
        self.pending = Some((token, mutation));
        token
    }
}

fn parse_local_field(field: &str, offset: FixedOffset) -> Result<DateTime<Utc>, EditorError> {
    let naive = NaiveDateTime::parse_from_str(field.trim(), LOCAL_FIELD_FORMAT)
        .map_err(|_| EditorError::InvalidLocalField(field.to_string()))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| EditorError::InvalidLocalField(field.to_string()))
}
