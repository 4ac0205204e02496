//! Daily agenda and expired-action scans.
//!
//! # Responsibility
//! - Derive the caller's personal agenda for the current calendar day.
//! - Detect planned interventions left behind the grace window.
//!
//! # Invariants
//! - Both scans are pure and total over one store snapshot; empty input
//!   yields empty output, never an error.
//! - The agenda is strictly personal: only items the caller created.

use crate::model::intervention::{Intervention, InterventionStatus};
use crate::model::professional::ProfessionalId;
use crate::repo::case_store::CaseStore;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Grace window before a planned intervention counts as expired.
///
/// Deliberately 25 hours, not a calendar-day check: an action planned for
/// yesterday morning stays visible one extra hour before it is flagged.
pub const EXPIRED_ACTION_GRACE_HOURS: i64 = 25;

/// Interventions starting on the caller's current calendar day, created by
/// the caller, ascending by start.
///
/// The calendar day is evaluated in `now`'s timezone, so two caseworkers
/// in different offsets see different days over the same store.
pub fn today_agenda<'a, Tz: TimeZone>(
    store: &'a CaseStore,
    user: ProfessionalId,
    now: DateTime<Tz>,
) -> Vec<&'a Intervention> {
    let today = now.date_naive();
    let zone = now.timezone();
    let mut items: Vec<&Intervention> = store
        .iter_interventions()
        .filter(|item| item.created_by == user)
        .filter(|item| item.start.with_timezone(&zone).date_naive() == today)
        .collect();
    items.sort_by_key(|item| item.start);
    items
}

/// Planned interventions whose start is older than the grace window.
pub fn expired_actions<'a>(store: &'a CaseStore, now: DateTime<Utc>) -> Vec<&'a Intervention> {
    let cutoff = now - Duration::hours(EXPIRED_ACTION_GRACE_HOURS);
    store
        .iter_interventions()
        .filter(|item| item.status == InterventionStatus::Planned)
        .filter(|item| item.start < cutoff)
        .collect()
}
