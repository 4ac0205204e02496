//! Case-load alerts and groupings.
//!
//! # Responsibility
//! - Flag active cases missing a social worker or an EDIS technician.
//! - Group the active case-load by workflow status and by CEAS unit.
//!
//! # Invariants
//! - Closed cases are exempt from every scan here.
//! - Partial data maps to explicit buckets (`ceas = None`), never errors.
//! - Group ordering: descending count, ties by first encounter.

use crate::model::case::{Case, CaseId, CaseStatus};
use crate::model::professional::ProfessionalRole;
use crate::repo::case_store::CaseStore;

/// Team-composition gap on one active case.
///
/// Both flags may be set at once; a case with a complete team is not
/// reported at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamGap {
    pub case_id: CaseId,
    pub missing_social_worker: bool,
    pub missing_edis_technician: bool,
}

/// One workflow-status slice of the active case-load.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSlice {
    pub status: CaseStatus,
    pub count: usize,
    pub percent: f64,
}

/// One CEAS slice of the active case-load; `None` is the explicit
/// unassigned bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CeasSlice {
    pub ceas: Option<String>,
    pub count: usize,
    pub percent: f64,
}

/// Scans every non-Closed case for missing required roles.
///
/// Assigned professional ids without a directory entry contribute
/// nothing; a case whose whole team is unresolvable is flagged for both
/// roles.
pub fn team_gaps(store: &CaseStore) -> Vec<TeamGap> {
    store
        .cases()
        .iter()
        .filter(|case| !case.status.is_closed())
        .filter_map(|case| {
            let mut has_social_worker = false;
            let mut has_edis_technician = false;
            for id in &case.professional_ids {
                match store.professional(*id).map(|entry| entry.role) {
                    Some(ProfessionalRole::SocialWorker) => has_social_worker = true,
                    Some(ProfessionalRole::EdisTechnician) => has_edis_technician = true,
                    _ => {}
                }
            }
            if has_social_worker && has_edis_technician {
                None
            } else {
                Some(TeamGap {
                    case_id: case.id,
                    missing_social_worker: !has_social_worker,
                    missing_edis_technician: !has_edis_technician,
                })
            }
        })
        .collect()
}

/// Groups active cases by workflow status.
pub fn status_breakdown(store: &CaseStore) -> Vec<StatusSlice> {
    let groups = active_groups(store, |case| case.status);
    shape_slices(groups, |(status, count), percent| StatusSlice {
        status,
        count,
        percent,
    })
}

/// Groups active cases by the CEAS of their assigned social worker.
///
/// A case with no social worker, or one whose social worker carries no
/// CEAS, lands in the explicit unassigned bucket.
pub fn ceas_breakdown(store: &CaseStore) -> Vec<CeasSlice> {
    let groups = active_groups(store, |case| case_ceas(store, case));
    shape_slices(groups, |(ceas, count), percent| CeasSlice {
        ceas,
        count,
        percent,
    })
}

fn case_ceas(store: &CaseStore, case: &Case) -> Option<String> {
    case.professional_ids
        .iter()
        .filter_map(|id| store.professional(*id))
        .find(|entry| entry.role == ProfessionalRole::SocialWorker)
        .and_then(|entry| entry.ceas.clone())
}

/// Accumulates group counts over active cases, keeping first-encounter
/// order for tie-breaking.
fn active_groups<K: PartialEq>(store: &CaseStore, key_of: impl Fn(&Case) -> K) -> Vec<(K, usize)> {
    let mut groups: Vec<(K, usize)> = Vec::new();
    for case in store.cases() {
        if case.status.is_closed() {
            continue;
        }
        let key = key_of(case);
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, count)) => *count += 1,
            None => groups.push((key, 1)),
        }
    }
    groups
}

fn shape_slices<K, S, F>(mut groups: Vec<(K, usize)>, shape: F) -> Vec<S>
where
    F: Fn((K, usize), f64) -> S,
{
    let total: usize = groups.iter().map(|(_, count)| count).sum();
    // Stable sort keeps first-encounter order inside equal counts.
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .map(|(key, count)| {
            let percent = (count as f64) * 100.0 / (total as f64);
            shape((key, count), percent)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ceas_breakdown, status_breakdown, team_gaps};
    use crate::model::case::{Case, CaseStatus};
    use crate::model::professional::{Professional, ProfessionalRole};
    use crate::repo::case_store::CaseStore;

    fn case_with(status: CaseStatus, professionals: &[&Professional]) -> Case {
        let mut case = Case::new("familia");
        case.status = status;
        case.professional_ids = professionals.iter().map(|entry| entry.id).collect();
        case
    }

    #[test]
    fn empty_store_yields_empty_groups() {
        let store = CaseStore::new();
        assert!(team_gaps(&store).is_empty());
        assert!(status_breakdown(&store).is_empty());
        assert!(ceas_breakdown(&store).is_empty());
    }

    #[test]
    fn social_worker_alone_flags_missing_edis() {
        let mut store = CaseStore::new();
        let worker = Professional::new("Marta", ProfessionalRole::SocialWorker);
        let case = case_with(CaseStatus::Accompaniment, &[&worker]);
        let case_id = case.id;
        store.add_professional(worker);
        store.add_case(case).unwrap();

        let gaps = team_gaps(&store);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].case_id, case_id);
        assert!(!gaps[0].missing_social_worker);
        assert!(gaps[0].missing_edis_technician);
    }

    #[test]
    fn closed_case_with_no_team_is_never_flagged() {
        let mut store = CaseStore::new();
        store
            .add_case(case_with(CaseStatus::Closed, &[]))
            .unwrap();
        assert!(team_gaps(&store).is_empty());
    }

    #[test]
    fn complete_team_is_not_reported() {
        let mut store = CaseStore::new();
        let worker = Professional::new("Marta", ProfessionalRole::SocialWorker);
        let technician = Professional::new("Luis", ProfessionalRole::EdisTechnician);
        let case = case_with(CaseStatus::Welcome, &[&worker, &technician]);
        store.add_professional(worker);
        store.add_professional(technician);
        store.add_case(case).unwrap();

        assert!(team_gaps(&store).is_empty());
    }

    #[test]
    fn status_groups_sort_by_descending_count() {
        let mut store = CaseStore::new();
        store
            .add_case(case_with(CaseStatus::Welcome, &[]))
            .unwrap();
        store
            .add_case(case_with(CaseStatus::Accompaniment, &[]))
            .unwrap();
        store
            .add_case(case_with(CaseStatus::Accompaniment, &[]))
            .unwrap();
        store.add_case(case_with(CaseStatus::Closed, &[])).unwrap();

        let slices = status_breakdown(&store);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].status, CaseStatus::Accompaniment);
        assert_eq!(slices[0].count, 2);
        assert!((slices[0].percent - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(slices[1].status, CaseStatus::Welcome);
    }

    #[test]
    fn ceas_groups_bucket_unassigned_explicitly() {
        let mut store = CaseStore::new();
        let north = Professional::with_ceas("Marta", ProfessionalRole::SocialWorker, "CEAS Norte");
        let bare = Professional::new("Ana", ProfessionalRole::SocialWorker);
        let with_unit = case_with(CaseStatus::FollowUp, &[&north]);
        let without_unit = case_with(CaseStatus::FollowUp, &[&bare]);
        let without_worker = case_with(CaseStatus::FollowUp, &[]);
        store.add_professional(north);
        store.add_professional(bare);
        store.add_case(with_unit).unwrap();
        store.add_case(without_unit).unwrap();
        store.add_case(without_worker).unwrap();

        let slices = ceas_breakdown(&store);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].ceas, None);
        assert_eq!(slices[0].count, 2);
        assert_eq!(slices[1].ceas.as_deref(), Some("CEAS Norte"));
        assert_eq!(slices[1].count, 1);
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let mut store = CaseStore::new();
        store
            .add_case(case_with(CaseStatus::FollowUp, &[]))
            .unwrap();
        store
            .add_case(case_with(CaseStatus::Welcome, &[]))
            .unwrap();

        let slices = status_breakdown(&store);
        assert_eq!(slices[0].status, CaseStatus::FollowUp);
        assert_eq!(slices[1].status, CaseStatus::Welcome);
    }
}
