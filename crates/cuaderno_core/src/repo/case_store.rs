//! In-memory case collection snapshot.
//!
//! # Responsibility
//! - Keep the full case set, general interventions and the professional
//!   directory behind total, non-panicking lookups.
//! - Route intervention upserts/removals to the owning case or the
//!   general list.
//!
//! # Invariants
//! - Case IDs are unique within one store.
//! - The aggregation engine only ever borrows this store; it never writes.

use crate::model::case::{Case, CaseId};
use crate::model::intervention::{Intervention, InterventionId};
use crate::model::professional::{Professional, ProfessionalId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store mutation operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Case ID already present in the store.
    DuplicateCase(CaseId),
    /// Owning case of an intervention is not in the store.
    CaseNotFound(CaseId),
    /// Target intervention is in neither a case nor the general list.
    InterventionNotFound(InterventionId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCase(id) => write!(f, "case already in store: {id}"),
            Self::CaseNotFound(id) => write!(f, "case not found: {id}"),
            Self::InterventionNotFound(id) => write!(f, "intervention not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Explicit snapshot of the current case-load.
///
/// Aggregation functions take this by reference and stay pure relative to
/// one snapshot; mutation happens only through the methods below.
#[derive(Debug, Clone, Default)]
pub struct CaseStore {
    cases: Vec<Case>,
    general_interventions: Vec<Intervention>,
    professionals: Vec<Professional>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one case file.
    pub fn add_case(&mut self, case: Case) -> StoreResult<()> {
        if self.case(case.id).is_some() {
            return Err(StoreError::DuplicateCase(case.id));
        }
        self.cases.push(case);
        Ok(())
    }

    /// Removes one case file with everything it carries.
    pub fn remove_case(&mut self, case_id: CaseId) -> StoreResult<Case> {
        let index = self
            .cases
            .iter()
            .position(|case| case.id == case_id)
            .ok_or(StoreError::CaseNotFound(case_id))?;
        Ok(self.cases.remove(index))
    }

    /// Registers one directory professional.
    pub fn add_professional(&mut self, professional: Professional) {
        self.professionals.push(professional);
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn case(&self, case_id: CaseId) -> Option<&Case> {
        self.cases.iter().find(|case| case.id == case_id)
    }

    pub fn case_mut(&mut self, case_id: CaseId) -> Option<&mut Case> {
        self.cases.iter_mut().find(|case| case.id == case_id)
    }

    pub fn general_interventions(&self) -> &[Intervention] {
        &self.general_interventions
    }

    pub fn professionals(&self) -> &[Professional] {
        &self.professionals
    }

    pub fn professional(&self, id: ProfessionalId) -> Option<&Professional> {
        self.professionals.iter().find(|entry| entry.id == id)
    }

    /// Iterates every intervention: case-scoped first, then general.
    pub fn iter_interventions(&self) -> impl Iterator<Item = &Intervention> {
        self.cases
            .iter()
            .flat_map(|case| case.interventions.iter())
            .chain(self.general_interventions.iter())
    }

    /// Inserts or replaces one intervention, routed by `case_id`.
    ///
    /// An update that moves an intervention between a case and the general
    /// list (or between cases) removes the old copy first, so one stable
    /// ID never appears twice.
    pub fn upsert_intervention(&mut self, intervention: Intervention) -> StoreResult<()> {
        if let Some(case_id) = intervention.case_id {
            if self.case(case_id).is_none() {
                return Err(StoreError::CaseNotFound(case_id));
            }
        }

        let _ = self.remove_intervention(intervention.id);

        match intervention.case_id {
            Some(case_id) => {
                let case = self
                    .case_mut(case_id)
                    .ok_or(StoreError::CaseNotFound(case_id))?;
                case.interventions.push(intervention);
            }
            None => self.general_interventions.push(intervention),
        }
        Ok(())
    }

    /// Removes one intervention wherever it lives.
    pub fn remove_intervention(&mut self, id: InterventionId) -> StoreResult<Intervention> {
        for case in &mut self.cases {
            if let Some(index) = case.interventions.iter().position(|item| item.id == id) {
                return Ok(case.interventions.remove(index));
            }
        }
        if let Some(index) = self
            .general_interventions
            .iter()
            .position(|item| item.id == id)
        {
            return Ok(self.general_interventions.remove(index));
        }
        Err(StoreError::InterventionNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::{CaseStore, StoreError};
    use crate::model::case::Case;
    use crate::model::intervention::{Intervention, InterventionKind};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn intervention(case_id: Option<Uuid>, title: &str) -> Intervention {
        let start = Utc::now();
        Intervention::new(
            case_id,
            title,
            InterventionKind::HomeVisit,
            start,
            start + Duration::hours(1),
            Uuid::new_v4(),
        )
    }

    #[test]
    fn duplicate_case_is_rejected() {
        let mut store = CaseStore::new();
        let case = Case::new("Familia Ruiz");
        let dup = case.clone();
        store.add_case(case).unwrap();
        assert!(matches!(
            store.add_case(dup),
            Err(StoreError::DuplicateCase(_))
        ));
    }

    #[test]
    fn upsert_routes_by_case_id() {
        let mut store = CaseStore::new();
        let case = Case::new("Familia Ruiz");
        let case_id = case.id;
        store.add_case(case).unwrap();

        store
            .upsert_intervention(intervention(Some(case_id), "visita"))
            .unwrap();
        store
            .upsert_intervention(intervention(None, "coordinación"))
            .unwrap();

        assert_eq!(store.case(case_id).unwrap().interventions.len(), 1);
        assert_eq!(store.general_interventions().len(), 1);
        assert_eq!(store.iter_interventions().count(), 2);
    }

    #[test]
    fn upsert_replaces_existing_copy() {
        let mut store = CaseStore::new();
        let case = Case::new("Familia Ruiz");
        let case_id = case.id;
        store.add_case(case).unwrap();

        let mut item = intervention(Some(case_id), "visita");
        store.upsert_intervention(item.clone()).unwrap();

        item.title = "visita reprogramada".to_string();
        store.upsert_intervention(item.clone()).unwrap();

        let stored = store.case(case_id).unwrap();
        assert_eq!(stored.interventions.len(), 1);
        assert_eq!(stored.interventions[0].title, "visita reprogramada");
    }

    #[test]
    fn upsert_can_move_between_general_and_case() {
        let mut store = CaseStore::new();
        let case = Case::new("Familia Ruiz");
        let case_id = case.id;
        store.add_case(case).unwrap();

        let mut item = intervention(None, "acompañamiento");
        store.upsert_intervention(item.clone()).unwrap();

        item.case_id = Some(case_id);
        store.upsert_intervention(item.clone()).unwrap();

        assert!(store.general_interventions().is_empty());
        assert_eq!(store.case(case_id).unwrap().interventions.len(), 1);
    }

    #[test]
    fn upsert_rejects_unknown_case() {
        let mut store = CaseStore::new();
        let missing = Uuid::new_v4();
        let result = store.upsert_intervention(intervention(Some(missing), "visita"));
        assert_eq!(result, Err(StoreError::CaseNotFound(missing)));
    }

    #[test]
    fn remove_intervention_reports_not_found() {
        let mut store = CaseStore::new();
        let id = Uuid::new_v4();
        assert_eq!(
            store.remove_intervention(id),
            Err(StoreError::InterventionNotFound(id))
        );
    }
}
