//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `cuaderno_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use chrono::{TimeZone, Utc};
use cuaderno_core::{
    status_breakdown, Case, CaseStatus, CaseStore, Intervention, InterventionKind,
};
use uuid::Uuid;

fn main() {
    println!("cuaderno_core version={}", cuaderno_core::core_version());

    let mut store = CaseStore::new();
    let mut case = Case::new("Familia de ejemplo");
    case.set_status(CaseStatus::Accompaniment);
    let case_id = case.id;
    store.add_case(case).expect("seeded case id is unique");

    let start = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
    let visit = Intervention::new(
        Some(case_id),
        "visita de ejemplo",
        InterventionKind::HomeVisit,
        start,
        start + chrono::Duration::hours(1),
        Uuid::new_v4(),
    );
    store
        .upsert_intervention(visit)
        .expect("seeded case is present");

    for slice in status_breakdown(&store) {
        println!(
            "status={} count={} percent={:.0}",
            slice.status.label(),
            slice.count,
            slice.percent
        );
    }
}
