//! Professional directory records.
//!
//! # Responsibility
//! - Mirror the read-only directory contract consumed by the core.
//! - Classify the roles required for a complete case team.
//!
//! # Invariants
//! - The role set is closed; unknown roles never deserialize.
//! - `ceas` is optional; grouping logic treats the absence explicitly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a directory professional.
pub type ProfessionalId = Uuid;

/// Closed role set for directory professionals.
///
/// `SocialWorker` and `EdisTechnician` are the two roles a complete case
/// team requires; the remaining roles participate in assignment lists but
/// never clear a team-gap flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionalRole {
    SocialWorker,
    EdisTechnician,
    Psychologist,
    Coordinator,
    Administrative,
}

/// Read-only directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professional {
    pub id: ProfessionalId,
    pub name: String,
    pub role: ProfessionalRole,
    /// Organizational unit of a social worker, used for case-load grouping.
    pub ceas: Option<String>,
}

impl Professional {
    /// Creates a directory entry with a generated stable ID.
    pub fn new(name: impl Into<String>, role: ProfessionalRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role,
            ceas: None,
        }
    }

    /// Creates a directory entry carrying a CEAS unit.
    pub fn with_ceas(name: impl Into<String>, role: ProfessionalRole, ceas: impl Into<String>) -> Self {
        Self {
            ceas: Some(ceas.into()),
            ..Self::new(name, role)
        }
    }
}
