//! Authenticated actor

use crate::credential::{Credential, CredentialHash};
use crate::ids::{ActorId, PlantId};
use crate::role::{Department, Role};

/// A provisioned user account as seen by the workflow core
///
/// Read-only to the core; the session holds at most one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Account id
    pub id: ActorId,
    /// Display name
    pub name: String,
    /// Contact address
    pub email: String,
    /// Job role
    pub role: Role,
    /// Department, normally `role.department()`
    pub department: Department,
    /// Home plant; `None` for corporate accounts that span every plant
    pub plant_id: Option<PlantId>,
    /// Salted digest of the account secret
    pub credential: CredentialHash,
}

impl Actor {
    /// Create an actor whose department follows its role
    #[must_use]
    pub fn new(
        id: impl Into<ActorId>,
        name: impl Into<String>,
        role: Role,
        credential: &Credential,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            role,
            department: role.department(),
            plant_id: None,
            credential: CredentialHash::derive(credential),
        }
    }

    /// Attach a home plant
    #[inline]
    #[must_use]
    pub fn with_plant(mut self, plant: impl Into<PlantId>) -> Self {
        self.plant_id = Some(plant.into());
        self
    }

    /// Attach a contact address
    #[inline]
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Override the department
    #[inline]
    #[must_use]
    pub fn with_department(mut self, department: Department) -> Self {
        self.department = department;
        self
    }

    /// Check a secret against the stored digest
    #[inline]
    #[must_use]
    pub fn verify_credential(&self, attempt: &Credential) -> bool {
        self.credential.verify(attempt)
    }

    /// True when the actor may see records of `plant`
    #[must_use]
    pub fn can_access_plant(&self, plant: &PlantId) -> bool {
        self.plant_id.as_ref().map_or(true, |own| own == plant)
    }
}
