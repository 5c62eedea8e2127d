//! Per-browser session slots

use crate::domain::{ProfileId, Role};
use serde::{Deserialize, Serialize};

/// One optional profile id per role
///
/// Only [`SessionManager`](super::SessionManager) mutates a stored state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub admin_id: Option<ProfileId>,
    pub patient_id: Option<ProfileId>,
    pub pharmacist_id: Option<ProfileId>,
    pub doctor_id: Option<ProfileId>,
}

impl SessionState {
    /// The slot for `role`
    pub fn get(&self, role: Role) -> Option<ProfileId> {
        match role {
            Role::Admin => self.admin_id,
            Role::Patient => self.patient_id,
            Role::Pharmacist => self.pharmacist_id,
            Role::Doctor => self.doctor_id,
        }
    }

    pub(crate) fn set(&mut self, role: Role, id: ProfileId) {
        let slot = match role {
            Role::Admin => &mut self.admin_id,
            Role::Patient => &mut self.patient_id,
            Role::Pharmacist => &mut self.pharmacist_id,
            Role::Doctor => &mut self.doctor_id,
        };
        *slot = Some(id);
    }

    pub fn is_empty(&self) -> bool {
        Role::RESOLUTION_ORDER
            .iter()
            .all(|role| self.get(*role).is_none())
    }
}
