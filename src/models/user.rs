use super::role::Role;
use serde::Serialize;

/// Organisation-scoped profile of an authenticated caller.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub org_id: i64,
    pub name: String,
    pub mobile: String,
    pub employee_id: Option<String>,
    pub role: Role,
    pub zone_id: Option<i64>,
    pub supervisor_id: Option<i64>,
    #[serde(skip_serializing)]
    pub fcm_token: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Organisation {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Fields needed to provision a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub org_id: i64,
    pub name: String,
    pub mobile: String,
    pub employee_id: Option<String>,
    pub role: Role,
    pub zone_id: Option<i64>,
    pub supervisor_id: Option<i64>,
    pub is_active: bool,
}

/// Row of the user administration listing.
#[derive(Debug, Clone, Serialize)]
pub struct UserListing {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub zone_name: Option<String>,
}

/// Editable profile fields. `None` leaves a field alone; for the nullable
/// links, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub employee_id: Option<Option<String>>,
    pub zone_id: Option<Option<i64>>,
    pub supervisor_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.employee_id.is_none()
            && self.zone_id.is_none()
            && self.supervisor_id.is_none()
            && self.is_active.is_none()
    }

    /// The profile with this update applied.
    pub fn apply(&self, mut user: UserProfile) -> UserProfile {
        if let Some(name) = &self.name {
            user.name = name.trim().to_string();
        }
        if let Some(employee_id) = &self.employee_id {
            user.employee_id = employee_id.clone();
        }
        if let Some(zone_id) = self.zone_id {
            user.zone_id = zone_id;
        }
        if let Some(supervisor_id) = self.supervisor_id {
            user.supervisor_id = supervisor_id;
        }
        if let Some(active) = self.is_active {
            user.is_active = active;
        }
        user
    }
}
