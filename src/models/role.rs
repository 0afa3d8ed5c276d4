use serde::Serialize;

/// Organisation role, ordered from the lowest tier to the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Executive,
    Supervisor,
    CityManager,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Executive,
        Role::Supervisor,
        Role::CityManager,
        Role::Admin,
        Role::SuperAdmin,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Executive => "executive",
            Role::Supervisor => "supervisor",
            Role::CityManager => "city_manager",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|r| r.to_db_str() == s)
    }

    pub fn at_least(&self, tier: Role) -> bool {
        *self >= tier
    }

    /// Supervisors and everyone above them.
    pub fn is_management(&self) -> bool {
        self.at_least(Role::Supervisor)
    }

    /// City managers, admins and super admins.
    pub fn is_administrative(&self) -> bool {
        self.at_least(Role::CityManager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_str())
    }
}
