//! Caller identity types.
//!
//! Credentials are issued and verified by an external session service. The
//! ledger only ever sees the resulting `(user, role)` pair as an [`Actor`].

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access, including privileged voucher update and delete.
    Admin,
    /// Day-to-day posting and corrections.
    Bookkeeper,
    /// Read-mostly access to reports.
    Manager,
}

impl Role {
    /// Returns the role name as stored by the session service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Bookkeeper => "Bookkeeper",
            Self::Manager => "Manager",
        }
    }

    /// Returns true if the role may perform privileged voucher operations.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Bookkeeper" => Ok(Self::Bookkeeper),
            "Manager" => Ok(Self::Manager),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// Authenticated caller, as supplied by the session service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The caller's user ID.
    pub user_id: UserId,
    /// The caller's role.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns true if the actor holds a privileged role.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}
