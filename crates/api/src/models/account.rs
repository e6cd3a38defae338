//! Authenticated-account types.
//!
//! Built from verified token claims by the extractors in
//! [`crate::middleware::auth`].

use serde::{Deserialize, Serialize};

use incubator_core::{AdminId, AdminRole, StartupId};

/// An authenticated admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminId,
    /// Role at the time the token was issued.
    pub role: AdminRole,
}

impl CurrentAdmin {
    /// Whether this admin may manage other admin accounts.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }
}

/// An authenticated (approved) startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStartup {
    /// Startup's database ID.
    pub id: StartupId,
}

/// Either kind of authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentAccount {
    Admin(CurrentAdmin),
    Startup(CurrentStartup),
}
