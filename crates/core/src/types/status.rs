//! Status and role enums shared by the API and CLI.

use serde::{Deserialize, Serialize};

/// Review status of a startup application.
///
/// New registrations start as `Pending`. Only `Approved` startups can log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "incubator.startup_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum StartupStatus {
    /// Awaiting admin review.
    #[default]
    Pending,
    /// Accepted into the incubator.
    Approved,
    /// Application declined.
    Rejected,
}

impl StartupStatus {
    /// Whether a startup in this status may log in.
    #[must_use]
    pub const fn can_login(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// The snake_case name used on the wire and in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for StartupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StartupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid startup status: {s}")),
        }
    }
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "incubator.admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Everything an admin can do, plus managing other admin accounts.
    SuperAdmin,
    /// Manages startups, events, announcements and schedules.
    #[default]
    Admin,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

/// The kind of account a token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Admin,
    Startup,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_only_approved_startups_can_login() {
        assert!(StartupStatus::Approved.can_login());
        assert!(!StartupStatus::Pending.can_login());
        assert!(!StartupStatus::Rejected.can_login());
    }

    #[test]
    fn test_startup_status_defaults_to_pending() {
        assert_eq!(StartupStatus::default(), StartupStatus::Pending);
    }

    #[test]
    fn test_startup_status_parse_and_display() {
        for status in [
            StartupStatus::Pending,
            StartupStatus::Approved,
            StartupStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<StartupStatus>().unwrap(), status);
        }
        assert!("accepted".parse::<StartupStatus>().is_err());
    }

    #[test]
    fn test_startup_status_json_is_snake_case() {
        let json = serde_json::to_string(&StartupStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }

    #[test]
    fn test_admin_role_parse() {
        assert_eq!(
            "super_admin".parse::<AdminRole>().unwrap(),
            AdminRole::SuperAdmin
        );
        assert_eq!("admin".parse::<AdminRole>().unwrap(), AdminRole::Admin);
        assert!("viewer".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_account_kind_json() {
        let kind: AccountKind = serde_json::from_str("\"startup\"").unwrap();
        assert_eq!(kind, AccountKind::Startup);
    }
}
