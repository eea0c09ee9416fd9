//! Caller identity as supplied by the surrounding identity provider
//!
//! The queue does not authenticate anyone. It only checks that staff-only
//! operations come from a caller whose role is staff or above.

use crate::error::{QueueError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role attached to a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Public,
    Staff,
    Supervisor,
    Owner,
    Superuser,
}

impl Role {
    /// Staff, supervisor, owner and superuser may operate the queue
    pub const fn is_staff(self) -> bool {
        !matches!(self, Self::Public)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Public => "public",
            Self::Staff => "staff",
            Self::Supervisor => "supervisor",
            Self::Owner => "owner",
            Self::Superuser => "superuser",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Role {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "public" | "" => Ok(Self::Public),
            "staff" => Ok(Self::Staff),
            "supervisor" => Ok(Self::Supervisor),
            "owner" => Ok(Self::Owner),
            "superuser" => Ok(Self::Superuser),
            other => Err(QueueError::validation(format!(
                "Invalid role: {other}. Must be one of: public, staff, supervisor, owner, superuser"
            ))),
        }
    }
}

/// Who is making a request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Caller {
    pub name: Option<String>,
    pub role: Role,
}

impl Caller {
    /// An anonymous member of the public
    pub const fn public() -> Self {
        Self {
            name: None,
            role: Role::Public,
        }
    }

    /// A named staff member
    pub fn staff(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            role: Role::Staff,
        }
    }

    pub fn with_role(name: Option<String>, role: Role) -> Self {
        Self { name, role }
    }

    /// Label for logs
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    /// Fail unless the caller is staff or above
    pub fn require_staff(&self, operation: &str) -> Result<()> {
        if self.role.is_staff() {
            Ok(())
        } else {
            tracing::warn!(operation, caller = self.label(), "Rejected staff-only operation");
            Err(QueueError::PermissionDenied {
                operation: operation.to_string(),
                role: self.role.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles() {
        assert!(!Role::Public.is_staff());
        for role in [Role::Staff, Role::Supervisor, Role::Owner, Role::Superuser] {
            assert!(role.is_staff());
        }
    }

    #[test]
    fn test_require_staff() {
        assert!(Caller::staff("desk-1").require_staff("clear").is_ok());

        let err = Caller::public().require_staff("clear").unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("Owner".parse::<Role>().unwrap(), Role::Owner);
        assert!("admin".parse::<Role>().is_err());
    }
}
