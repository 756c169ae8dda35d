//! Reading groups and their memberships.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised by the group primitives in this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    /// The group name is empty once trimmed.
    EmptyName,
    /// The role string is not a known membership role.
    InvalidRole,
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "group name must not be empty"),
            Self::InvalidRole => write!(f, "membership role must be member or admin"),
        }
    }
}

impl std::error::Error for GroupValidationError {}

/// Human readable group name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupName(String);

impl GroupName {
    /// Validate and construct a [`GroupName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, GroupValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<GroupName> for String {
    fn from(value: GroupName) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupName {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A reading group users can request to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Stable group identifier.
    pub id: Uuid,
    /// Display name of the group.
    pub name: GroupName,
}

/// Role a membership carries within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    /// Regular participant.
    Member,
    /// May resolve join requests for the group.
    Admin,
}

impl MembershipRole {
    /// Stable string form stored in the database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MembershipRole {
    type Err = GroupValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            _ => Err(GroupValidationError::InvalidRole),
        }
    }
}

/// Confirmed association between a user and a group.
///
/// ## Invariants
/// - At most one membership exists per (group, user) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Group the membership belongs to.
    pub group_id: Uuid,
    /// Member's user identifier.
    pub user_id: UserId,
    /// Role the membership carries.
    pub role: MembershipRole,
}

impl Membership {
    /// Whether this membership may resolve join requests for its group.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == MembershipRole::Admin
    }
}
