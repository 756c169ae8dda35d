//! Join request entity and its lifecycle states.
//!
//! A join request is identified by its (group, user) pair: re-requesting
//! after a decline reopens the existing record rather than creating a new
//! one, so at most one row exists per pair.
//!
//! ```text
//! (none) --create--> Pending --accept--> Accepted (terminal, + membership)
//!                    Pending --decline-> Declined (terminal for this cycle)
//! Declined --create--> Pending   (reopen; same record identity)
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{UserId, UserProfile};

/// Status of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestStatus {
    /// Awaiting resolution by a group admin.
    Pending,
    /// Approved; a membership was created alongside.
    Accepted,
    /// Rejected; a later create call reopens the record.
    Declined,
}

impl JoinRequestStatus {
    /// Stable string form stored in the database and returned over HTTP.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JoinRequestStatus {
    type Err = JoinRequestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(JoinRequestParseError::InvalidStatus),
        }
    }
}

/// Action an admin applies to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveAction {
    /// Approve the request and create a membership.
    Accept,
    /// Reject the request.
    Decline,
}

impl ResolveAction {
    /// The terminal status this action produces.
    #[must_use]
    pub fn resulting_status(self) -> JoinRequestStatus {
        match self {
            Self::Accept => JoinRequestStatus::Accepted,
            Self::Decline => JoinRequestStatus::Declined,
        }
    }
}

impl std::str::FromStr for ResolveAction {
    type Err = JoinRequestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "decline" => Ok(Self::Decline),
            _ => Err(JoinRequestParseError::InvalidAction),
        }
    }
}

/// Parse errors for join request enumerations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinRequestParseError {
    /// Not one of `pending`, `accepted`, `declined`.
    InvalidStatus,
    /// Not one of `accept`, `decline`.
    InvalidAction,
}

impl fmt::Display for JoinRequestParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStatus => {
                write!(f, "status must be pending, accepted, or declined")
            }
            Self::InvalidAction => write!(f, "action must be accept or decline"),
        }
    }
}

impl std::error::Error for JoinRequestParseError {}

/// A user's request to join a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// Stable request identifier; stable across reopen cycles.
    pub id: Uuid,
    /// Group the request targets.
    pub group_id: Uuid,
    /// Requesting user.
    pub user_id: UserId,
    /// Current lifecycle state.
    pub status: JoinRequestStatus,
    /// When the record was first created.
    pub created_at: DateTime<Utc>,
    /// When the record last changed state.
    pub updated_at: DateTime<Utc>,
}

impl JoinRequest {
    /// Whether the request awaits resolution.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == JoinRequestStatus::Pending
    }
}

/// A pending request joined with the requester's profile, as listed to
/// group admins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJoinRequest {
    /// Request identifier.
    pub id: Uuid,
    /// Profile of the requesting user.
    pub user: UserProfile,
}
