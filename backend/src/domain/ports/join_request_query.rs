//! Driving port for join request read models.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, PendingJoinRequest, UserId};

/// Inputs for listing a group's pending join requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPendingJoinRequests {
    /// Group whose pending requests are wanted.
    pub group_id: Uuid,
    /// Authenticated user asking for the list.
    pub acting_user: UserId,
}

/// Driving port exposed to inbound adapters for join request reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JoinRequestQueries: Send + Sync {
    /// Pending requests for a group with requester profiles, oldest first.
    ///
    /// Restricted to group admins.
    async fn list_pending(
        &self,
        request: ListPendingJoinRequests,
    ) -> Result<Vec<PendingJoinRequest>, Error>;
}

/// Fixture implementation returning an empty listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJoinRequestQueries;

#[async_trait]
impl JoinRequestQueries for FixtureJoinRequestQueries {
    async fn list_pending(
        &self,
        _request: ListPendingJoinRequests,
    ) -> Result<Vec<PendingJoinRequest>, Error> {
        Ok(Vec::new())
    }
}
