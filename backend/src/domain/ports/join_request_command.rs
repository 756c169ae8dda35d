//! Driving port for join request mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, JoinRequest, JoinRequestStatus, ResolveAction, UserId};

/// Inputs for creating (or reopening) a join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJoinRequest {
    /// Group the caller wants to join.
    pub group_id: Uuid,
    /// Authenticated user making the request.
    pub user_id: UserId,
}

/// Inputs for resolving a pending join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveJoinRequest {
    /// Group the request belongs to.
    pub group_id: Uuid,
    /// Identifier of the request being resolved.
    pub request_id: Uuid,
    /// Authenticated user performing the resolution.
    pub acting_user: UserId,
    /// Whether to accept or decline.
    pub action: ResolveAction,
}

/// Driving port exposed to inbound adapters for join request mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JoinRequestCommands: Send + Sync {
    /// Create a pending join request, reopening a previously resolved one if
    /// present.
    async fn create(&self, request: CreateJoinRequest) -> Result<JoinRequest, Error>;

    /// Accept or decline a pending join request on behalf of a group admin.
    async fn resolve(&self, request: ResolveJoinRequest) -> Result<JoinRequest, Error>;
}

/// Fixture implementation returning canned successes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJoinRequestCommands;

#[async_trait]
impl JoinRequestCommands for FixtureJoinRequestCommands {
    async fn create(&self, request: CreateJoinRequest) -> Result<JoinRequest, Error> {
        let now = chrono::Utc::now();
        Ok(JoinRequest {
            id: Uuid::new_v4(),
            group_id: request.group_id,
            user_id: request.user_id,
            status: JoinRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn resolve(&self, request: ResolveJoinRequest) -> Result<JoinRequest, Error> {
        let now = chrono::Utc::now();
        Ok(JoinRequest {
            id: request.request_id,
            group_id: request.group_id,
            user_id: UserId::random(),
            status: request.action.resulting_status(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::accept(ResolveAction::Accept, JoinRequestStatus::Accepted)]
    #[case::decline(ResolveAction::Decline, JoinRequestStatus::Declined)]
    #[tokio::test]
    async fn fixture_resolve_applies_action(
        #[case] action: ResolveAction,
        #[case] expected: JoinRequestStatus,
    ) {
        let commands = FixtureJoinRequestCommands;
        let resolved = commands
            .resolve(ResolveJoinRequest {
                group_id: Uuid::new_v4(),
                request_id: Uuid::new_v4(),
                acting_user: UserId::random(),
                action,
            })
            .await
            .expect("fixture resolve succeeds");
        assert_eq!(resolved.status, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_create_returns_pending_request() {
        let commands = FixtureJoinRequestCommands;
        let user_id = UserId::random();
        let created = commands
            .create(CreateJoinRequest {
                group_id: Uuid::new_v4(),
                user_id: user_id.clone(),
            })
            .await
            .expect("fixture create succeeds");
        assert!(created.is_pending());
        assert_eq!(created.user_id, user_id);
    }
}
