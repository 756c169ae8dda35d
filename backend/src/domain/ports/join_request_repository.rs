//! Port for join request persistence.
//!
//! The store enforces the one-row-per-(group, user) invariant through its
//! unique constraint; adapters surface a racing pending row as
//! [`JoinRequestRepositoryError::DuplicatePending`] rather than letting two
//! pending records coexist.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{JoinRequest, PendingJoinRequest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by join request repository adapters.
    pub enum JoinRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "join request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "join request repository query failed: {message}",
        /// A concurrent writer already holds a pending row for the pair.
        DuplicatePending =>
            "a pending join request already exists for this user and group",
    }
}

/// Port for writing and reading join requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JoinRequestRepository: Send + Sync {
    /// Find the request record for a (group, user) pair, whatever its status.
    async fn find_by_group_and_user(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError>;

    /// Insert a pending request, or reopen a resolved one, keyed on the
    /// (group, user) unique constraint.
    ///
    /// Fails with [`JoinRequestRepositoryError::DuplicatePending`] when the
    /// existing row is already pending.
    async fn upsert_pending(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<JoinRequest, JoinRequestRepositoryError>;

    /// Pending requests for a group, joined with requester profiles, oldest
    /// first.
    async fn list_pending_with_profiles(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<PendingJoinRequest>, JoinRequestRepositoryError>;

    /// Accept a pending request and create the member-role membership in one
    /// transaction. Returns `None` when no pending request matches.
    async fn accept(
        &self,
        group_id: &Uuid,
        request_id: &Uuid,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError>;

    /// Decline a pending request. Returns `None` when no pending request
    /// matches.
    async fn decline(
        &self,
        group_id: &Uuid,
        request_id: &Uuid,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJoinRequestRepository;

#[async_trait]
impl JoinRequestRepository for FixtureJoinRequestRepository {
    async fn find_by_group_and_user(
        &self,
        _group_id: &Uuid,
        _user_id: &UserId,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        Ok(None)
    }

    async fn upsert_pending(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<JoinRequest, JoinRequestRepositoryError> {
        let now = chrono::Utc::now();
        Ok(JoinRequest {
            id: Uuid::new_v4(),
            group_id: *group_id,
            user_id: user_id.clone(),
            status: crate::domain::JoinRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_pending_with_profiles(
        &self,
        _group_id: &Uuid,
    ) -> Result<Vec<PendingJoinRequest>, JoinRequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn accept(
        &self,
        _group_id: &Uuid,
        _request_id: &Uuid,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        Ok(None)
    }

    async fn decline(
        &self,
        _group_id: &Uuid,
        _request_id: &Uuid,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        Ok(None)
    }
}
