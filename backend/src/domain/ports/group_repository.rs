//! Port for reads over groups, memberships, and member profiles.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, Membership, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by group repository adapters.
    pub enum GroupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "group repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "group repository query failed: {message}",
    }
}

/// Port for the group-directory reads the join-request lifecycle needs:
/// group existence, membership checks, and admin contact profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Find a group by id.
    async fn find_group(&self, group_id: &Uuid) -> Result<Option<Group>, GroupRepositoryError>;

    /// Find the membership a user holds in a group, if any.
    async fn find_membership(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Membership>, GroupRepositoryError>;

    /// Profiles of every admin member of the group.
    async fn list_admin_profiles(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<UserProfile>, GroupRepositoryError>;

    /// Profile of a single user, if known.
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, GroupRepositoryError>;
}

/// Fixture implementation for tests that do not exercise group reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGroupRepository;

#[async_trait]
impl GroupRepository for FixtureGroupRepository {
    async fn find_group(&self, _group_id: &Uuid) -> Result<Option<Group>, GroupRepositoryError> {
        Ok(None)
    }

    async fn find_membership(
        &self,
        _group_id: &Uuid,
        _user_id: &UserId,
    ) -> Result<Option<Membership>, GroupRepositoryError> {
        Ok(None)
    }

    async fn list_admin_profiles(
        &self,
        _group_id: &Uuid,
    ) -> Result<Vec<UserProfile>, GroupRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_profile(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserProfile>, GroupRepositoryError> {
        Ok(None)
    }
}
