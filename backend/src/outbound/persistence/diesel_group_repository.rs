//! PostgreSQL-backed `GroupRepository` implementation using Diesel ORM.
//!
//! Loads groups, memberships, and user profiles through validated domain
//! constructors.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{GroupRepository, GroupRepositoryError};
use crate::domain::{
    DisplayName, EmailAddress, Group, GroupName, Membership, MembershipRole, UserId, UserProfile,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{GroupMemberRow, GroupRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{group_members, groups, users};

/// Diesel-backed implementation of the group repository port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupRepositoryError {
    map_basic_pool_error(error, GroupRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GroupRepositoryError {
    map_basic_diesel_error(
        error,
        GroupRepositoryError::query,
        GroupRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain group.
fn row_to_group(row: GroupRow) -> Result<Group, GroupRepositoryError> {
    let name = GroupName::new(row.name)
        .map_err(|err| GroupRepositoryError::query(format!("invalid group name: {err}")))?;
    Ok(Group { id: row.id, name })
}

/// Convert a database row into a validated domain membership.
fn row_to_membership(row: GroupMemberRow) -> Result<Membership, GroupRepositoryError> {
    let role = row
        .role
        .parse::<MembershipRole>()
        .map_err(|err| GroupRepositoryError::query(format!("invalid membership role: {err}")))?;
    Ok(Membership {
        group_id: row.group_id,
        user_id: UserId::from_uuid(row.user_id),
        role,
    })
}

/// Convert a database row into a validated domain user profile.
pub(crate) fn row_to_profile(row: UserRow) -> Result<UserProfile, GroupRepositoryError> {
    let display_name = DisplayName::new(row.display_name)
        .map_err(|err| GroupRepositoryError::query(format!("invalid display name: {err}")))?;
    let email = row
        .email
        .map(EmailAddress::new)
        .transpose()
        .map_err(|err| GroupRepositoryError::query(format!("invalid email address: {err}")))?;
    Ok(UserProfile {
        id: UserId::from_uuid(row.id),
        display_name,
        email,
        avatar_url: row.avatar_url,
    })
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn find_group(&self, group_id: &Uuid) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = groups::table
            .find(group_id)
            .select(GroupRow::as_select())
            .first::<GroupRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_group).transpose()
    }

    async fn find_membership(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Membership>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = group_members::table
            .filter(
                group_members::group_id
                    .eq(group_id)
                    .and(group_members::user_id.eq(user_id.as_uuid())),
            )
            .select(GroupMemberRow::as_select())
            .first::<GroupMemberRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_membership).transpose()
    }

    async fn list_admin_profiles(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<UserProfile>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = group_members::table
            .inner_join(users::table)
            .filter(
                group_members::group_id
                    .eq(group_id)
                    .and(group_members::role.eq(MembershipRole::Admin.as_str())),
            )
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_profile).collect()
    }

    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(user_id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }
}
