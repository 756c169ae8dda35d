//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{group_members, groups, join_requests, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the groups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: Uuid,
    pub name: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the group_members table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = group_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupMemberRow {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating memberships when a request is accepted.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = group_members)]
pub(crate) struct NewGroupMemberRow<'a> {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: &'a str,
}

/// Row struct for reading from the join_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = join_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JoinRequestRow {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new join request records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = join_requests)]
pub(crate) struct NewJoinRequestRow<'a> {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub status: &'a str,
}
