//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! Regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable display name.
        display_name -> Varchar,
        /// Optional contact address used for notifications.
        email -> Nullable<Varchar>,
        /// Optional avatar image reference.
        avatar_url -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reading groups.
    groups (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Group name shown to members.
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Group membership with role, one row per (group, user) pair.
    group_members (group_id, user_id) {
        /// Group the membership belongs to.
        group_id -> Uuid,
        /// Member's user id.
        user_id -> Uuid,
        /// Either `member` or `admin`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Join request state machine, one row per (group, user) pair enforced
    /// by a unique constraint.
    join_requests (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Group the request targets.
        group_id -> Uuid,
        /// Requesting user's id.
        user_id -> Uuid,
        /// One of `pending`, `accepted`, or `declined`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last state transition timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(group_members -> groups (group_id));
diesel::joinable!(group_members -> users (user_id));
diesel::joinable!(join_requests -> groups (group_id));
diesel::joinable!(join_requests -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, group_members, join_requests);
