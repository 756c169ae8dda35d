//! PostgreSQL-backed `JoinRequestRepository` implementation using Diesel ORM.
//!
//! The unique constraint on `(group_id, user_id)` is the sole serialisation
//! point for concurrent creates: the upsert only touches rows that are not
//! already pending, so a racing writer observes no returned row and surfaces
//! `DuplicatePending`. Accepting a request updates the row and inserts the
//! membership inside one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{JoinRequestRepository, JoinRequestRepositoryError};
use crate::domain::{
    JoinRequest, JoinRequestStatus, MembershipRole, PendingJoinRequest, UserId,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_group_repository::row_to_profile;
use super::models::{JoinRequestRow, NewGroupMemberRow, NewJoinRequestRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{group_members, join_requests, users};

/// Diesel-backed implementation of the join request repository port.
#[derive(Clone)]
pub struct DieselJoinRequestRepository {
    pool: DbPool,
}

impl DieselJoinRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> JoinRequestRepositoryError {
    map_basic_pool_error(error, JoinRequestRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> JoinRequestRepositoryError {
    map_basic_diesel_error(
        error,
        JoinRequestRepositoryError::query,
        JoinRequestRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain join request.
fn row_to_join_request(row: JoinRequestRow) -> Result<JoinRequest, JoinRequestRepositoryError> {
    let status = row
        .status
        .parse::<JoinRequestStatus>()
        .map_err(|err| JoinRequestRepositoryError::query(format!("invalid status: {err}")))?;
    Ok(JoinRequest {
        id: row.id,
        group_id: row.group_id,
        user_id: UserId::from_uuid(row.user_id),
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Resolve a pending request to the given status, returning the updated row.
async fn resolve_pending(
    conn: &mut diesel_async::AsyncPgConnection,
    group_id: &Uuid,
    request_id: &Uuid,
    status: JoinRequestStatus,
) -> Result<Option<JoinRequestRow>, diesel::result::Error> {
    diesel::update(
        join_requests::table.filter(
            join_requests::id
                .eq(request_id)
                .and(join_requests::group_id.eq(group_id))
                .and(join_requests::status.eq(JoinRequestStatus::Pending.as_str())),
        ),
    )
    .set((
        join_requests::status.eq(status.as_str()),
        join_requests::updated_at.eq(diesel::dsl::now),
    ))
    .returning(JoinRequestRow::as_returning())
    .get_result::<JoinRequestRow>(conn)
    .await
    .optional()
}

#[async_trait]
impl JoinRequestRepository for DieselJoinRequestRepository {
    async fn find_by_group_and_user(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = join_requests::table
            .filter(
                join_requests::group_id
                    .eq(group_id)
                    .and(join_requests::user_id.eq(user_id.as_uuid())),
            )
            .select(JoinRequestRow::as_select())
            .first::<JoinRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_join_request).transpose()
    }

    async fn upsert_pending(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<JoinRequest, JoinRequestRepositoryError> {
        use diesel::query_dsl::methods::FilterDsl;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewJoinRequestRow {
            id: Uuid::new_v4(),
            group_id: *group_id,
            user_id: *user_id.as_uuid(),
            status: JoinRequestStatus::Pending.as_str(),
        };

        // The DO UPDATE branch is filtered to non-pending rows, so a
        // concurrent pending request yields no returned row.
        let row = diesel::insert_into(join_requests::table)
            .values(&new_row)
            .on_conflict((join_requests::group_id, join_requests::user_id))
            .do_update()
            .set((
                join_requests::status.eq(JoinRequestStatus::Pending.as_str()),
                join_requests::updated_at.eq(diesel::dsl::now),
            ))
            .filter(join_requests::status.ne(JoinRequestStatus::Pending.as_str()))
            .returning(JoinRequestRow::as_returning())
            .get_result::<JoinRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let row = row.ok_or_else(JoinRequestRepositoryError::duplicate_pending)?;
        row_to_join_request(row)
    }

    async fn list_pending_with_profiles(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<PendingJoinRequest>, JoinRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(JoinRequestRow, UserRow)> = join_requests::table
            .inner_join(users::table)
            .filter(
                join_requests::group_id
                    .eq(group_id)
                    .and(join_requests::status.eq(JoinRequestStatus::Pending.as_str())),
            )
            .order(join_requests::created_at.asc())
            .select((JoinRequestRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(request, user)| {
                let user = row_to_profile(user).map_err(|err| {
                    JoinRequestRepositoryError::query(err.to_string())
                })?;
                Ok(PendingJoinRequest {
                    id: request.id,
                    user,
                })
            })
            .collect()
    }

    async fn accept(
        &self,
        group_id: &Uuid,
        request_id: &Uuid,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let group_id = *group_id;
        let request_id = *request_id;

        let row = conn
            .transaction::<Option<JoinRequestRow>, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(row) = resolve_pending(
                        conn,
                        &group_id,
                        &request_id,
                        JoinRequestStatus::Accepted,
                    )
                    .await?
                    else {
                        return Ok(None);
                    };

                    diesel::insert_into(group_members::table)
                        .values(&NewGroupMemberRow {
                            group_id: row.group_id,
                            user_id: row.user_id,
                            role: MembershipRole::Member.as_str(),
                        })
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;

                    Ok(Some(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_join_request).transpose()
    }

    async fn decline(
        &self,
        group_id: &Uuid,
        request_id: &Uuid,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = resolve_pending(&mut conn, group_id, request_id, JoinRequestStatus::Declined)
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_join_request).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn request_row(status: &str) -> JoinRequestRow {
        JoinRequestRow {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: status.to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("pending", JoinRequestStatus::Pending)]
    #[case("accepted", JoinRequestStatus::Accepted)]
    #[case("declined", JoinRequestStatus::Declined)]
    fn request_conversion_parses_statuses(
        #[case] raw: &str,
        #[case] expected: JoinRequestStatus,
    ) {
        let request = row_to_join_request(request_row(raw)).expect("valid row");
        assert_eq!(request.status, expected);
    }

    #[rstest]
    fn request_conversion_rejects_unknown_status() {
        let err = row_to_join_request(request_row("cancelled"))
            .expect_err("unknown status rejected");
        assert!(matches!(err, JoinRequestRepositoryError::Query { .. }));
    }
}
