//! Join request HTTP handlers.
//!
//! ```text
//! POST /api/v1/groups/{groupId}/join-requests
//! GET  /api/v1/groups/{groupId}/join-requests
//! PUT  /api/v1/groups/{groupId}/join-requests/{requestId}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateJoinRequest, ListPendingJoinRequests, ResolveJoinRequest};
use crate::domain::{JoinRequest, PendingJoinRequest, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_resolve_action, parse_uuid};

/// Request payload for resolving a join request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveJoinRequestBody {
    /// Either `accept` or `decline`.
    #[schema(example = "accept")]
    pub action: String,
}

/// Join request representation returned by create and resolve.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequestBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub group_id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    /// One of `pending`, `accepted`, or `declined`.
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<JoinRequest> for JoinRequestBody {
    fn from(value: JoinRequest) -> Self {
        Self {
            id: value.id.to_string(),
            group_id: value.group_id.to_string(),
            user_id: value.user_id.to_string(),
            status: value.status.to_string(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Requester profile embedded in pending listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<UserProfile> for UserProfileBody {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.id.to_string(),
            display_name: value.display_name.to_string(),
            email: value.email.map(|email| email.to_string()),
            avatar_url: value.avatar_url,
        }
    }
}

/// Pending join request with its requester profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingJoinRequestBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub user: UserProfileBody,
}

impl From<PendingJoinRequest> for PendingJoinRequestBody {
    fn from(value: PendingJoinRequest) -> Self {
        Self {
            id: value.id.to_string(),
            user: UserProfileBody::from(value.user),
        }
    }
}

/// Ask to join a group as the authenticated user.
///
/// Succeeds with the pending request, reopening a previously declined or
/// accepted-then-removed request when one exists. Conflicts when the caller
/// is already a member or already has a pending request.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{groupId}/join-requests",
    params(
        ("groupId" = uuid::Uuid, Path, description = "Group to join")
    ),
    responses(
        (status = 201, description = "Join request created", body = JoinRequestBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Group not found", body = ErrorSchema),
        (status = 409, description = "Already a member or already pending", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["join-requests"],
    operation_id = "createJoinRequest",
    security(("SessionCookie" = []))
)]
#[post("/groups/{group_id}/join-requests")]
pub async fn create_join_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let group_id = parse_uuid(&path.into_inner(), FieldName::new("groupId"))?;

    let created = state
        .join_requests
        .create(CreateJoinRequest { group_id, user_id })
        .await?;

    Ok(HttpResponse::Created().json(JoinRequestBody::from(created)))
}

/// List a group's pending join requests with requester profiles.
///
/// Restricted to group admins; ordered oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{groupId}/join-requests",
    params(
        ("groupId" = uuid::Uuid, Path, description = "Group to inspect")
    ),
    responses(
        (status = 200, description = "Pending join requests", body = [PendingJoinRequestBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a group admin", body = ErrorSchema),
        (status = 404, description = "Group not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["join-requests"],
    operation_id = "listPendingJoinRequests",
    security(("SessionCookie" = []))
)]
#[get("/groups/{group_id}/join-requests")]
pub async fn list_pending_join_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PendingJoinRequestBody>>> {
    let acting_user = session.require_user_id()?;
    let group_id = parse_uuid(&path.into_inner(), FieldName::new("groupId"))?;

    let pending = state
        .join_requests_query
        .list_pending(ListPendingJoinRequests {
            group_id,
            acting_user,
        })
        .await?;

    Ok(web::Json(
        pending.into_iter().map(PendingJoinRequestBody::from).collect(),
    ))
}

/// Accept or decline a pending join request.
///
/// Restricted to group admins. Accepting also creates the membership; both
/// writes happen in one transaction.
#[utoipa::path(
    put,
    path = "/api/v1/groups/{groupId}/join-requests/{requestId}",
    params(
        ("groupId" = uuid::Uuid, Path, description = "Group the request belongs to"),
        ("requestId" = uuid::Uuid, Path, description = "Join request to resolve")
    ),
    request_body = ResolveJoinRequestBody,
    responses(
        (status = 200, description = "Join request resolved", body = JoinRequestBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a group admin", body = ErrorSchema),
        (status = 404, description = "No pending join request matches", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["join-requests"],
    operation_id = "resolveJoinRequest",
    security(("SessionCookie" = []))
)]
#[put("/groups/{group_id}/join-requests/{request_id}")]
pub async fn resolve_join_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<ResolveJoinRequestBody>,
) -> ApiResult<web::Json<JoinRequestBody>> {
    let acting_user = session.require_user_id()?;
    let (raw_group_id, raw_request_id) = path.into_inner();
    let group_id = parse_uuid(&raw_group_id, FieldName::new("groupId"))?;
    let request_id = parse_uuid(&raw_request_id, FieldName::new("requestId"))?;
    let action = parse_resolve_action(&payload.action, FieldName::new("action"))?;

    let resolved = state
        .join_requests
        .resolve(ResolveJoinRequest {
            group_id,
            request_id,
            acting_user,
            action,
        })
        .await?;

    Ok(web::Json(JoinRequestBody::from(resolved)))
}

#[cfg(test)]
#[path = "join_requests_tests.rs"]
mod tests;
