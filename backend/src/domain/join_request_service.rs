//! Application services for the join request lifecycle.
//!
//! [`JoinRequestCommandService`] drives the state machine (create, accept,
//! decline) and fans out best-effort admin notifications;
//! [`JoinRequestQueryService`] serves the admin-only pending listing. Both
//! are generic over their driven ports so tests can substitute fixtures or
//! mocks.

use async_trait::async_trait;
use futures_util::future::join_all;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    CreateJoinRequest, GroupRepository, GroupRepositoryError, JoinRequestCommands,
    JoinRequestNotification, JoinRequestQueries, JoinRequestRepository,
    JoinRequestRepositoryError, ListPendingJoinRequests, NotificationSender,
    ResolveJoinRequest,
};
use crate::domain::{
    Error, Group, JoinRequest, PendingJoinRequest, ResolveAction, UserId,
};

fn map_group_error(err: GroupRepositoryError) -> Error {
    match err {
        GroupRepositoryError::Connection { message } => {
            tracing::error!(error = %message, "group repository unavailable");
            Error::service_unavailable("the service is temporarily unavailable")
        }
        GroupRepositoryError::Query { message } => {
            tracing::error!(error = %message, "group repository query failed");
            Error::internal("an unexpected error occurred")
        }
    }
}

fn map_join_request_error(err: JoinRequestRepositoryError) -> Error {
    match err {
        JoinRequestRepositoryError::Connection { message } => {
            tracing::error!(error = %message, "join request repository unavailable");
            Error::service_unavailable("the service is temporarily unavailable")
        }
        JoinRequestRepositoryError::Query { message } => {
            tracing::error!(error = %message, "join request repository query failed");
            Error::internal("an unexpected error occurred")
        }
        JoinRequestRepositoryError::DuplicatePending => already_pending(),
    }
}

fn group_not_found() -> Error {
    Error::not_found("group not found")
}

fn already_pending() -> Error {
    Error::conflict("a join request for this group is already pending")
        .with_details(json!({ "reason": "already_pending" }))
}

fn already_member() -> Error {
    Error::conflict("user is already a member of this group")
        .with_details(json!({ "reason": "already_member" }))
}

async fn require_admin<G: GroupRepository>(
    groups: &G,
    group_id: &Uuid,
    user_id: &UserId,
) -> Result<(), Error> {
    let membership = groups
        .find_membership(group_id, user_id)
        .await
        .map_err(map_group_error)?;
    match membership {
        Some(membership) if membership.is_admin() => Ok(()),
        _ => Err(Error::forbidden(
            "only group admins may manage join requests",
        )),
    }
}

/// Command-side service implementing [`JoinRequestCommands`].
#[derive(Debug, Clone)]
pub struct JoinRequestCommandService<G, R, N> {
    groups: G,
    join_requests: R,
    notifier: N,
}

impl<G, R, N> JoinRequestCommandService<G, R, N>
where
    G: GroupRepository,
    R: JoinRequestRepository,
    N: NotificationSender,
{
    /// Build a command service over the given driven ports.
    pub fn new(groups: G, join_requests: R, notifier: N) -> Self {
        Self {
            groups,
            join_requests,
            notifier,
        }
    }

    /// Notify every admin with a known mailbox about a new request.
    ///
    /// Failures are logged and swallowed; notification delivery never
    /// affects the outcome of the create operation.
    async fn notify_admins(&self, group: &Group, requester: &UserId) {
        let requester_name = match self.groups.find_profile(requester).await {
            Ok(Some(profile)) => profile.display_name,
            Ok(None) => {
                tracing::warn!(
                    user_id = %requester,
                    "requester profile missing, skipping notifications"
                );
                return;
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "could not load requester profile, skipping notifications"
                );
                return;
            }
        };
        let admins = match self.groups.list_admin_profiles(&group.id).await {
            Ok(admins) => admins,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    group_id = %group.id,
                    "could not load group admins, skipping notifications"
                );
                return;
            }
        };
        let notifications: Vec<JoinRequestNotification> = admins
            .into_iter()
            .filter_map(|admin| {
                let recipient = admin.email?;
                Some(JoinRequestNotification {
                    recipient,
                    recipient_name: admin.display_name,
                    group_name: group.name.clone(),
                    requester_name: requester_name.clone(),
                })
            })
            .collect();
        let sends = notifications.into_iter().map(|notification| async move {
            let outcome = self.notifier.send(&notification).await;
            (notification, outcome)
        });
        for (notification, outcome) in join_all(sends).await {
            if let Err(err) = outcome {
                tracing::warn!(
                    recipient = %notification.recipient,
                    group_id = %group.id,
                    error = %err,
                    "join request notification failed"
                );
            }
        }
    }
}

#[async_trait]
impl<G, R, N> JoinRequestCommands for JoinRequestCommandService<G, R, N>
where
    G: GroupRepository,
    R: JoinRequestRepository,
    N: NotificationSender,
{
    async fn create(&self, request: CreateJoinRequest) -> Result<JoinRequest, Error> {
        let group = self
            .groups
            .find_group(&request.group_id)
            .await
            .map_err(map_group_error)?
            .ok_or_else(group_not_found)?;
        let membership = self
            .groups
            .find_membership(&request.group_id, &request.user_id)
            .await
            .map_err(map_group_error)?;
        if membership.is_some() {
            return Err(already_member());
        }
        let existing = self
            .join_requests
            .find_by_group_and_user(&request.group_id, &request.user_id)
            .await
            .map_err(map_join_request_error)?;
        if existing.is_some_and(|existing| existing.is_pending()) {
            return Err(already_pending());
        }
        // The store's unique constraint closes the window between the
        // pending check above and this write.
        let created = self
            .join_requests
            .upsert_pending(&request.group_id, &request.user_id)
            .await
            .map_err(map_join_request_error)?;
        tracing::info!(
            group_id = %request.group_id,
            user_id = %request.user_id,
            request_id = %created.id,
            "join request created"
        );
        self.notify_admins(&group, &request.user_id).await;
        Ok(created)
    }

    async fn resolve(&self, request: ResolveJoinRequest) -> Result<JoinRequest, Error> {
        self.groups
            .find_group(&request.group_id)
            .await
            .map_err(map_group_error)?
            .ok_or_else(group_not_found)?;
        require_admin(&self.groups, &request.group_id, &request.acting_user).await?;
        let resolved = match request.action {
            ResolveAction::Accept => {
                self.join_requests
                    .accept(&request.group_id, &request.request_id)
                    .await
            }
            ResolveAction::Decline => {
                self.join_requests
                    .decline(&request.group_id, &request.request_id)
                    .await
            }
        }
        .map_err(map_join_request_error)?;
        let resolved = resolved
            .ok_or_else(|| Error::not_found("no pending join request matches"))?;
        tracing::info!(
            group_id = %request.group_id,
            request_id = %request.request_id,
            status = %resolved.status,
            "join request resolved"
        );
        Ok(resolved)
    }
}

/// Query-side service implementing [`JoinRequestQueries`].
#[derive(Debug, Clone)]
pub struct JoinRequestQueryService<G, R> {
    groups: G,
    join_requests: R,
}

impl<G, R> JoinRequestQueryService<G, R>
where
    G: GroupRepository,
    R: JoinRequestRepository,
{
    /// Build a query service over the given driven ports.
    pub fn new(groups: G, join_requests: R) -> Self {
        Self {
            groups,
            join_requests,
        }
    }
}

#[async_trait]
impl<G, R> JoinRequestQueries for JoinRequestQueryService<G, R>
where
    G: GroupRepository,
    R: JoinRequestRepository,
{
    async fn list_pending(
        &self,
        request: ListPendingJoinRequests,
    ) -> Result<Vec<PendingJoinRequest>, Error> {
        self.groups
            .find_group(&request.group_id)
            .await
            .map_err(map_group_error)?
            .ok_or_else(group_not_found)?;
        require_admin(&self.groups, &request.group_id, &request.acting_user).await?;
        self.join_requests
            .list_pending_with_profiles(&request.group_id)
            .await
            .map_err(map_join_request_error)
    }
}

#[cfg(test)]
#[path = "join_request_service_tests.rs"]
mod tests;
