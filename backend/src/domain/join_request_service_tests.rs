//! Behavioural coverage for the join request services using in-memory
//! adapters plus mocks for failure injection.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rstest::{fixture, rstest};
use uuid::Uuid;

use crate::domain::ports::{
    CreateJoinRequest, GroupRepository, GroupRepositoryError, JoinRequestCommands,
    JoinRequestNotification, JoinRequestQueries, JoinRequestRepository,
    JoinRequestRepositoryError, ListPendingJoinRequests, MockGroupRepository,
    NotificationSender, NotificationSendError, ResolveJoinRequest,
};
use crate::domain::{
    DisplayName, EmailAddress, ErrorCode, Group, GroupName, JoinRequest, JoinRequestStatus,
    Membership, MembershipRole, PendingJoinRequest, ResolveAction, UserId, UserProfile,
};

use super::{JoinRequestCommandService, JoinRequestQueryService};

#[derive(Default)]
struct Inner {
    groups: HashMap<Uuid, Group>,
    profiles: HashMap<Uuid, UserProfile>,
    memberships: Vec<Membership>,
    requests: Vec<JoinRequest>,
}

/// Shared in-memory store implementing both repository ports.
#[derive(Clone, Default)]
struct TestBackend(Arc<Mutex<Inner>>);

impl TestBackend {
    fn add_group(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let group = Group {
            id,
            name: GroupName::new(name).expect("valid group name"),
        };
        self.0.lock().expect("lock").groups.insert(id, group);
        id
    }

    fn add_user(&self, display_name: &str, email: Option<&str>) -> UserId {
        let id = UserId::random();
        let profile = UserProfile {
            id: id.clone(),
            display_name: DisplayName::new(display_name).expect("valid display name"),
            email: email.map(|e| EmailAddress::new(e).expect("valid email")),
            avatar_url: None,
        };
        self.0
            .lock()
            .expect("lock")
            .profiles
            .insert(*id.as_uuid(), profile);
        id
    }

    fn add_membership(&self, group_id: Uuid, user_id: &UserId, role: MembershipRole) {
        self.0.lock().expect("lock").memberships.push(Membership {
            group_id,
            user_id: user_id.clone(),
            role,
        });
    }

    fn memberships_of(&self, group_id: Uuid, user_id: &UserId) -> Vec<Membership> {
        self.0
            .lock()
            .expect("lock")
            .memberships
            .iter()
            .filter(|m| m.group_id == group_id && m.user_id == *user_id)
            .cloned()
            .collect()
    }

    fn request_count(&self) -> usize {
        self.0.lock().expect("lock").requests.len()
    }
}

#[async_trait]
impl GroupRepository for TestBackend {
    async fn find_group(&self, group_id: &Uuid) -> Result<Option<Group>, GroupRepositoryError> {
        Ok(self.0.lock().expect("lock").groups.get(group_id).cloned())
    }

    async fn find_membership(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Membership>, GroupRepositoryError> {
        Ok(self
            .0
            .lock()
            .expect("lock")
            .memberships
            .iter()
            .find(|m| m.group_id == *group_id && m.user_id == *user_id)
            .cloned())
    }

    async fn list_admin_profiles(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<UserProfile>, GroupRepositoryError> {
        let inner = self.0.lock().expect("lock");
        Ok(inner
            .memberships
            .iter()
            .filter(|m| m.group_id == *group_id && m.is_admin())
            .filter_map(|m| inner.profiles.get(m.user_id.as_uuid()).cloned())
            .collect())
    }

    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, GroupRepositoryError> {
        Ok(self
            .0
            .lock()
            .expect("lock")
            .profiles
            .get(user_id.as_uuid())
            .cloned())
    }
}

#[async_trait]
impl JoinRequestRepository for TestBackend {
    async fn find_by_group_and_user(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        Ok(self
            .0
            .lock()
            .expect("lock")
            .requests
            .iter()
            .find(|r| r.group_id == *group_id && r.user_id == *user_id)
            .cloned())
    }

    async fn upsert_pending(
        &self,
        group_id: &Uuid,
        user_id: &UserId,
    ) -> Result<JoinRequest, JoinRequestRepositoryError> {
        let mut inner = self.0.lock().expect("lock");
        if let Some(existing) = inner
            .requests
            .iter_mut()
            .find(|r| r.group_id == *group_id && r.user_id == *user_id)
        {
            if existing.is_pending() {
                return Err(JoinRequestRepositoryError::duplicate_pending());
            }
            existing.status = JoinRequestStatus::Pending;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let request = JoinRequest {
            id: Uuid::new_v4(),
            group_id: *group_id,
            user_id: user_id.clone(),
            status: JoinRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        inner.requests.push(request.clone());
        Ok(request)
    }

    async fn list_pending_with_profiles(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<PendingJoinRequest>, JoinRequestRepositoryError> {
        let inner = self.0.lock().expect("lock");
        let mut pending: Vec<&JoinRequest> = inner
            .requests
            .iter()
            .filter(|r| r.group_id == *group_id && r.is_pending())
            .collect();
        pending.sort_by_key(|r| r.created_at);
        Ok(pending
            .into_iter()
            .filter_map(|r| {
                inner
                    .profiles
                    .get(r.user_id.as_uuid())
                    .map(|profile| PendingJoinRequest {
                        id: r.id,
                        user: profile.clone(),
                    })
            })
            .collect())
    }

    async fn accept(
        &self,
        group_id: &Uuid,
        request_id: &Uuid,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        let mut inner = self.0.lock().expect("lock");
        let Some(request) = inner
            .requests
            .iter_mut()
            .find(|r| r.group_id == *group_id && r.id == *request_id && r.is_pending())
        else {
            return Ok(None);
        };
        request.status = JoinRequestStatus::Accepted;
        request.updated_at = Utc::now();
        let accepted = request.clone();
        inner.memberships.push(Membership {
            group_id: accepted.group_id,
            user_id: accepted.user_id.clone(),
            role: MembershipRole::Member,
        });
        Ok(Some(accepted))
    }

    async fn decline(
        &self,
        group_id: &Uuid,
        request_id: &Uuid,
    ) -> Result<Option<JoinRequest>, JoinRequestRepositoryError> {
        let mut inner = self.0.lock().expect("lock");
        let Some(request) = inner
            .requests
            .iter_mut()
            .find(|r| r.group_id == *group_id && r.id == *request_id && r.is_pending())
        else {
            return Ok(None);
        };
        request.status = JoinRequestStatus::Declined;
        request.updated_at = Utc::now();
        Ok(Some(request.clone()))
    }
}

/// Sender that records deliveries and can be told to fail for specific
/// recipients.
#[derive(Clone, Default)]
struct RecordingSender {
    sent: Arc<Mutex<Vec<JoinRequestNotification>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingSender {
    fn fail_for(&self, recipient: &str) {
        self.failing
            .lock()
            .expect("lock")
            .insert(recipient.to_owned());
    }

    fn recipients(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("lock")
            .iter()
            .map(|n| n.recipient.to_string())
            .collect()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(
        &self,
        notification: &JoinRequestNotification,
    ) -> Result<(), NotificationSendError> {
        if self
            .failing
            .lock()
            .expect("lock")
            .contains(notification.recipient.as_ref())
        {
            return Err(NotificationSendError::transport("connection refused"));
        }
        self.sent.lock().expect("lock").push(notification.clone());
        Ok(())
    }
}

struct Scenario {
    backend: TestBackend,
    sender: RecordingSender,
    group_id: Uuid,
    admin: UserId,
    requester: UserId,
}

impl Scenario {
    fn commands(
        &self,
    ) -> JoinRequestCommandService<TestBackend, TestBackend, RecordingSender> {
        JoinRequestCommandService::new(
            self.backend.clone(),
            self.backend.clone(),
            self.sender.clone(),
        )
    }

    fn queries(&self) -> JoinRequestQueryService<TestBackend, TestBackend> {
        JoinRequestQueryService::new(self.backend.clone(), self.backend.clone())
    }

    fn create_request(&self) -> CreateJoinRequest {
        CreateJoinRequest {
            group_id: self.group_id,
            user_id: self.requester.clone(),
        }
    }

    fn resolve_request(&self, request_id: Uuid, action: ResolveAction) -> ResolveJoinRequest {
        ResolveJoinRequest {
            group_id: self.group_id,
            request_id,
            acting_user: self.admin.clone(),
            action,
        }
    }
}

#[fixture]
fn scenario() -> Scenario {
    let backend = TestBackend::default();
    let group_id = backend.add_group("Book Club");
    let admin = backend.add_user("Alice", Some("alice@example.com"));
    backend.add_membership(group_id, &admin, MembershipRole::Admin);
    let requester = backend.add_user("Bob", Some("bob@example.com"));
    Scenario {
        backend,
        sender: RecordingSender::default(),
        group_id,
        admin,
        requester,
    }
}

#[rstest]
#[tokio::test]
async fn create_yields_pending_request_and_notifies_admins(scenario: Scenario) {
    let commands = scenario.commands();

    let created = commands
        .create(scenario.create_request())
        .await
        .expect("create succeeds");

    assert!(created.is_pending());
    assert_eq!(created.group_id, scenario.group_id);
    assert_eq!(scenario.sender.recipients(), vec!["alice@example.com"]);
}

#[rstest]
#[tokio::test]
async fn create_for_unknown_group_is_not_found(scenario: Scenario) {
    let commands = scenario.commands();

    let err = commands
        .create(CreateJoinRequest {
            group_id: Uuid::new_v4(),
            user_id: scenario.requester.clone(),
        })
        .await
        .expect_err("unknown group rejected");

    assert_eq!(err.code, ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn create_for_existing_member_conflicts(scenario: Scenario) {
    scenario
        .backend
        .add_membership(scenario.group_id, &scenario.requester, MembershipRole::Member);
    let commands = scenario.commands();

    let err = commands
        .create(scenario.create_request())
        .await
        .expect_err("member rejected");

    assert_eq!(err.code, ErrorCode::Conflict);
    assert_eq!(
        err.details,
        Some(serde_json::json!({ "reason": "already_member" }))
    );
}

#[rstest]
#[tokio::test]
async fn second_create_conflicts_while_first_is_pending(scenario: Scenario) {
    let commands = scenario.commands();
    commands
        .create(scenario.create_request())
        .await
        .expect("first create succeeds");

    let err = commands
        .create(scenario.create_request())
        .await
        .expect_err("second create rejected");

    assert_eq!(err.code, ErrorCode::Conflict);
    assert_eq!(
        err.details,
        Some(serde_json::json!({ "reason": "already_pending" }))
    );
    assert_eq!(scenario.backend.request_count(), 1);
}

#[rstest]
#[tokio::test]
async fn create_after_decline_reopens_the_same_record(scenario: Scenario) {
    let commands = scenario.commands();
    let first = commands
        .create(scenario.create_request())
        .await
        .expect("first create succeeds");
    commands
        .resolve(scenario.resolve_request(first.id, ResolveAction::Decline))
        .await
        .expect("decline succeeds");

    let reopened = commands
        .create(scenario.create_request())
        .await
        .expect("reopen succeeds");

    assert_eq!(reopened.id, first.id);
    assert!(reopened.is_pending());
    assert_eq!(scenario.backend.request_count(), 1);
}

#[rstest]
#[tokio::test]
async fn accept_marks_accepted_and_adds_member_role(scenario: Scenario) {
    let commands = scenario.commands();
    let created = commands
        .create(scenario.create_request())
        .await
        .expect("create succeeds");

    let resolved = commands
        .resolve(scenario.resolve_request(created.id, ResolveAction::Accept))
        .await
        .expect("accept succeeds");

    assert_eq!(resolved.status, JoinRequestStatus::Accepted);
    let memberships = scenario
        .backend
        .memberships_of(scenario.group_id, &scenario.requester);
    assert_eq!(memberships.len(), 1);
    assert_eq!(
        memberships.first().map(|m| m.role),
        Some(MembershipRole::Member)
    );
}

#[rstest]
#[tokio::test]
async fn resolving_an_already_resolved_request_is_not_found(scenario: Scenario) {
    let commands = scenario.commands();
    let created = commands
        .create(scenario.create_request())
        .await
        .expect("create succeeds");
    commands
        .resolve(scenario.resolve_request(created.id, ResolveAction::Decline))
        .await
        .expect("decline succeeds");

    let err = commands
        .resolve(scenario.resolve_request(created.id, ResolveAction::Accept))
        .await
        .expect_err("second resolution rejected");

    assert_eq!(err.code, ErrorCode::NotFound);
}

#[rstest]
#[case::accept(ResolveAction::Accept)]
#[case::decline(ResolveAction::Decline)]
#[tokio::test]
async fn non_admin_cannot_resolve(scenario: Scenario, #[case] action: ResolveAction) {
    let outsider = scenario.backend.add_user("Mallory", None);
    let commands = scenario.commands();
    let created = commands
        .create(scenario.create_request())
        .await
        .expect("create succeeds");

    let err = commands
        .resolve(ResolveJoinRequest {
            group_id: scenario.group_id,
            request_id: created.id,
            acting_user: outsider,
            action,
        })
        .await
        .expect_err("outsider rejected");

    assert_eq!(err.code, ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn notification_failure_does_not_fail_create(scenario: Scenario) {
    let second_admin = scenario
        .backend
        .add_user("Carol", Some("carol@example.com"));
    scenario
        .backend
        .add_membership(scenario.group_id, &second_admin, MembershipRole::Admin);
    scenario.sender.fail_for("alice@example.com");
    let commands = scenario.commands();

    let created = commands
        .create(scenario.create_request())
        .await
        .expect("create succeeds despite failed delivery");

    assert!(created.is_pending());
    assert_eq!(scenario.sender.recipients(), vec!["carol@example.com"]);
}

#[rstest]
#[tokio::test]
async fn admins_without_email_are_skipped(scenario: Scenario) {
    let mute_admin = scenario.backend.add_user("Dave", None);
    scenario
        .backend
        .add_membership(scenario.group_id, &mute_admin, MembershipRole::Admin);
    let commands = scenario.commands();

    commands
        .create(scenario.create_request())
        .await
        .expect("create succeeds");

    assert_eq!(scenario.sender.recipients(), vec!["alice@example.com"]);
}

#[rstest]
#[tokio::test]
async fn listing_is_admin_only(scenario: Scenario) {
    let queries = scenario.queries();

    let err = queries
        .list_pending(ListPendingJoinRequests {
            group_id: scenario.group_id,
            acting_user: scenario.requester.clone(),
        })
        .await
        .expect_err("non-admin rejected");

    assert_eq!(err.code, ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn listing_returns_pending_requests_oldest_first(scenario: Scenario) {
    let commands = scenario.commands();
    let first = commands
        .create(scenario.create_request())
        .await
        .expect("first create succeeds");
    let second_user = scenario.backend.add_user("Erin", Some("erin@example.com"));
    let second = commands
        .create(CreateJoinRequest {
            group_id: scenario.group_id,
            user_id: second_user,
        })
        .await
        .expect("second create succeeds");
    // Force a stable ordering even when both rows share a timestamp.
    {
        let mut inner = scenario.backend.0.lock().expect("lock");
        let base = Utc::now() - Duration::minutes(5);
        for (offset, request) in inner.requests.iter_mut().enumerate() {
            request.created_at = base + Duration::seconds(offset as i64);
        }
    }
    let queries = scenario.queries();

    let listing = queries
        .list_pending(ListPendingJoinRequests {
            group_id: scenario.group_id,
            acting_user: scenario.admin.clone(),
        })
        .await
        .expect("listing succeeds");

    assert_eq!(
        listing.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
    assert_eq!(
        listing.first().map(|p| p.user.display_name.as_ref()),
        Some("Bob")
    );
}

#[rstest]
#[tokio::test]
async fn repository_connection_failure_maps_to_service_unavailable(scenario: Scenario) {
    let mut groups = MockGroupRepository::new();
    groups
        .expect_find_group()
        .returning(|_| Err(GroupRepositoryError::connection("pool exhausted")));
    let commands = JoinRequestCommandService::new(
        groups,
        scenario.backend.clone(),
        scenario.sender.clone(),
    );

    let err = commands
        .create(scenario.create_request())
        .await
        .expect_err("connection failure surfaces");

    assert_eq!(err.code, ErrorCode::ServiceUnavailable);
}
