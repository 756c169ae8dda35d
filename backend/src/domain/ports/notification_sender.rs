//! Port for delivering join request notifications to group admins.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, GroupName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotificationSendError {
        /// The downstream provider refused the message.
        Rejected { message: String } =>
            "notification rejected by provider: {message}",
        /// Transport-level failure before the provider could answer.
        Transport { message: String } =>
            "notification transport failed: {message}",
    }
}

/// One admin-facing notification about a new join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequestNotification {
    /// Admin mailbox the notification is addressed to.
    pub recipient: EmailAddress,
    /// Admin display name used in the greeting.
    pub recipient_name: DisplayName,
    /// Name of the group the request targets.
    pub group_name: GroupName,
    /// Display name of the user who asked to join.
    pub requester_name: DisplayName,
}

/// Port for sending a single notification to a single recipient.
///
/// Delivery is best effort: callers fan out one call per recipient and treat
/// failures as non-fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver one notification.
    async fn send(
        &self,
        notification: &JoinRequestNotification,
    ) -> Result<(), NotificationSendError>;
}

/// Fixture sender that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSender;

#[async_trait]
impl NotificationSender for FixtureNotificationSender {
    async fn send(
        &self,
        _notification: &JoinRequestNotification,
    ) -> Result<(), NotificationSendError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn sample_notification() -> JoinRequestNotification {
        JoinRequestNotification {
            recipient: EmailAddress::new("admin@example.com")
                .expect("valid email"),
            recipient_name: DisplayName::new("Alice").expect("valid name"),
            group_name: GroupName::new("Book Club").expect("valid name"),
            requester_name: DisplayName::new("Bob").expect("valid name"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_sender_accepts_everything() {
        let sender = FixtureNotificationSender;
        sender
            .send(&sample_notification())
            .await
            .expect("fixture send succeeds");
    }

    #[rstest]
    fn transport_error_formats_message() {
        let err = NotificationSendError::transport("connection refused");
        assert_eq!(
            err.to_string(),
            "notification transport failed: connection refused"
        );
    }
}
