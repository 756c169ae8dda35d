//! SMTP-backed `NotificationSender` implementation using lettre.
//!
//! Sends a plain-text email per recipient. The blocking lettre transport
//! runs on the blocking thread pool so delivery never stalls the async
//! runtime.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::domain::ports::{JoinRequestNotification, NotificationSendError, NotificationSender};

/// Configuration for the SMTP notification sender.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay host, e.g. `smtp.example.com`.
    pub host: String,
    /// SMTP port, usually 587 for STARTTLS.
    pub port: u16,
    /// Authentication username.
    pub username: String,
    /// Authentication password.
    pub password: String,
    /// Sender mailbox placed in the `From` header.
    pub from_address: String,
    /// Sender display name placed in the `From` header.
    pub from_name: String,
}

/// lettre-backed implementation of the notification sender port.
#[derive(Clone)]
pub struct SmtpNotificationSender {
    config: SmtpConfig,
    credentials: Credentials,
}

impl SmtpNotificationSender {
    /// Create a sender from SMTP configuration.
    pub fn new(config: SmtpConfig) -> Self {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        Self {
            config,
            credentials,
        }
    }

    /// Build a transport per send to avoid stale pooled connections.
    fn build_transport(&self) -> Result<SmtpTransport, NotificationSendError> {
        Ok(SmtpTransport::relay(&self.config.host)
            .map_err(|err| {
                NotificationSendError::transport(format!("SMTP relay error: {err}"))
            })?
            .port(self.config.port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.config.from_name, self.config.from_address)
    }
}

fn notification_subject(notification: &JoinRequestNotification) -> String {
    format!(
        "New join request for {}",
        notification.group_name.as_ref()
    )
}

fn notification_body(notification: &JoinRequestNotification) -> String {
    format!(
        "Hello {recipient},\n\n\
         {requester} has asked to join {group}.\n\
         Review the request from the group's pending join requests page.\n",
        recipient = notification.recipient_name.as_ref(),
        requester = notification.requester_name.as_ref(),
        group = notification.group_name.as_ref(),
    )
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send(
        &self,
        notification: &JoinRequestNotification,
    ) -> Result<(), NotificationSendError> {
        let message = Message::builder()
            .from(self.from_header().parse().map_err(|err| {
                NotificationSendError::rejected(format!("invalid from address: {err}"))
            })?)
            .to(notification.recipient.as_ref().parse().map_err(|err| {
                NotificationSendError::rejected(format!("invalid recipient address: {err}"))
            })?)
            .subject(notification_subject(notification))
            .header(ContentType::TEXT_PLAIN)
            .body(notification_body(notification))
            .map_err(|err| {
                NotificationSendError::rejected(format!("failed to build email: {err}"))
            })?;

        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer.send(&message).map_err(|err| {
                NotificationSendError::transport(format!("failed to send email: {err}"))
            })
        })
        .await
        .map_err(|err| {
            NotificationSendError::transport(format!("email task failed: {err}"))
        })?
        .map(|_| ())
    }
}
