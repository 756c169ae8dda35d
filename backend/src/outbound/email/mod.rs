//! SMTP email adapters implementing the notification port via lettre.

mod smtp_notification_sender;

pub use smtp_notification_sender::{SmtpConfig, SmtpNotificationSender};
