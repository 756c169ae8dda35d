//! Ports connecting the domain core to its adapters.
//!
//! Driving ports ([`JoinRequestCommands`], [`JoinRequestQueries`]) are the
//! interfaces inbound adapters call; driven ports ([`GroupRepository`],
//! [`JoinRequestRepository`], [`NotificationSender`]) are implemented by
//! outbound adapters. All ports ship a `Fixture*` implementation for tests
//! and, under `cfg(test)`, a mockall mock.

mod group_repository;
mod join_request_command;
mod join_request_query;
mod join_request_repository;
mod macros;
mod notification_sender;

pub(crate) use macros::define_port_error;

pub use group_repository::{FixtureGroupRepository, GroupRepository, GroupRepositoryError};
pub use join_request_command::{
    CreateJoinRequest, FixtureJoinRequestCommands, JoinRequestCommands, ResolveJoinRequest,
};
pub use join_request_query::{
    FixtureJoinRequestQueries, JoinRequestQueries, ListPendingJoinRequests,
};
pub use join_request_repository::{
    FixtureJoinRequestRepository, JoinRequestRepository, JoinRequestRepositoryError,
};
pub use notification_sender::{
    FixtureNotificationSender, JoinRequestNotification, NotificationSender, NotificationSendError,
};

#[cfg(test)]
pub use group_repository::MockGroupRepository;
#[cfg(test)]
pub use join_request_command::MockJoinRequestCommands;
#[cfg(test)]
pub use join_request_query::MockJoinRequestQueries;
#[cfg(test)]
pub use join_request_repository::MockJoinRequestRepository;
#[cfg(test)]
pub use notification_sender::MockNotificationSender;
