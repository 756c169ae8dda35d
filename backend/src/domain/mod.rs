//! Domain core: entities, value objects, errors, ports, and application
//! services for the join request lifecycle.
//!
//! Nothing in this module depends on HTTP, Diesel, or SMTP types; adapters
//! live under `inbound` and `outbound`.

mod error;
mod group;
mod join_request;
mod join_request_service;
pub mod ports;
mod trace_id;
mod user;

pub use error::{Error, ErrorCode};
pub use group::{Group, GroupName, GroupValidationError, Membership, MembershipRole};
pub use join_request::{
    JoinRequest, JoinRequestParseError, JoinRequestStatus, PendingJoinRequest, ResolveAction,
};
pub use join_request_service::{JoinRequestCommandService, JoinRequestQueryService};
pub use trace_id::{TraceId, TRACE_ID_HEADER};
pub use user::{
    DisplayName, EmailAddress, LoginCredentials, LoginValidationError, UserId, UserProfile,
    UserValidationError,
};

/// Convenience alias for fallible domain operations.
pub type ApiResult<T> = Result<T, Error>;
