//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureJoinRequestCommands, FixtureJoinRequestQueries, JoinRequestCommands,
    JoinRequestQueries,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub join_requests: Arc<dyn JoinRequestCommands>,
    pub join_requests_query: Arc<dyn JoinRequestQueries>,
}

impl HttpState {
    /// Construct state over the given driving ports.
    pub fn new(
        join_requests: Arc<dyn JoinRequestCommands>,
        join_requests_query: Arc<dyn JoinRequestQueries>,
    ) -> Self {
        Self {
            join_requests,
            join_requests_query,
        }
    }

    /// State backed entirely by fixtures, for handler tests and examples.
    pub fn fixture() -> Self {
        Self::new(
            Arc::new(FixtureJoinRequestCommands),
            Arc::new(FixtureJoinRequestQueries),
        )
    }
}
