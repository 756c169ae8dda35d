//! Builders for HTTP state backed by real adapters or fixtures.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    FixtureNotificationSender, JoinRequestCommands, JoinRequestQueries, NotificationSender,
};
use backend::domain::{JoinRequestCommandService, JoinRequestQueryService};
use backend::inbound::http::state::HttpState;
use backend::outbound::email::SmtpNotificationSender;
use backend::outbound::persistence::{DbPool, DieselGroupRepository, DieselJoinRequestRepository};

use super::ServerConfig;

fn build_join_request_services<N>(
    pool: &DbPool,
    notifier: N,
) -> (Arc<dyn JoinRequestCommands>, Arc<dyn JoinRequestQueries>)
where
    N: NotificationSender + 'static,
{
    let groups = DieselGroupRepository::new(pool.clone());
    let join_requests = DieselJoinRequestRepository::new(pool.clone());
    let commands = Arc::new(JoinRequestCommandService::new(
        groups.clone(),
        join_requests.clone(),
        notifier,
    ));
    let queries = Arc::new(JoinRequestQueryService::new(groups, join_requests));
    (commands, queries)
}

/// Build the handler state from configuration.
///
/// With a database pool, handlers run against the Diesel-backed repositories;
/// notification delivery goes over SMTP when configured and is otherwise a
/// no-op. Without a pool the state falls back to fixtures, which keeps the
/// server bootable for smoke tests.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            let (commands, queries) = match &config.smtp {
                Some(smtp) => {
                    build_join_request_services(pool, SmtpNotificationSender::new(smtp.clone()))
                }
                None => build_join_request_services(pool, FixtureNotificationSender),
            };
            HttpState::new(commands, queries)
        }
        None => HttpState::fixture(),
    };
    web::Data::new(state)
}
