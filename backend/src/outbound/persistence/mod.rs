//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel row structs and
//! domain types; no business logic resides here. Row structs (`models`) and
//! table definitions (`schema`) are internal implementation details, never
//! exposed to the domain layer. Connections are pooled via `bb8` with async
//! support through `diesel-async`.

mod diesel_error_mapping;
mod diesel_group_repository;
mod diesel_join_request_repository;
mod models;
mod pool;
mod schema;

pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_join_request_repository::DieselJoinRequestRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
