//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **email**: SMTP-backed notification delivery via lettre
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod email;
pub mod persistence;
