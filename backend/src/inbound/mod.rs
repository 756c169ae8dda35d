//! Inbound adapters driving the domain core.

pub mod http;
