//! Authentication helpers used by HTTP handlers.
//!
//! Keeps the HTTP modules focused on request/response mapping by
//! concentrating credential checks here. Credentials are fixture-backed
//! until a real identity provider is wired in.

use crate::domain::{Error, LoginCredentials, UserId};

use super::ApiResult;

pub fn authenticate(credentials: &LoginCredentials) -> ApiResult<UserId> {
    if credentials.username() == "admin" && credentials.password() == "password" {
        UserId::new("123e4567-e89b-12d3-a456-426614174000")
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    } else {
        Err(Error::unauthorized("invalid credentials"))
    }
}
