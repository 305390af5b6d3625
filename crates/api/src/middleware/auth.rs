//! # Caller Identity
//!
//! Authentication happens upstream; the gateway forwards the caller as two
//! headers, `x-user-id` (UUID) and `x-user-role` (`patient` or `admin`).
//! The extractors here turn those headers into typed callers and enforce the
//! role a route requires.

use std::str::FromStr;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use carebook_core::errors::CareError;
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Patient,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "admin" => Ok(Role::Admin),
            other => Err(CareError::Authentication(format!("Unknown role '{}'", other))),
        }
    }
}

/// Any authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, CareError> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| CareError::Authentication(format!("Missing {} header", name)))?;
    value
        .to_str()
        .map_err(|_| CareError::Authentication(format!("Malformed {} header", name)))
}

impl Caller {
    pub fn from_parts(parts: &Parts) -> Result<Self, CareError> {
        let user_id = header(parts, USER_ID_HEADER)?;
        let user_id = Uuid::parse_str(user_id.trim())
            .map_err(|_| CareError::Authentication(format!("Malformed {} header", USER_ID_HEADER)))?;
        let role = header(parts, USER_ROLE_HEADER)?.parse()?;

        Ok(Self { user_id, role })
    }

    fn require(self, role: Role) -> Result<Self, CareError> {
        if self.role != role {
            return Err(CareError::Unauthorized(format!(
                "This action requires the {} role",
                role.as_str()
            )));
        }
        Ok(self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller::from_parts(parts)?)
    }
}

/// A caller acting as a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientCaller(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for PatientCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_parts(parts)?.require(Role::Patient)?;
        Ok(PatientCaller(caller))
    }
}

/// A caller holding the admin role. Admin routes take this extractor so the
/// role check happens before any handler code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCaller(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for AdminCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_parts(parts)?.require(Role::Admin)?;
        Ok(AdminCaller(caller))
    }
}
