//! # Custom Extractors & Validation
//!
//! - [`Caller`] reads the calling party from the `x-party-id` header.
//! - [`Validate`] lets request DTOs check business rules beyond what serde
//!   deserialization checks.
//! - [`extract_json`], [`extract_path`] and [`extract_query`] map extractor
//!   rejections into [`AppError`] so every failure renders as a JSON body.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::Json;
use bounty_core::PartyId;

use crate::error::AppError;

/// Header carrying the caller's party identity.
pub const PARTY_HEADER: &str = "x-party-id";

/// The party on whose behalf a request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub PartyId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PARTY_HEADER)
            .ok_or_else(|| AppError::Unauthenticated(format!("missing {PARTY_HEADER} header")))?;
        let value = value
            .to_str()
            .map_err(|_| AppError::Unauthenticated(format!("{PARTY_HEADER} is not valid text")))?;
        PartyId::new(value)
            .map(Caller)
            .map_err(|e| AppError::Unauthenticated(e.to_string()))
    }
}

/// Trait for request types that can validate their business rules
/// beyond what serde deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Extract path parameters, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract query parameters, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
