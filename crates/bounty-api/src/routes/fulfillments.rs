//! # Fulfillment Endpoints
//!
//! - `POST /v1/bounties/{bounty}/fulfillments`: submit a claim
//! - `GET /v1/bounties/{bounty}/fulfillments`: count and list claims
//! - `GET /v1/bounties/{bounty}/fulfillments/{fulfillment}`: one claim
//! - `POST /v1/bounties/{bounty}/fulfillments/{fulfillment}/accept`: pay the claimant

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bounty_core::{BountyId, FulfillmentId};
use bounty_ledger::{Fulfillment, LedgerError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::bounties::{validate_data, BountyResponse};
use super::observe;
use crate::error::AppError;
use crate::extractors::{extract_path, extract_validated_json, Caller, Validate};
use crate::state::{AppState, Ledger};

/// Request to submit a fulfillment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FulfillBountyRequest {
    /// Opaque claim content.
    pub data: String,
}

impl Validate for FulfillBountyRequest {
    fn validate(&self) -> Result<(), String> {
        validate_data(&self.data)
    }
}

/// A fulfillment as served over HTTP.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FulfillmentResponse {
    pub bounty: usize,
    pub id: usize,
    pub fulfiller: String,
    pub data: String,
    pub accepted: bool,
    pub submitted_at: String,
}

impl FulfillmentResponse {
    fn new(bounty: BountyId, id: FulfillmentId, fulfillment: &Fulfillment) -> Self {
        Self {
            bounty: bounty.index(),
            id: id.index(),
            fulfiller: fulfillment.fulfiller.to_string(),
            data: fulfillment.data.clone(),
            accepted: fulfillment.accepted,
            submitted_at: fulfillment.submitted_at.to_iso8601(),
        }
    }

    fn load(ledger: &Ledger, bounty: BountyId, id: FulfillmentId) -> Result<Self, LedgerError> {
        ledger
            .fulfillment(bounty, id)
            .map(|fulfillment| Self::new(bounty, id, fulfillment))
    }
}

/// All fulfillments of one bounty in submission order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FulfillmentListResponse {
    pub bounty: usize,
    pub count: usize,
    pub fulfillments: Vec<FulfillmentResponse>,
}

/// Build the fulfillments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/bounties/{bounty}/fulfillments",
            get(list_fulfillments).post(fulfill_bounty),
        )
        .route(
            "/v1/bounties/{bounty}/fulfillments/{fulfillment}",
            get(get_fulfillment),
        )
        .route(
            "/v1/bounties/{bounty}/fulfillments/{fulfillment}/accept",
            post(accept_fulfillment),
        )
}

/// POST /v1/bounties/{bounty}/fulfillments: Submit a fulfillment.
#[utoipa::path(
    post,
    path = "/v1/bounties/{bounty}/fulfillments",
    request_body = FulfillBountyRequest,
    params(
        ("bounty" = usize, Path, description = "Bounty index"),
        ("x-party-id" = String, Header, description = "Calling party; must not be the issuer"),
    ),
    responses(
        (status = 201, description = "Fulfillment recorded", body = FulfillmentResponse),
        (status = 403, description = "Issuer cannot fulfill own bounty", body = crate::error::ErrorBody),
        (status = 404, description = "No such bounty", body = crate::error::ErrorBody),
        (status = 409, description = "Bounty not open or deadline passed", body = crate::error::ErrorBody),
    ),
    tag = "fulfillments"
)]
pub(crate) async fn fulfill_bounty(
    State(state): State<AppState>,
    Caller(caller): Caller,
    path: Result<Path<usize>, PathRejection>,
    body: Result<Json<FulfillBountyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FulfillmentResponse>), AppError> {
    let bounty = BountyId(extract_path(path)?);
    let req = extract_validated_json(body)?;
    let fulfillment = state.ledger.write(|ledger| {
        let result = ledger.fulfill_bounty(&caller, bounty, req.data);
        observe("fulfill", &result, ledger);
        FulfillmentResponse::load(ledger, bounty, result?)
    })?;
    Ok((StatusCode::CREATED, Json(fulfillment)))
}

/// GET /v1/bounties/{bounty}/fulfillments: List fulfillments.
#[utoipa::path(
    get,
    path = "/v1/bounties/{bounty}/fulfillments",
    params(("bounty" = usize, Path, description = "Bounty index")),
    responses(
        (status = 200, description = "Fulfillments of the bounty", body = FulfillmentListResponse),
        (status = 404, description = "No such bounty", body = crate::error::ErrorBody),
    ),
    tag = "fulfillments"
)]
pub(crate) async fn list_fulfillments(
    State(state): State<AppState>,
    path: Result<Path<usize>, PathRejection>,
) -> Result<Json<FulfillmentListResponse>, AppError> {
    let bounty = BountyId(extract_path(path)?);
    let fulfillments = state.ledger.read(|ledger| {
        ledger.fulfillments(bounty).map(|all| {
            all.iter()
                .enumerate()
                .map(|(i, f)| FulfillmentResponse::new(bounty, FulfillmentId(i), f))
                .collect::<Vec<_>>()
        })
    })?;
    Ok(Json(FulfillmentListResponse {
        bounty: bounty.index(),
        count: fulfillments.len(),
        fulfillments,
    }))
}

/// GET /v1/bounties/{bounty}/fulfillments/{fulfillment}: Get a fulfillment.
#[utoipa::path(
    get,
    path = "/v1/bounties/{bounty}/fulfillments/{fulfillment}",
    params(
        ("bounty" = usize, Path, description = "Bounty index"),
        ("fulfillment" = usize, Path, description = "Fulfillment index within the bounty"),
    ),
    responses(
        (status = 200, description = "Fulfillment found", body = FulfillmentResponse),
        (status = 404, description = "No such bounty or fulfillment", body = crate::error::ErrorBody),
    ),
    tag = "fulfillments"
)]
pub(crate) async fn get_fulfillment(
    State(state): State<AppState>,
    path: Result<Path<(usize, usize)>, PathRejection>,
) -> Result<Json<FulfillmentResponse>, AppError> {
    let (bounty, fulfillment) = extract_path(path)?;
    let (bounty, fulfillment) = (BountyId(bounty), FulfillmentId(fulfillment));
    let response = state
        .ledger
        .read(|ledger| FulfillmentResponse::load(ledger, bounty, fulfillment))?;
    Ok(Json(response))
}

/// POST /v1/bounties/{bounty}/fulfillments/{fulfillment}/accept: Accept and pay.
#[utoipa::path(
    post,
    path = "/v1/bounties/{bounty}/fulfillments/{fulfillment}/accept",
    params(
        ("bounty" = usize, Path, description = "Bounty index"),
        ("fulfillment" = usize, Path, description = "Fulfillment index within the bounty"),
        ("x-party-id" = String, Header, description = "Calling party; must be the issuer"),
    ),
    responses(
        (status = 200, description = "Fulfillment accepted, reward paid", body = BountyResponse),
        (status = 403, description = "Caller is not the issuer", body = crate::error::ErrorBody),
        (status = 404, description = "No such bounty or fulfillment", body = crate::error::ErrorBody),
        (status = 409, description = "Bounty is not open", body = crate::error::ErrorBody),
        (status = 424, description = "Payout transfer failed", body = crate::error::ErrorBody),
    ),
    tag = "fulfillments"
)]
pub(crate) async fn accept_fulfillment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    path: Result<Path<(usize, usize)>, PathRejection>,
) -> Result<Json<BountyResponse>, AppError> {
    let (bounty, fulfillment) = extract_path(path)?;
    let (bounty, fulfillment) = (BountyId(bounty), FulfillmentId(fulfillment));
    let response = state.ledger.write(|ledger| {
        let result = ledger.accept_fulfillment(&caller, bounty, fulfillment);
        observe("accept", &result, ledger);
        result?;
        BountyResponse::load(ledger, bounty)
    })?;
    Ok(Json(response))
}
