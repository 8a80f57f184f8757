//! # Bounty Endpoints
//!
//! - `POST /v1/bounties`: issue a bounty, escrowing the reward
//! - `GET /v1/bounties`: count and list bounties
//! - `GET /v1/bounties/{bounty}`: one bounty
//! - `GET /v1/bounties/{bounty}/status`: status label
//! - `POST /v1/bounties/{bounty}/cancel`: cancel and refund the issuer
//!
//! Mutating endpoints act as the party in the `x-party-id` header.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bounty_core::{Amount, BountyId, Timestamp};
use bounty_ledger::{Bounty, BountyTransitionRecord, LedgerError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::observe;
use crate::error::AppError;
use crate::extractors::{extract_path, extract_validated_json, Caller, Validate};
use crate::state::{AppState, Ledger};

/// Upper bound on opaque `data` payloads, in bytes.
pub const MAX_DATA_BYTES: usize = 16 * 1024;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to issue a new bounty.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueBountyRequest {
    /// Opaque description of the work.
    pub data: String,
    /// RFC 3339 deadline for fulfillments.
    #[schema(value_type = String, example = "2199-12-25T00:00:00Z")]
    pub deadline: Timestamp,
    /// Deposit in smallest units; becomes the reward.
    #[schema(value_type = String, example = "1000000000000000000")]
    pub reward: Amount,
}

impl Validate for IssueBountyRequest {
    fn validate(&self) -> Result<(), String> {
        validate_data(&self.data)
    }
}

pub(crate) fn validate_data(data: &str) -> Result<(), String> {
    if data.len() > MAX_DATA_BYTES {
        return Err(format!("data exceeds {MAX_DATA_BYTES} bytes"));
    }
    Ok(())
}

/// A recorded status transition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    pub from: String,
    pub to: String,
    pub at: String,
    pub actor: String,
}

impl From<&BountyTransitionRecord> for TransitionResponse {
    fn from(record: &BountyTransitionRecord) -> Self {
        Self {
            from: record.from.to_string(),
            to: record.to.to_string(),
            at: record.at.to_iso8601(),
            actor: record.actor.to_string(),
        }
    }
}

/// A bounty as served over HTTP.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BountyResponse {
    pub id: usize,
    pub issuer: String,
    pub data: String,
    pub deadline: String,
    pub reward: String,
    pub status: String,
    pub fulfillment_count: usize,
    pub accepted_fulfillment: Option<usize>,
    pub fulfilled_on: Option<String>,
    pub created_at: String,
    pub cancelled_on: Option<String>,
    pub transitions: Vec<TransitionResponse>,
}

impl BountyResponse {
    pub(crate) fn new(id: BountyId, bounty: &Bounty) -> Self {
        Self {
            id: id.index(),
            issuer: bounty.issuer.to_string(),
            data: bounty.data.clone(),
            deadline: bounty.deadline.to_iso8601(),
            reward: bounty.reward.to_string(),
            status: bounty.status.to_string(),
            fulfillment_count: bounty.fulfillment_count(),
            accepted_fulfillment: bounty.accepted_fulfillment.map(|f| f.index()),
            fulfilled_on: bounty.fulfilled_on.map(|t| t.to_iso8601()),
            created_at: bounty.created_at.to_iso8601(),
            cancelled_on: bounty.cancelled_on.map(|t| t.to_iso8601()),
            transitions: bounty.transitions.iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn load(ledger: &Ledger, id: BountyId) -> Result<Self, LedgerError> {
        ledger.bounty(id).map(|bounty| Self::new(id, bounty))
    }
}

/// All bounties in issuance order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BountyListResponse {
    pub count: usize,
    pub bounties: Vec<BountyResponse>,
}

/// Status label of a bounty.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub bounty: usize,
    /// `CREATED`, `ACCEPTED` or `CANCELLED`.
    pub status: String,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the bounties router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/bounties", get(list_bounties).post(issue_bounty))
        .route("/v1/bounties/{bounty}", get(get_bounty))
        .route("/v1/bounties/{bounty}/status", get(get_status))
        .route("/v1/bounties/{bounty}/cancel", post(cancel_bounty))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/bounties: Issue a bounty.
#[utoipa::path(
    post,
    path = "/v1/bounties",
    request_body = IssueBountyRequest,
    params(("x-party-id" = String, Header, description = "Calling party")),
    responses(
        (status = 201, description = "Bounty issued", body = BountyResponse),
        (status = 401, description = "Missing caller identity", body = crate::error::ErrorBody),
        (status = 422, description = "Zero deposit or invalid body", body = crate::error::ErrorBody),
        (status = 424, description = "Deposit transfer failed", body = crate::error::ErrorBody),
    ),
    tag = "bounties"
)]
pub(crate) async fn issue_bounty(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<IssueBountyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BountyResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let bounty = state.ledger.write(|ledger| {
        let result = ledger.issue_bounty(&caller, req.data, req.deadline, req.reward);
        observe("issue", &result, ledger);
        BountyResponse::load(ledger, result?)
    })?;
    Ok((StatusCode::CREATED, Json(bounty)))
}

/// GET /v1/bounties: List bounties.
#[utoipa::path(
    get,
    path = "/v1/bounties",
    responses(
        (status = 200, description = "All bounties", body = BountyListResponse),
    ),
    tag = "bounties"
)]
pub(crate) async fn list_bounties(State(state): State<AppState>) -> Json<BountyListResponse> {
    let bounties: Vec<BountyResponse> = state.ledger.read(|ledger| {
        ledger
            .bounties()
            .map(|(id, bounty)| BountyResponse::new(id, bounty))
            .collect()
    });
    Json(BountyListResponse {
        count: bounties.len(),
        bounties,
    })
}

/// GET /v1/bounties/{bounty}: Get a bounty.
#[utoipa::path(
    get,
    path = "/v1/bounties/{bounty}",
    params(("bounty" = usize, Path, description = "Bounty index")),
    responses(
        (status = 200, description = "Bounty found", body = BountyResponse),
        (status = 404, description = "No such bounty", body = crate::error::ErrorBody),
    ),
    tag = "bounties"
)]
pub(crate) async fn get_bounty(
    State(state): State<AppState>,
    path: Result<Path<usize>, PathRejection>,
) -> Result<Json<BountyResponse>, AppError> {
    let id = BountyId(extract_path(path)?);
    let bounty = state.ledger.read(|ledger| BountyResponse::load(ledger, id))?;
    Ok(Json(bounty))
}

/// GET /v1/bounties/{bounty}/status: Get a bounty's status label.
#[utoipa::path(
    get,
    path = "/v1/bounties/{bounty}/status",
    params(("bounty" = usize, Path, description = "Bounty index")),
    responses(
        (status = 200, description = "Status label", body = StatusResponse),
        (status = 404, description = "No such bounty", body = crate::error::ErrorBody),
    ),
    tag = "bounties"
)]
pub(crate) async fn get_status(
    State(state): State<AppState>,
    path: Result<Path<usize>, PathRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let id = BountyId(extract_path(path)?);
    let status = state.ledger.read(|ledger| ledger.bounty_status(id))?;
    Ok(Json(StatusResponse {
        bounty: id.index(),
        status: status.to_string(),
    }))
}

/// POST /v1/bounties/{bounty}/cancel: Cancel and refund.
#[utoipa::path(
    post,
    path = "/v1/bounties/{bounty}/cancel",
    params(
        ("bounty" = usize, Path, description = "Bounty index"),
        ("x-party-id" = String, Header, description = "Calling party; must be the issuer"),
    ),
    responses(
        (status = 200, description = "Bounty cancelled", body = BountyResponse),
        (status = 403, description = "Caller is not the issuer", body = crate::error::ErrorBody),
        (status = 404, description = "No such bounty", body = crate::error::ErrorBody),
        (status = 409, description = "Bounty is not open", body = crate::error::ErrorBody),
        (status = 424, description = "Refund transfer failed", body = crate::error::ErrorBody),
    ),
    tag = "bounties"
)]
pub(crate) async fn cancel_bounty(
    State(state): State<AppState>,
    Caller(caller): Caller,
    path: Result<Path<usize>, PathRejection>,
) -> Result<Json<BountyResponse>, AppError> {
    let id = BountyId(extract_path(path)?);
    let bounty = state.ledger.write(|ledger| {
        let result = ledger.cancel_bounty(&caller, id);
        observe("cancel", &result, ledger);
        result?;
        BountyResponse::load(ledger, id)
    })?;
    Ok(Json(bounty))
}
