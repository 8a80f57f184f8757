//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bounty Ledger API",
        version = "0.1.0",
        description = "Escrowed bounties: issue with a deposit, collect fulfillments, accept one to pay its submitter or cancel to refund the issuer.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Bounties
        crate::routes::bounties::issue_bounty,
        crate::routes::bounties::list_bounties,
        crate::routes::bounties::get_bounty,
        crate::routes::bounties::get_status,
        crate::routes::bounties::cancel_bounty,
        // Fulfillments
        crate::routes::fulfillments::fulfill_bounty,
        crate::routes::fulfillments::list_fulfillments,
        crate::routes::fulfillments::get_fulfillment,
        crate::routes::fulfillments::accept_fulfillment,
        // Ledger
        crate::routes::ledger::get_escrow,
        crate::routes::ledger::list_events,
        crate::routes::ledger::get_account,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Bounty DTOs
        crate::routes::bounties::IssueBountyRequest,
        crate::routes::bounties::BountyResponse,
        crate::routes::bounties::BountyListResponse,
        crate::routes::bounties::StatusResponse,
        crate::routes::bounties::TransitionResponse,
        // Fulfillment DTOs
        crate::routes::fulfillments::FulfillBountyRequest,
        crate::routes::fulfillments::FulfillmentResponse,
        crate::routes::fulfillments::FulfillmentListResponse,
        // Ledger DTOs
        crate::routes::ledger::EscrowResponse,
        crate::routes::ledger::EventsResponse,
        crate::routes::ledger::AccountResponse,
    )),
    tags(
        (name = "bounties", description = "Bounty issuance and cancellation"),
        (name = "fulfillments", description = "Claims against bounties and their acceptance"),
        (name = "ledger", description = "Escrow totals, event journal and balances"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
