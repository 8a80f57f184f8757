//! # Ledger-Wide Endpoints
//!
//! - `GET /v1/escrow`: escrow balance, checked against open rewards
//! - `GET /v1/events?since=N`: event journal from sequence `N`
//! - `GET /v1/accounts/{party}`: treasury balance of a party

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use bounty_core::PartyId;
use bounty_ledger::EventRecord;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::extractors::{extract_path, extract_query};
use crate::state::AppState;

/// Escrow totals.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EscrowResponse {
    pub ledger: String,
    /// Sum of rewards of open bounties, in smallest units.
    pub escrow_balance: String,
    /// Funds the treasury holds in its vault.
    pub vault_balance: String,
    pub bounty_count: usize,
    pub open_bounties: usize,
}

/// Query parameters for the event journal.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// First sequence number to return. Defaults to 0.
    pub since: Option<u64>,
}

/// A slice of the event journal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventsResponse {
    pub ledger: String,
    /// Sequence number to pass as `since` on the next poll.
    pub next: u64,
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<EventRecord>,
}

/// A party's treasury balance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub party: String,
    pub balance: String,
}

/// Build the ledger-wide router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/escrow", get(get_escrow))
        .route("/v1/events", get(list_events))
        .route("/v1/accounts/{party}", get(get_account))
}

/// GET /v1/escrow: Escrow totals.
#[utoipa::path(
    get,
    path = "/v1/escrow",
    responses(
        (status = 200, description = "Escrow totals", body = EscrowResponse),
        (status = 500, description = "Escrow does not match open rewards", body = crate::error::ErrorBody),
    ),
    tag = "ledger"
)]
pub(crate) async fn get_escrow(State(state): State<AppState>) -> Result<Json<EscrowResponse>, AppError> {
    let response = state.ledger.read(|ledger| {
        let escrow = ledger.verify_escrow()?;
        Ok::<_, bounty_ledger::LedgerError>(EscrowResponse {
            ledger: ledger.ledger_id().to_string(),
            escrow_balance: escrow.to_string(),
            vault_balance: ledger.treasury().vault_balance().to_string(),
            bounty_count: ledger.bounty_count(),
            open_bounties: ledger.bounties().filter(|(_, b)| b.is_open()).count(),
        })
    })?;
    Ok(Json(response))
}

/// GET /v1/events: Event journal.
#[utoipa::path(
    get,
    path = "/v1/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "Events with sequence >= since", body = EventsResponse),
        (status = 400, description = "Malformed query", body = crate::error::ErrorBody),
    ),
    tag = "ledger"
)]
pub(crate) async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, AppError> {
    let since = extract_query(query)?.since.unwrap_or(0);
    let response = state.ledger.read(|ledger| EventsResponse {
        ledger: ledger.ledger_id().to_string(),
        next: ledger.events().len() as u64,
        events: ledger.events_since(since).to_vec(),
    });
    Ok(Json(response))
}

/// GET /v1/accounts/{party}: Treasury balance.
#[utoipa::path(
    get,
    path = "/v1/accounts/{party}",
    params(("party" = String, Path, description = "Party identity")),
    responses(
        (status = 200, description = "Balance of the party", body = AccountResponse),
        (status = 422, description = "Malformed party identity", body = crate::error::ErrorBody),
    ),
    tag = "ledger"
)]
pub(crate) async fn get_account(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<AccountResponse>, AppError> {
    let party = PartyId::new(extract_path(path)?)?;
    let balance = state.ledger.read(|ledger| ledger.treasury().balance_of(&party));
    Ok(Json(AccountResponse {
        party: party.to_string(),
        balance: balance.to_string(),
    }))
}
