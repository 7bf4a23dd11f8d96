//! Bounty lifecycle routes

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use bounties_registry::{Amount, Bounty, BountyError, BountyId, FulfillmentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, middleware::Caller, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(issue))
        .route("/:id", get(show))
        .route("/:id/fulfillment", post(fulfill))
        .route("/:id/fulfillment/:fulfillment_id/accept", post(accept))
        .route("/:id/cancel", post(cancel))
}

#[derive(Debug, Deserialize)]
pub struct IssueBody {
    /// Task description
    pub data: String,
    pub deadline: DateTime<Utc>,
    /// Signed so that negative values are reported as an invalid amount
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueResponse {
    pub bounty_id: BountyId,
}

/// Open a new bounty funded by the caller
pub async fn issue(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(payload): Json<IssueBody>,
) -> Result<Json<IssueResponse>, ApiError> {
    let amount = Amount::try_from(payload.amount).map_err(|_| BountyError::InvalidAmount)?;

    let bounty_id = state
        .registry
        .write()
        .await
        .issue(&caller, payload.data, payload.deadline, amount)?;

    Ok(Json(IssueResponse { bounty_id }))
}

#[derive(Debug, Deserialize)]
pub struct FulfillBody {
    /// Submission, e.g. a link to the completed work
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FulfillResponse {
    pub bounty_id: BountyId,
    pub fulfillment_id: FulfillmentId,
}

pub async fn fulfill(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(bounty_id): Path<BountyId>,
    Json(payload): Json<FulfillBody>,
) -> Result<Json<FulfillResponse>, ApiError> {
    let fulfillment_id = state
        .registry
        .write()
        .await
        .fulfill(&caller, bounty_id, payload.data)?;

    Ok(Json(FulfillResponse {
        bounty_id,
        fulfillment_id,
    }))
}

pub async fn accept(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((bounty_id, fulfillment_id)): Path<(BountyId, FulfillmentId)>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .write()
        .await
        .accept_fulfillment(&caller, bounty_id, fulfillment_id)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn cancel(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(bounty_id): Path<BountyId>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .write()
        .await
        .cancel_bounty(&caller, bounty_id)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn show(
    State(state): State<AppState>,
    Path(bounty_id): Path<BountyId>,
) -> Result<Json<Bounty>, ApiError> {
    let registry = state.registry.read().await;
    let bounty = registry.bounty(bounty_id)?;
    Ok(Json(bounty.clone()))
}

/// All bounties ever issued, closed ones included
pub async fn list(State(state): State<AppState>) -> Json<Vec<Bounty>> {
    let registry = state.registry.read().await;
    Json(registry.bounties().cloned().collect())
}
