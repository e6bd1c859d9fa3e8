use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use slotbook_core::{
    SlotRequest,
    models::{
        requests::{ClaimRequest, CreateSlotsRequest, CreateSlotsResponse, SlotResponse},
        slot::SlotDomain,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// `POST /api/:domain/slots`: one slot, or a batch when `duration` and `count` are set.
#[axum::debug_handler]
pub async fn create_slots(
    State(state): State<Arc<ApiState>>,
    Path(domain): Path<SlotDomain>,
    Json(payload): Json<CreateSlotsRequest>,
) -> Result<(StatusCode, Json<CreateSlotsResponse>), AppError> {
    let request = SlotRequest::from(payload);
    let saved = state.book(domain).save(&request).await?;

    let response = CreateSlotsResponse {
        slots: saved.into_vec().into_iter().map(SlotResponse::from).collect(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    Path((domain, id)): Path<(SlotDomain, Uuid)>,
) -> Result<Json<SlotResponse>, AppError> {
    let slot = state.book(domain).find_slot(id).await?;
    Ok(Json(slot.into()))
}

#[axum::debug_handler]
pub async fn claim_slot(
    State(state): State<Arc<ApiState>>,
    Path((domain, id)): Path<(SlotDomain, Uuid)>,
    Json(payload): Json<ClaimRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    let slot = state.book(domain).claim_by_id(id, &payload.claimant).await?;
    Ok(Json(slot.into()))
}

#[axum::debug_handler]
pub async fn cancel_slot(
    State(state): State<Arc<ApiState>>,
    Path((domain, id)): Path<(SlotDomain, Uuid)>,
    Json(payload): Json<ClaimRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    let slot = state.book(domain).cancel_by_id(id, &payload.claimant).await?;
    Ok(Json(slot.into()))
}
