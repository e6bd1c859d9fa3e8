//! # Party Views
//!
//! Read-only slot listings from the owner's and the claimant's point of view.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use slotbook_core::{
    errors::{BookingError, Failure, Field, ValidationErrors},
    models::{
        requests::{SlotListResponse, SlotResponse},
        slot::{PartyRef, SlotDomain, parse_time},
    },
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerView {
    #[default]
    All,
    Available,
    Booked,
    Upcoming,
}

/// Query parameters for the owner listing
///
/// * `view` - which projection to return (default: all)
/// * `date` - restrict the view to slots starting on this day (`YYYY-MM-DD`)
#[derive(Debug, Deserialize)]
pub struct OwnerSlotsQuery {
    #[serde(default)]
    pub view: OwnerView,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SlotAtQuery {
    pub start_time: String,
}

#[derive(Debug, Deserialize)]
pub struct ClaimantSlotsQuery {
    #[serde(default)]
    pub upcoming: bool,
}

/// `GET /api/:domain/owners/:kind/:id/slots`
#[axum::debug_handler]
pub async fn owner_slots(
    State(state): State<Arc<ApiState>>,
    Path((domain, kind, id)): Path<(SlotDomain, String, i64)>,
    Query(query): Query<OwnerSlotsQuery>,
) -> Result<Json<SlotListResponse>, AppError> {
    let book = state.book(domain);
    let owner = PartyRef::new(kind, id);

    let mut slots = match (query.view, query.date) {
        (OwnerView::All, Some(date)) => book.slots_by_date(&owner, date).await?,
        (OwnerView::All, None) => book.owner_slots(&owner).await?,
        (OwnerView::Available, _) => book.available_slots(&owner).await?,
        (OwnerView::Booked, _) => book.booked_slots(&owner).await?,
        (OwnerView::Upcoming, _) => book.upcoming_booked_slots(&owner).await?,
    };
    if let Some(date) = query.date {
        slots.retain(|slot| slot.start_time.date() == date);
    }

    Ok(Json(slots.into()))
}

/// `GET /api/:domain/owners/:kind/:id/slots/at?start_time=YYYY-MM-DD HH:MM`
#[axum::debug_handler]
pub async fn owner_slot_at(
    State(state): State<Arc<ApiState>>,
    Path((domain, kind, id)): Path<(SlotDomain, String, i64)>,
    Query(query): Query<SlotAtQuery>,
) -> Result<Json<SlotResponse>, AppError> {
    let start = parse_time(&query.start_time).ok_or_else(|| {
        BookingError::Validation(ValidationErrors::single(Field::StartTime, Failure::InvalidFormat))
    })?;

    let slot = state
        .book(domain)
        .find_slot_by_date(&PartyRef::new(kind, id), start)
        .await?;

    Ok(Json(slot.into()))
}

/// `GET /api/:domain/claimants/:kind/:id/slots`
#[axum::debug_handler]
pub async fn claimant_slots(
    State(state): State<Arc<ApiState>>,
    Path((domain, kind, id)): Path<(SlotDomain, String, i64)>,
    Query(query): Query<ClaimantSlotsQuery>,
) -> Result<Json<SlotListResponse>, AppError> {
    let book = state.book(domain);
    let claimant = PartyRef::new(kind, id);

    let slots = if query.upcoming {
        book.upcoming_claimant_slots(&claimant).await?
    } else {
        book.claimant_slots(&claimant).await?
    };

    Ok(Json(slots.into()))
}
