//! Read-side conflict predicates used while validating new slots.
//!
//! Neither check locks anything. Two writers can both pass them; the store's
//! unique index on `(owner, start_time)` is the backstop for duplicates.

use chrono::NaiveDateTime;

use crate::{
    errors::BookingResult,
    models::slot::{PartyRef, SlotQuery},
    store::SlotStore,
};

/// True if the owner (and claimant, when given) already has a slot starting at `start`.
pub async fn exists_duplicate(
    store: &dyn SlotStore,
    owner: &PartyRef,
    claimant: Option<&PartyRef>,
    start: NaiveDateTime,
) -> BookingResult<bool> {
    let query = SlotQuery::for_owner(owner)
        .scoped_to(claimant)
        .start_at(start);
    store.exists(&query).await
}

/// True if `candidate_start` falls inside `[start_time, end_time)` of an
/// existing slot of the owner (and claimant, when given).
pub async fn exists_overlap(
    store: &dyn SlotStore,
    owner: &PartyRef,
    claimant: Option<&PartyRef>,
    candidate_start: NaiveDateTime,
) -> BookingResult<bool> {
    let query = SlotQuery::for_owner(owner)
        .scoped_to(claimant)
        .containing(candidate_start);
    store.exists(&query).await
}
