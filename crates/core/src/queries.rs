//! Read-only views over a domain's slots, from the owner's or the claimant's side.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    booking::SlotBook,
    errors::{BookingError, BookingResult},
    models::slot::{ClaimantFilter, PartyRef, Slot, SlotQuery, format_time},
};

impl SlotBook {
    pub async fn find_slot(&self, id: Uuid) -> BookingResult<Slot> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("{} {} not found", self.domain.title(), id)))
    }

    /// Every slot the owner offers.
    pub async fn owner_slots(&self, owner: &PartyRef) -> BookingResult<Vec<Slot>> {
        self.store.query(&SlotQuery::for_owner(owner)).await
    }

    /// Unclaimed slots that have not started yet.
    pub async fn available_slots(&self, owner: &PartyRef) -> BookingResult<Vec<Slot>> {
        let query = SlotQuery::for_owner(owner)
            .claimant(ClaimantFilter::Unclaimed)
            .start_after(self.clock.now());
        self.store.query(&query).await
    }

    /// Claimed slots, past ones included.
    pub async fn booked_slots(&self, owner: &PartyRef) -> BookingResult<Vec<Slot>> {
        let query = SlotQuery::for_owner(owner).claimant(ClaimantFilter::Claimed);
        self.store.query(&query).await
    }

    pub async fn upcoming_booked_slots(&self, owner: &PartyRef) -> BookingResult<Vec<Slot>> {
        let query = SlotQuery::for_owner(owner)
            .claimant(ClaimantFilter::Claimed)
            .start_after(self.clock.now());
        self.store.query(&query).await
    }

    pub async fn slots_by_date(&self, owner: &PartyRef, date: NaiveDate) -> BookingResult<Vec<Slot>> {
        self.store.query(&SlotQuery::for_owner(owner).on_date(date)).await
    }

    /// The first slot starting exactly at `start`.
    pub async fn find_slot_by_date(
        &self,
        owner: &PartyRef,
        start: NaiveDateTime,
    ) -> BookingResult<Slot> {
        let query = SlotQuery::for_owner(owner).start_at(start).limit(1);
        self.store
            .query(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "No {} of {} starts at {}",
                    self.domain.noun(),
                    owner,
                    format_time(&start)
                ))
            })
    }

    /// Every slot the claimant holds, past ones included.
    pub async fn claimant_slots(&self, claimant: &PartyRef) -> BookingResult<Vec<Slot>> {
        self.store.query(&SlotQuery::for_claimant(claimant)).await
    }

    pub async fn upcoming_claimant_slots(&self, claimant: &PartyRef) -> BookingResult<Vec<Slot>> {
        let query = SlotQuery::for_claimant(claimant).start_after(self.clock.now());
        self.store.query(&query).await
    }
}
