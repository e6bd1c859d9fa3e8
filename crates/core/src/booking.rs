//! # Booking Service
//!
//! [`SlotBook`] ties one booking domain's store to the party resolver, the
//! clock and the slot policy. It saves [`SlotRequest`]s and runs the
//! claim/cancel state machine:
//!
//! ```text
//! Unclaimed --claim--> Claimed --cancel--> Unclaimed
//! ```
//!
//! Both transitions are refused once the slot's start time has passed.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    builder::{self, SlotRequest},
    clock::Clock,
    errors::{BookingError, BookingResult},
    models::slot::{PartyRef, Saved, Slot, SlotDomain},
    policy::SlotPolicy,
    store::{PartyResolver, SlotStore},
};

#[derive(Clone)]
pub struct SlotBook {
    pub(crate) domain: SlotDomain,
    pub(crate) store: Arc<dyn SlotStore>,
    pub(crate) resolver: Arc<dyn PartyResolver>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) policy: SlotPolicy,
}

impl SlotBook {
    pub fn new(
        domain: SlotDomain,
        store: Arc<dyn SlotStore>,
        resolver: Arc<dyn PartyResolver>,
        clock: Arc<dyn Clock>,
        policy: SlotPolicy,
    ) -> Self {
        Self {
            domain,
            store,
            resolver,
            clock,
            policy,
        }
    }

    /// Validates the request and writes its slots in one atomic batch.
    pub async fn save(&self, request: &SlotRequest) -> BookingResult<Saved> {
        let plan = builder::validate(
            request,
            self.domain,
            &self.policy,
            self.resolver.as_ref(),
            self.store.as_ref(),
        )
        .await?;

        let batch = plan.batch;
        let mut slots = self.store.insert_batch(plan.slots).await?;

        info!(
            domain = %self.domain,
            owner = ?request.owner_ref().map(ToString::to_string),
            created = slots.len(),
            "Created slots"
        );

        if batch {
            Ok(Saved::Batch(slots))
        } else {
            slots
                .pop()
                .map(Saved::Single)
                .ok_or_else(|| BookingError::Store(eyre::eyre!("store returned no slot")))
        }
    }

    /// Books `slot` for `claimant`.
    pub async fn claim(&self, slot: &Slot, claimant: &PartyRef) -> BookingResult<Slot> {
        if slot.is_expired(self.clock.now()) {
            return Err(BookingError::Expired(self.domain));
        }
        if slot.is_claimed() {
            return Err(BookingError::AlreadyClaimed(self.domain));
        }

        let updated = self
            .store
            .update_claimant(slot.id, None, Some(claimant.clone()))
            .await?
            // Someone else got there between our read and the write.
            .ok_or(BookingError::AlreadyClaimed(self.domain))?;

        info!(domain = %self.domain, slot = %slot.id, claimant = %claimant, "Slot claimed");
        Ok(updated)
    }

    /// Releases `slot`; only the party holding it may do so.
    pub async fn cancel(&self, slot: &Slot, claimant: &PartyRef) -> BookingResult<Slot> {
        if slot.is_expired(self.clock.now()) {
            return Err(BookingError::Expired(self.domain));
        }
        if slot.claimant.as_ref() != Some(claimant) {
            return Err(BookingError::Unauthorized(self.domain));
        }

        let updated = self
            .store
            .update_claimant(slot.id, Some(claimant.clone()), None)
            .await?
            .ok_or(BookingError::Unauthorized(self.domain))?;

        info!(domain = %self.domain, slot = %slot.id, claimant = %claimant, "Slot released");
        Ok(updated)
    }

    pub async fn claim_by_id(&self, id: Uuid, claimant: &PartyRef) -> BookingResult<Slot> {
        let slot = self.find_slot(id).await?;
        self.claim(&slot, claimant).await
    }

    pub async fn cancel_by_id(&self, id: Uuid, claimant: &PartyRef) -> BookingResult<Slot> {
        let slot = self.find_slot(id).await?;
        self.cancel(&slot, claimant).await
    }
}
