//! In-process store and resolver, for tests and embedders without a database.

use std::{
    collections::HashSet,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use eyre::eyre;
use uuid::Uuid;

use crate::{
    clock::{Clock, SystemClock},
    errors::{BookingError, BookingResult, Failure, Field, ValidationErrors},
    models::slot::{NewSlot, PartyRef, Slot, SlotDomain, SlotQuery},
    store::{PartyRegistry, PartyResolver, SlotStore},
};

pub struct MemorySlotStore {
    domain: SlotDomain,
    clock: Arc<dyn Clock>,
    unique_start: bool,
    slots: RwLock<Vec<Slot>>,
}

impl MemorySlotStore {
    pub fn new(domain: SlotDomain) -> Self {
        Self {
            domain,
            clock: Arc::new(SystemClock),
            unique_start: true,
            slots: RwLock::new(Vec::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Mirrors the `(owner, start_time)` unique index of the SQL schema.
    pub fn unique_start(mut self, unique: bool) -> Self {
        self.unique_start = unique;
        self
    }

    pub fn len(&self) -> usize {
        self.slots.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> BookingError {
    BookingError::Store(eyre!("slot store lock poisoned"))
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn insert_batch(&self, slots: Vec<NewSlot>) -> BookingResult<Vec<Slot>> {
        let mut stored = self.slots.write().map_err(poisoned)?;

        if self.unique_start {
            let mut seen: HashSet<(&PartyRef, _)> = stored
                .iter()
                .map(|s| (&s.owner, s.start_time))
                .collect();
            for slot in &slots {
                if !seen.insert((&slot.owner, slot.start_time)) {
                    return Err(ValidationErrors::single(
                        Field::StartTime,
                        Failure::DuplicateStartTime {
                            domain: self.domain,
                        },
                    )
                    .into());
                }
            }
        }

        let now = self.clock.now();
        let created: Vec<Slot> = slots
            .into_iter()
            .map(|slot| Slot {
                id: Uuid::new_v4(),
                owner: slot.owner,
                claimant: slot.claimant,
                start_time: slot.start_time,
                end_time: slot.end_time,
                note: slot.note,
                created_at: now,
                updated_at: now,
            })
            .collect();
        stored.extend(created.iter().cloned());
        Ok(created)
    }

    async fn query(&self, query: &SlotQuery) -> BookingResult<Vec<Slot>> {
        let stored = self.slots.read().map_err(poisoned)?;
        let mut found: Vec<Slot> = stored.iter().filter(|s| query.matches(s)).cloned().collect();
        found.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        if let Some(limit) = query.limit {
            found.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(found)
    }

    async fn exists(&self, query: &SlotQuery) -> BookingResult<bool> {
        let stored = self.slots.read().map_err(poisoned)?;
        Ok(stored.iter().any(|s| query.matches(s)))
    }

    async fn find(&self, id: Uuid) -> BookingResult<Option<Slot>> {
        let stored = self.slots.read().map_err(poisoned)?;
        Ok(stored.iter().find(|s| s.id == id).cloned())
    }

    async fn update_claimant(
        &self,
        id: Uuid,
        expected: Option<PartyRef>,
        claimant: Option<PartyRef>,
    ) -> BookingResult<Option<Slot>> {
        let mut stored = self.slots.write().map_err(poisoned)?;
        let Some(slot) = stored.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if slot.claimant != expected {
            return Ok(None);
        }
        slot.claimant = claimant;
        slot.updated_at = self.clock.now();
        Ok(Some(slot.clone()))
    }
}

/// Resolver over a fixed set of known parties.
#[derive(Debug, Default)]
pub struct MemoryPartyResolver {
    registry: PartyRegistry,
    parties: RwLock<HashSet<PartyRef>>,
}

impl MemoryPartyResolver {
    pub fn new(registry: PartyRegistry) -> Self {
        Self {
            registry,
            parties: RwLock::new(HashSet::new()),
        }
    }

    pub fn add(&self, party: PartyRef) {
        match self.parties.write() {
            Ok(mut parties) => {
                parties.insert(party);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(party);
            }
        }
    }

    pub fn with(self, party: PartyRef) -> Self {
        self.add(party);
        self
    }
}

#[async_trait]
impl PartyResolver for MemoryPartyResolver {
    fn is_registered(&self, kind: &str) -> bool {
        self.registry.contains(kind)
    }

    async fn exists(&self, party: &PartyRef) -> BookingResult<bool> {
        let parties = self.parties.read().map_err(poisoned)?;
        Ok(parties.contains(party))
    }
}
