#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDateTime;
use slotbook_core::{
    FixedClock, SlotBook, SlotPolicy,
    memory::{MemoryPartyResolver, MemorySlotStore},
    models::slot::{PartyRef, SlotDomain, parse_time},
    store::PartyRegistry,
};

pub fn at(value: &str) -> NaiveDateTime {
    parse_time(value).expect("test timestamp")
}

pub fn agent() -> PartyRef {
    PartyRef::new("agent", 1)
}

pub fn other_agent() -> PartyRef {
    PartyRef::new("agent", 2)
}

pub fn client() -> PartyRef {
    PartyRef::new("client", 10)
}

pub fn other_client() -> PartyRef {
    PartyRef::new("client", 11)
}

pub struct Fixture {
    pub book: SlotBook,
    pub store: Arc<MemorySlotStore>,
    pub clock: Arc<FixedClock>,
}

/// A slot book over empty in-memory storage, with the clock at 2025-01-01 08:00.
pub fn fixture(policy: SlotPolicy) -> Fixture {
    fixture_in(SlotDomain::Appointments, policy)
}

pub fn fixture_in(domain: SlotDomain, policy: SlotPolicy) -> Fixture {
    let clock = Arc::new(FixedClock::new(at("2025-01-01 08:00")));
    let store = Arc::new(
        MemorySlotStore::new(domain)
            .with_clock(clock.clone())
            .unique_start(!policy.allow_duplicate_start_time),
    );
    let registry = PartyRegistry::new()
        .register("agent", "agents")
        .register("client", "clients");
    let resolver = MemoryPartyResolver::new(registry)
        .with(agent())
        .with(other_agent())
        .with(client())
        .with(other_client());
    let book = SlotBook::new(
        domain,
        store.clone(),
        Arc::new(resolver),
        clock.clone(),
        policy,
    );
    Fixture { book, store, clock }
}
