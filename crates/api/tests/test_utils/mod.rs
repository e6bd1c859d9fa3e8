#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use chrono::NaiveDateTime;
use serde_json::{Value, json};
use slotbook_api::{ApiState, router};
use slotbook_core::{
    FixedClock, SlotBook, SlotPolicy,
    memory::{MemoryPartyResolver, MemorySlotStore},
    models::slot::{PartyRef, SlotDomain, parse_time},
    store::{PartyRegistry, SlotStore},
};

pub fn at(value: &str) -> NaiveDateTime {
    parse_time(value).expect("test timestamp")
}

pub fn agent() -> PartyRef {
    PartyRef::new("agent", 1)
}

pub fn client() -> PartyRef {
    PartyRef::new("client", 10)
}

pub fn other_client() -> PartyRef {
    PartyRef::new("client", 11)
}

pub fn party_json(party: &PartyRef) -> Value {
    json!({ "kind": party.kind, "id": party.id })
}

pub fn registry() -> PartyRegistry {
    PartyRegistry::new()
        .register("agent", "agents")
        .register("client", "clients")
}

pub fn resolver() -> MemoryPartyResolver {
    MemoryPartyResolver::new(registry())
        .with(agent())
        .with(client())
        .with(other_client())
}

pub struct TestContext {
    pub server: TestServer,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    /// Both domains over empty in-memory storage, clock at 2025-01-01 08:00.
    pub fn new() -> Self {
        Self::with_policy(SlotPolicy::default())
    }

    pub fn with_policy(policy: SlotPolicy) -> Self {
        let clock = Arc::new(FixedClock::new(at("2025-01-01 08:00")));
        let store = |domain| -> Arc<dyn SlotStore> {
            Arc::new(
                MemorySlotStore::new(domain)
                    .with_clock(clock.clone())
                    .unique_start(!policy.allow_duplicate_start_time),
            )
        };
        let appointments = store(SlotDomain::Appointments);
        let reservations = store(SlotDomain::Reservations);
        Self::build(appointments, reservations, clock, policy)
    }

    /// Serves the appointments domain from `store`.
    pub fn with_store(store: Arc<dyn SlotStore>) -> Self {
        let clock = Arc::new(FixedClock::new(at("2025-01-01 08:00")));
        let reservations = Arc::new(MemorySlotStore::new(SlotDomain::Reservations));
        Self::build(store, reservations, clock, SlotPolicy::default())
    }

    fn build(
        appointments: Arc<dyn SlotStore>,
        reservations: Arc<dyn SlotStore>,
        clock: Arc<FixedClock>,
        policy: SlotPolicy,
    ) -> Self {
        let resolver = Arc::new(resolver());
        let state = Arc::new(ApiState {
            appointments: SlotBook::new(
                SlotDomain::Appointments,
                appointments,
                resolver.clone(),
                clock.clone(),
                policy,
            ),
            reservations: SlotBook::new(
                SlotDomain::Reservations,
                reservations,
                resolver,
                clock.clone(),
                policy,
            ),
        });
        let server = TestServer::new(router(state)).expect("test server");
        Self { server, clock }
    }

    /// Creates one appointment for agent:1 and returns its id.
    pub async fn create_appointment(&self, start: &str, end: &str) -> String {
        let response = self
            .server
            .post("/api/appointments/slots")
            .json(&json!({
                "owner": party_json(&agent()),
                "start_time": start,
                "end_time": end,
            }))
            .await;
        let body: Value = response.json();
        body["slots"][0]["id"]
            .as_str()
            .expect("created slot id")
            .to_string()
    }
}
