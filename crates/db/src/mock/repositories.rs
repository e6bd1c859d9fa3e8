use async_trait::async_trait;
use mockall::mock;
use slotbook_core::{
    errors::BookingResult,
    models::slot::{NewSlot, PartyRef, Slot, SlotQuery},
    store::{PartyResolver, SlotStore},
};
use uuid::Uuid;

// Mock stores for testing
mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn insert_batch(&self, slots: Vec<NewSlot>) -> BookingResult<Vec<Slot>>;

        async fn query(&self, query: &SlotQuery) -> BookingResult<Vec<Slot>>;

        async fn exists(&self, query: &SlotQuery) -> BookingResult<bool>;

        async fn find(&self, id: Uuid) -> BookingResult<Option<Slot>>;

        async fn update_claimant(
            &self,
            id: Uuid,
            expected: Option<PartyRef>,
            claimant: Option<PartyRef>,
        ) -> BookingResult<Option<Slot>>;
    }
}

mock! {
    pub PartyResolver {}

    #[async_trait]
    impl PartyResolver for PartyResolver {
        fn is_registered(&self, kind: &str) -> bool;

        async fn exists(&self, party: &PartyRef) -> BookingResult<bool>;
    }
}
