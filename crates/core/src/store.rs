//! Seams between the booking core and the datastore that hosts it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use eyre::{Result, eyre};
use uuid::Uuid;

use crate::{
    errors::BookingResult,
    models::slot::{NewSlot, PartyRef, Slot, SlotQuery},
};

/// Persistence for the slots of one booking domain.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Writes every slot or none of them, returning them in input order.
    async fn insert_batch(&self, slots: Vec<NewSlot>) -> BookingResult<Vec<Slot>>;

    async fn query(&self, query: &SlotQuery) -> BookingResult<Vec<Slot>>;

    async fn exists(&self, query: &SlotQuery) -> BookingResult<bool>;

    async fn find(&self, id: Uuid) -> BookingResult<Option<Slot>>;

    /// Compare-and-set on the claimant. Returns `None` when the slot is gone
    /// or its current claimant is no longer `expected`.
    async fn update_claimant(
        &self,
        id: Uuid,
        expected: Option<PartyRef>,
        claimant: Option<PartyRef>,
    ) -> BookingResult<Option<Slot>>;
}

/// Answers whether a party reference points at a persisted entity.
#[async_trait]
pub trait PartyResolver: Send + Sync {
    fn is_registered(&self, kind: &str) -> bool;

    async fn exists(&self, party: &PartyRef) -> BookingResult<bool>;
}

/// Lookup table from party kind to the table that holds it, supplied by the
/// host application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyRegistry {
    tables: BTreeMap<String, String>,
}

impl PartyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, kind: impl Into<String>, table: impl Into<String>) -> Self {
        self.tables.insert(kind.into(), table.into());
        self
    }

    /// Parses `kind=table` pairs separated by commas, e.g.
    /// `agent=agents,client=clients`.
    pub fn parse(mapping: &str) -> Result<Self> {
        let mut registry = Self::new();
        for pair in mapping.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (kind, table) = pair
                .split_once('=')
                .ok_or_else(|| eyre!("Invalid party mapping '{}', expected kind=table", pair))?;
            let (kind, table) = (kind.trim(), table.trim());
            if !is_identifier(kind) || !is_identifier(table) {
                return Err(eyre!("Invalid party mapping '{}'", pair));
            }
            registry = registry.register(kind, table);
        }
        Ok(registry)
    }

    pub fn table_for(&self, kind: &str) -> Option<&str> {
        self.tables.get(kind).map(String::as_str)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.tables.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// Table names end up inside SQL text, so only plain identifiers are accepted.
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
