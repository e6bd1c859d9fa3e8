use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire and storage format for slot timestamps (minute precision, no timezone).
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses a `YYYY-MM-DD HH:MM` timestamp.
pub fn parse_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

/// Formats a timestamp the same way [`parse_time`] reads it.
pub fn format_time(value: &NaiveDateTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

/// Reference to a party of any registered kind, e.g. `agent:42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyRef {
    pub kind: String,
    pub id: i64,
}

impl PartyRef {
    pub fn new(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

impl fmt::Display for PartyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// The booking domains a deployment can host. Each one has its own table and
/// its own wording for the offering and claiming parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotDomain {
    Appointments,
    Reservations,
}

impl SlotDomain {
    pub const ALL: [SlotDomain; 2] = [SlotDomain::Appointments, SlotDomain::Reservations];

    pub fn table(&self) -> &'static str {
        match self {
            SlotDomain::Appointments => "appointments",
            SlotDomain::Reservations => "reservations",
        }
    }

    /// Singular noun, lower case ("appointment").
    pub fn noun(&self) -> &'static str {
        match self {
            SlotDomain::Appointments => "appointment",
            SlotDomain::Reservations => "reservation",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SlotDomain::Appointments => "Appointment",
            SlotDomain::Reservations => "Reservation",
        }
    }

    pub fn plural_title(&self) -> &'static str {
        match self {
            SlotDomain::Appointments => "Appointments",
            SlotDomain::Reservations => "Reservations",
        }
    }

    /// What the claiming party is called in this domain.
    pub fn claimant_noun(&self) -> &'static str {
        match self {
            SlotDomain::Appointments => "client",
            SlotDomain::Reservations => "recipient",
        }
    }
}

impl fmt::Display for SlotDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub owner: PartyRef,
    pub claimant: Option<PartyRef>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Slot {
    pub fn is_claimed(&self) -> bool {
        self.claimant.is_some()
    }

    /// A slot expires once its start time has passed.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.start_time < now
    }

    pub fn state(&self) -> SlotState {
        if self.is_claimed() {
            SlotState::Claimed
        } else {
            SlotState::Unclaimed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Unclaimed,
    Claimed,
}

/// A slot that has been planned and validated but not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlot {
    pub owner: PartyRef,
    pub claimant: Option<PartyRef>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub note: Option<String>,
}

/// Result of saving a slot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Single(Slot),
    Batch(Vec<Slot>),
}

impl Saved {
    pub fn into_vec(self) -> Vec<Slot> {
        match self {
            Saved::Single(slot) => vec![slot],
            Saved::Batch(slots) => slots,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Saved::Single(_) => 1,
            Saved::Batch(slots) => slots.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a query constrains the claimant columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClaimantFilter {
    #[default]
    Any,
    Unclaimed,
    Claimed,
    By(PartyRef),
}

impl ClaimantFilter {
    pub fn matches(&self, claimant: Option<&PartyRef>) -> bool {
        match self {
            ClaimantFilter::Any => true,
            ClaimantFilter::Unclaimed => claimant.is_none(),
            ClaimantFilter::Claimed => claimant.is_some(),
            ClaimantFilter::By(party) => claimant == Some(party),
        }
    }
}

/// Filter over the slot store. Every set field narrows the result; results
/// are always ordered by `start_time`, then `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotQuery {
    pub owner: Option<PartyRef>,
    pub claimant: ClaimantFilter,
    /// `start_time > start_after`
    pub start_after: Option<NaiveDateTime>,
    /// `start_time >= start_from`
    pub start_from: Option<NaiveDateTime>,
    /// `start_time < start_before`
    pub start_before: Option<NaiveDateTime>,
    /// `start_time == start_at`
    pub start_at: Option<NaiveDateTime>,
    /// `start_time <= contains < end_time`
    pub contains: Option<NaiveDateTime>,
    pub limit: Option<i64>,
}

impl SlotQuery {
    pub fn for_owner(owner: &PartyRef) -> Self {
        Self {
            owner: Some(owner.clone()),
            ..Self::default()
        }
    }

    pub fn for_claimant(claimant: &PartyRef) -> Self {
        Self {
            claimant: ClaimantFilter::By(claimant.clone()),
            ..Self::default()
        }
    }

    pub fn claimant(mut self, filter: ClaimantFilter) -> Self {
        self.claimant = filter;
        self
    }

    /// Scopes the query to `claimant` when one is given, otherwise leaves it open.
    pub fn scoped_to(self, claimant: Option<&PartyRef>) -> Self {
        match claimant {
            Some(party) => self.claimant(ClaimantFilter::By(party.clone())),
            None => self,
        }
    }

    pub fn start_after(mut self, at: NaiveDateTime) -> Self {
        self.start_after = Some(at);
        self
    }

    pub fn start_at(mut self, at: NaiveDateTime) -> Self {
        self.start_at = Some(at);
        self
    }

    pub fn containing(mut self, at: NaiveDateTime) -> Self {
        self.contains = Some(at);
        self
    }

    /// Restricts to slots starting on `date` (half-open day range).
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        let from = date.and_time(NaiveTime::MIN);
        self.start_from = Some(from);
        self.start_before = date.succ_opt().map(|next| next.and_time(NaiveTime::MIN));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// In-process evaluation of the filter, used by the memory store and
    /// kept in lockstep with the SQL rendering in `slotbook-db`.
    pub fn matches(&self, slot: &Slot) -> bool {
        if let Some(owner) = &self.owner {
            if &slot.owner != owner {
                return false;
            }
        }
        if !self.claimant.matches(slot.claimant.as_ref()) {
            return false;
        }
        if let Some(after) = self.start_after {
            if slot.start_time <= after {
                return false;
            }
        }
        if let Some(from) = self.start_from {
            if slot.start_time < from {
                return false;
            }
        }
        if let Some(before) = self.start_before {
            if slot.start_time >= before {
                return false;
            }
        }
        if let Some(at) = self.start_at {
            if slot.start_time != at {
                return false;
            }
        }
        if let Some(point) = self.contains {
            if !(slot.start_time <= point && point < slot.end_time) {
                return false;
            }
        }
        true
    }
}
