use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot::{PartyRef, Slot, SlotState, format_time};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSlotsRequest {
    pub owner: Option<PartyRef>,
    #[serde(default)]
    pub claimant: Option<PartyRef>,
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotsResponse {
    pub slots: Vec<SlotResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub claimant: PartyRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub owner: PartyRef,
    pub claimant: Option<PartyRef>,
    pub state: SlotState,
    pub start_time: String,
    pub end_time: String,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            state: slot.state(),
            start_time: format_time(&slot.start_time),
            end_time: format_time(&slot.end_time),
            owner: slot.owner,
            claimant: slot.claimant,
            note: slot.note,
            created_at: slot.created_at,
            updated_at: slot.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub slots: Vec<SlotResponse>,
}

impl From<Vec<Slot>> for SlotListResponse {
    fn from(slots: Vec<Slot>) -> Self {
        Self {
            slots: slots.into_iter().map(SlotResponse::from).collect(),
        }
    }
}
