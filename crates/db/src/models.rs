use chrono::NaiveDateTime;
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use slotbook_core::models::slot::{PartyRef, Slot};
use sqlx::FromRow;
use uuid::Uuid;

/// Column list shared by every slot query, in `DbSlot` field order.
pub const SLOT_COLUMNS: &str = "id, owner_type, owner_id, claimant_type, claimant_id, \
     start_time, end_time, note, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub owner_type: String,
    pub owner_id: i64,
    pub claimant_type: Option<String>,
    pub claimant_id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl DbSlot {
    /// Fails on a half-set claimant instead of guessing which column is right.
    pub fn into_slot(self) -> Result<Slot> {
        let claimant = match (self.claimant_type, self.claimant_id) {
            (Some(kind), Some(id)) => Some(PartyRef::new(kind, id)),
            (None, None) => None,
            (kind, id) => {
                return Err(eyre!(
                    "Slot {} has a partial claimant (type={:?}, id={:?})",
                    self.id,
                    kind,
                    id
                ));
            }
        };

        Ok(Slot {
            id: self.id,
            owner: PartyRef::new(self.owner_type, self.owner_id),
            claimant,
            start_time: self.start_time,
            end_time: self.end_time,
            note: self.note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
