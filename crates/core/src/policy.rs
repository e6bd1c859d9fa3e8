//! # Slot Policy
//!
//! The two switches that govern conflict checks when slots are created.
//!
//! - `SLOT_ALLOW_DUPLICATE_START_TIME`: allow two slots of one owner to start at
//!   the same minute (default: false)
//! - `SLOT_CHECK_OVERLAP`: reject slots starting inside an existing slot of the
//!   same owner (default: true)
//!
//! The switches are independent. A duplicate start is also inside the existing
//! slot's interval, so it stays rejected while overlap checking is on.

use std::env;

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPolicy {
    pub allow_duplicate_start_time: bool,
    pub check_overlap: bool,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            allow_duplicate_start_time: false,
            check_overlap: true,
        }
    }
}

impl SlotPolicy {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            allow_duplicate_start_time: env_flag(
                "SLOT_ALLOW_DUPLICATE_START_TIME",
                defaults.allow_duplicate_start_time,
            )?,
            check_overlap: env_flag("SLOT_CHECK_OVERLAP", defaults.check_overlap)?,
        })
    }

    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicate_start_time = allow;
        self
    }

    pub fn check_overlap(mut self, check: bool) -> Self {
        self.check_overlap = check;
        self
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(&value).ok_or_else(|| eyre!("Invalid {} value: {}", name, value)),
        Err(_) => Ok(default),
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
