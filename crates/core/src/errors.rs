use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::slot::SlotDomain;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{} in the past cannot be booked or cancelled.", .0.plural_title())]
    Expired(SlotDomain),

    #[error("{} is already booked by another {}.", .0.title(), .0.claimant_noun())]
    AlreadyClaimed(SlotDomain),

    #[error("You are not authorized to cancel this {}.", .0.noun())]
    Unauthorized(SlotDomain),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] eyre::Report),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl From<ValidationErrors> for BookingError {
    fn from(errors: ValidationErrors) -> Self {
        BookingError::Validation(errors)
    }
}

/// Slot request fields that validation can fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Owner,
    Claimant,
    StartTime,
    EndTime,
    Duration,
    Count,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Owner => "owner",
            Field::Claimant => "claimant",
            Field::StartTime => "start_time",
            Field::EndTime => "end_time",
            Field::Duration => "duration",
            Field::Count => "count",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Failure {
    Required,
    /// Required because the named field is present.
    RequiredWith { other: Field },
    InvalidFormat,
    UnknownKind { kind: String },
    PartyNotFound,
    MustBePositive,
    MustPrecedeEnd,
    OutOfRange,
    TooLarge { max: i64 },
    DuplicateStartTime { domain: SlotDomain },
    Overlap { domain: SlotDomain },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Required => f.write_str("is required"),
            Failure::RequiredWith { other } => write!(f, "is required when {other} is present"),
            Failure::InvalidFormat => f.write_str("does not match the format YYYY-MM-DD HH:MM"),
            Failure::UnknownKind { kind } => write!(f, "refers to an unregistered party kind '{kind}'"),
            Failure::PartyNotFound => f.write_str("does not exist"),
            Failure::MustBePositive => f.write_str("must be at least 1"),
            Failure::MustPrecedeEnd => f.write_str("must be before end_time"),
            Failure::OutOfRange => f.write_str("is out of the representable time range"),
            Failure::TooLarge { max } => write!(f, "must not exceed {max}"),
            Failure::DuplicateStartTime { domain } => {
                write!(f, "An {} at this time already exists.", domain.noun())
            }
            Failure::Overlap { domain } => write!(
                f,
                "This {} conflicts with an existing {} time.",
                domain.noun(),
                domain.noun()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub failure: Failure,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, failure: Failure) -> Self {
        let message = match &failure {
            Failure::DuplicateStartTime { .. } | Failure::Overlap { .. } => failure.to_string(),
            other => format!("The {field} {other}."),
        };
        Self {
            field,
            failure,
            message,
        }
    }
}

/// Every failing rule of one validation pass, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, failure: Failure) -> Self {
        let mut errors = Self::new();
        errors.add(field, failure);
        errors
    }

    /// Adds a failure; the same (field, failure) pair is recorded once.
    pub fn add(&mut self, field: Field, failure: Failure) {
        let exists = self
            .errors
            .iter()
            .any(|e| e.field == field && e.failure == failure);
        if !exists {
            self.errors.push(FieldError::new(field, failure));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn failures_for(&self, field: Field) -> impl Iterator<Item = &Failure> {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| &e.failure)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}
