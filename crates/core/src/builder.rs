//! # Slot Builder
//!
//! A [`SlotRequest`] is an immutable value; every setter returns a new request.
//! Saving it happens in two phases:
//!
//! 1. **Plan**: [`check_fields`] validates the request shape and
//!    [`generate_batch`] derives the candidate intervals. Both are pure.
//! 2. **Check and apply**: [`validate`] resolves parties and runs the
//!    duplicate/overlap checks against the store for every candidate, then the
//!    caller writes the whole plan with one `insert_batch`.
//!
//! Validation never stops at the first failure: every broken rule ends up in
//! the returned [`ValidationErrors`].

use chrono::{Duration, NaiveDateTime};
use tracing::warn;

use crate::{
    checker,
    errors::{BookingResult, Failure, Field, ValidationErrors},
    models::{
        requests::CreateSlotsRequest,
        slot::{NewSlot, PartyRef, SlotDomain, parse_time},
    },
    policy::SlotPolicy,
    store::{PartyResolver, SlotStore},
};

/// Upper bound on `count` for one batch request. Every generated slot costs
/// two store lookups during validation.
pub const MAX_BATCH_COUNT: i64 = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotRequest {
    owner: Option<PartyRef>,
    claimant: Option<PartyRef>,
    start_time: Option<String>,
    end_time: Option<String>,
    duration: Option<i64>,
    count: Option<i64>,
    note: Option<String>,
}

impl SlotRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner: PartyRef) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn claimant(mut self, claimant: Option<PartyRef>) -> Self {
        self.claimant = claimant;
        self
    }

    pub fn start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    pub fn end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    pub fn duration(mut self, minutes: Option<i64>) -> Self {
        self.duration = minutes;
        self
    }

    pub fn count(mut self, count: Option<i64>) -> Self {
        self.count = count;
        self
    }

    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    pub fn owner_ref(&self) -> Option<&PartyRef> {
        self.owner.as_ref()
    }

    /// Batch mode is selected by the presence of both `duration` and `count`.
    pub fn is_batch(&self) -> bool {
        self.duration.is_some() && self.count.is_some()
    }
}

impl From<CreateSlotsRequest> for SlotRequest {
    fn from(request: CreateSlotsRequest) -> Self {
        Self {
            owner: request.owner,
            claimant: request.claimant,
            start_time: request.start_time,
            end_time: request.end_time,
            duration: request.duration,
            count: request.count,
            note: request.note,
        }
    }
}

/// The request after its fields parsed; `None` where a field was absent or broken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub duration: Option<i64>,
    pub count: Option<i64>,
}

/// Shape checks that need neither the store nor the resolver.
pub fn check_fields(request: &SlotRequest) -> (ParsedFields, ValidationErrors) {
    let mut errors = ValidationErrors::new();
    let mut parsed = ParsedFields::default();

    if request.owner.is_none() {
        errors.add(Field::Owner, Failure::Required);
    }

    match request.start_time.as_deref().map(str::trim) {
        None | Some("") => errors.add(Field::StartTime, Failure::Required),
        Some(value) => match parse_time(value) {
            Some(start) => parsed.start = Some(start),
            None => errors.add(Field::StartTime, Failure::InvalidFormat),
        },
    }

    match request.end_time.as_deref().map(str::trim) {
        None | Some("") => {
            if !request.is_batch() {
                errors.add(Field::EndTime, Failure::Required);
            }
        }
        Some(value) => match parse_time(value) {
            Some(end) => parsed.end = Some(end),
            None => errors.add(Field::EndTime, Failure::InvalidFormat),
        },
    }

    if let (Some(start), Some(end)) = (parsed.start, parsed.end) {
        if start >= end {
            errors.add(Field::StartTime, Failure::MustPrecedeEnd);
        }
    }

    match (request.duration, request.count) {
        (Some(_), None) => errors.add(Field::Count, Failure::RequiredWith { other: Field::Duration }),
        (None, Some(_)) => errors.add(Field::Duration, Failure::RequiredWith { other: Field::Count }),
        _ => {}
    }
    if let Some(duration) = request.duration {
        if duration < 1 {
            errors.add(Field::Duration, Failure::MustBePositive);
        } else {
            parsed.duration = Some(duration);
        }
    }
    if let Some(count) = request.count {
        if count < 1 {
            errors.add(Field::Count, Failure::MustBePositive);
        } else if count > MAX_BATCH_COUNT {
            errors.add(Field::Count, Failure::TooLarge { max: MAX_BATCH_COUNT });
        } else {
            parsed.count = Some(count);
        }
    }

    (parsed, errors)
}

/// Contiguous intervals: interval `i` starts where interval `i - 1` ends and
/// lasts `duration` minutes. `None` if `count` exceeds [`MAX_BATCH_COUNT`] or
/// the last end is not representable.
pub fn generate_batch(
    start: NaiveDateTime,
    duration: i64,
    count: i64,
) -> Option<Vec<(NaiveDateTime, NaiveDateTime)>> {
    if !(0..=MAX_BATCH_COUNT).contains(&count) {
        return None;
    }
    let step = Duration::try_minutes(duration)?;
    let len = usize::try_from(count).ok()?;
    let mut intervals = Vec::with_capacity(len);
    let mut current = start;
    for _ in 0..len {
        let end = current.checked_add_signed(step)?;
        intervals.push((current, end));
        current = end;
    }
    Some(intervals)
}

/// A validated set of slots ready to be written in one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPlan {
    pub batch: bool,
    pub slots: Vec<NewSlot>,
}

fn build_plan(
    request: &SlotRequest,
    parsed: &ParsedFields,
    errors: &mut ValidationErrors,
) -> Option<SlotPlan> {
    let owner = request.owner.clone()?;
    let start = parsed.start?;
    let new_slot = |start_time, end_time| NewSlot {
        owner: owner.clone(),
        claimant: request.claimant.clone(),
        start_time,
        end_time,
        note: request.note.clone(),
    };

    if request.is_batch() {
        let (duration, count) = (parsed.duration?, parsed.count?);
        match generate_batch(start, duration, count) {
            Some(intervals) => Some(SlotPlan {
                batch: true,
                slots: intervals
                    .into_iter()
                    .map(|(start_time, end_time)| new_slot(start_time, end_time))
                    .collect(),
            }),
            None => {
                errors.add(Field::Duration, Failure::OutOfRange);
                None
            }
        }
    } else {
        let end = parsed.end?;
        (start < end).then(|| SlotPlan {
            batch: false,
            slots: vec![new_slot(start, end)],
        })
    }
}

async fn check_party(
    resolver: &dyn PartyResolver,
    field: Field,
    party: &PartyRef,
    errors: &mut ValidationErrors,
) -> BookingResult<bool> {
    if !resolver.is_registered(&party.kind) {
        errors.add(
            field,
            Failure::UnknownKind {
                kind: party.kind.clone(),
            },
        );
        return Ok(false);
    }
    if !resolver.exists(party).await? {
        errors.add(field, Failure::PartyNotFound);
        return Ok(false);
    }
    Ok(true)
}

/// Runs every rule against the request and returns the plan to persist.
///
/// Conflict checks cover every candidate start of a batch, not only the first,
/// so a batch cannot slide over a slot that already exists at position 2..n.
pub async fn validate(
    request: &SlotRequest,
    domain: SlotDomain,
    policy: &SlotPolicy,
    resolver: &dyn PartyResolver,
    store: &dyn SlotStore,
) -> BookingResult<SlotPlan> {
    let (parsed, mut errors) = check_fields(request);

    let owner_ok = match &request.owner {
        Some(owner) => check_party(resolver, Field::Owner, owner, &mut errors).await?,
        None => false,
    };
    if let Some(claimant) = &request.claimant {
        check_party(resolver, Field::Claimant, claimant, &mut errors).await?;
    }

    let plan = build_plan(request, &parsed, &mut errors);

    if let (true, Some(owner), Some(start)) = (owner_ok, &request.owner, parsed.start) {
        let candidates: Vec<NaiveDateTime> = match &plan {
            Some(plan) => plan.slots.iter().map(|s| s.start_time).collect(),
            None => vec![start],
        };
        let claimant = request.claimant.as_ref();
        for candidate in candidates {
            if !policy.allow_duplicate_start_time
                && checker::exists_duplicate(store, owner, claimant, candidate).await?
            {
                errors.add(Field::StartTime, Failure::DuplicateStartTime { domain });
            }
            if policy.check_overlap
                && checker::exists_overlap(store, owner, claimant, candidate).await?
            {
                errors.add(Field::StartTime, Failure::Overlap { domain });
            }
        }
    }

    if !errors.is_empty() {
        warn!(
            domain = %domain,
            failures = errors.len(),
            "Rejected slot request: {}",
            errors
        );
        return Err(errors.into());
    }

    // Every rule passed, so the plan exists.
    plan.ok_or_else(|| ValidationErrors::single(Field::StartTime, Failure::Required).into())
}
