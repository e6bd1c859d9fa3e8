use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use slotbook_core::{
    SlotPolicy,
    models::{
        requests::{CreateSlotsResponse, SlotResponse},
        slot::SlotState,
    },
};

use crate::test_utils::{TestContext, agent, client, other_client, party_json};

#[tokio::test]
async fn test_create_single_slot() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments/slots")
        .json(&json!({
            "owner": party_json(&agent()),
            "start_time": "2025-01-02 09:00",
            "end_time": "2025-01-02 10:00",
            "note": "intro call",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: CreateSlotsResponse = response.json();
    assert_eq!(body.slots.len(), 1);
    let slot = &body.slots[0];
    assert_eq!(slot.owner, agent());
    assert_eq!(slot.claimant, None);
    assert_eq!(slot.state, SlotState::Unclaimed);
    assert_eq!(slot.start_time, "2025-01-02 09:00");
    assert_eq!(slot.end_time, "2025-01-02 10:00");
    assert_eq!(slot.note.as_deref(), Some("intro call"));
}

#[tokio::test]
async fn test_create_batch_slots() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/reservations/slots")
        .json(&json!({
            "owner": party_json(&agent()),
            "start_time": "2025-01-02 09:00",
            "duration": 30,
            "count": 3,
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: CreateSlotsResponse = response.json();
    let starts: Vec<&str> = body.slots.iter().map(|s| s.start_time.as_str()).collect();
    assert_eq!(starts, vec!["2025-01-02 09:00", "2025-01-02 09:30", "2025-01-02 10:00"]);
    assert_eq!(body.slots[2].end_time, "2025-01-02 10:30");
}

#[tokio::test]
async fn test_create_reports_every_failing_field() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments/slots")
        .json(&json!({
            "start_time": "tomorrow",
            "end_time": "2025-01-02 10:00",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert!(fields.contains(&"owner"));
    assert!(fields.contains(&"start_time"));
}

#[tokio::test]
async fn test_create_overlap_uses_domain_wording() {
    let ctx = TestContext::new();
    ctx.create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;

    let response = ctx
        .server
        .post("/api/appointments/slots")
        .json(&json!({
            "owner": party_json(&agent()),
            "start_time": "2025-01-02 09:30",
            "end_time": "2025-01-02 10:30",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(
        body["fields"][0]["message"],
        "This appointment conflicts with an existing appointment time."
    );
}

#[tokio::test]
async fn test_duplicates_allowed_without_overlap_check() {
    let ctx = TestContext::with_policy(
        SlotPolicy::default()
            .allow_duplicates(true)
            .check_overlap(false),
    );
    ctx.create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;

    let response = ctx
        .server
        .post("/api/appointments/slots")
        .json(&json!({
            "owner": party_json(&agent()),
            "start_time": "2025-01-02 09:00",
            "end_time": "2025-01-02 09:45",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_get_slot() {
    let ctx = TestContext::new();
    let id = ctx
        .create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;

    let response = ctx.server.get(&format!("/api/appointments/slots/{id}")).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let slot: SlotResponse = response.json();
    assert_eq!(slot.id.to_string(), id);
}

#[rstest]
#[case::wrong_domain("/api/reservations/slots/{id}")]
#[case::unknown_id("/api/appointments/slots/00000000-0000-4000-8000-000000000000")]
#[tokio::test]
async fn test_get_slot_not_found(#[case] path: &str) {
    let ctx = TestContext::new();
    let id = ctx
        .create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;

    let response = ctx.server.get(&path.replace("{id}", &id)).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_claim_then_cancel() {
    let ctx = TestContext::new();
    let id = ctx
        .create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;

    let claimed = ctx
        .server
        .post(&format!("/api/appointments/slots/{id}/claim"))
        .json(&json!({ "claimant": party_json(&client()) }))
        .await;
    assert_eq!(claimed.status_code(), StatusCode::OK);
    let slot: SlotResponse = claimed.json();
    assert_eq!(slot.claimant, Some(client()));
    assert_eq!(slot.state, SlotState::Claimed);

    let cancelled = ctx
        .server
        .post(&format!("/api/appointments/slots/{id}/cancel"))
        .json(&json!({ "claimant": party_json(&client()) }))
        .await;
    assert_eq!(cancelled.status_code(), StatusCode::OK);
    let slot: SlotResponse = cancelled.json();
    assert_eq!(slot.claimant, None);
    assert_eq!(slot.state, SlotState::Unclaimed);
}

#[tokio::test]
async fn test_claim_taken_slot_conflicts() {
    let ctx = TestContext::new();
    let id = ctx
        .create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;
    ctx.server
        .post(&format!("/api/appointments/slots/{id}/claim"))
        .json(&json!({ "claimant": party_json(&client()) }))
        .await;

    let response = ctx
        .server
        .post(&format!("/api/appointments/slots/{id}/claim"))
        .json(&json!({ "claimant": party_json(&other_client()) }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "Appointment is already booked by another client.");
}

#[tokio::test]
async fn test_cancel_by_other_claimant_is_forbidden() {
    let ctx = TestContext::new();
    let id = ctx
        .create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;
    ctx.server
        .post(&format!("/api/appointments/slots/{id}/claim"))
        .json(&json!({ "claimant": party_json(&client()) }))
        .await;

    let response = ctx
        .server
        .post(&format!("/api/appointments/slots/{id}/cancel"))
        .json(&json!({ "claimant": party_json(&other_client()) }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_claim_after_start_is_rejected() {
    let ctx = TestContext::new();
    let id = ctx
        .create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;
    ctx.clock.set(crate::test_utils::at("2025-01-02 09:01"));

    let response = ctx
        .server
        .post(&format!("/api/appointments/slots/{id}/claim"))
        .json(&json!({ "claimant": party_json(&client()) }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Appointments in the past cannot be booked or cancelled."
    );
}

#[tokio::test]
async fn test_create_batch_over_limit_is_unprocessable() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments/slots")
        .json(&json!({
            "owner": party_json(&agent()),
            "start_time": "2025-01-02 09:00",
            "duration": 1,
            "count": 1_000_000_000_000_i64,
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["fields"][0]["field"], "count");
    assert_eq!(body["fields"][0]["failure"]["rule"], "too_large");
    assert_eq!(body["fields"][0]["message"], "The count must not exceed 500.");
}
