use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use slotbook_core::models::requests::{SlotListResponse, SlotResponse};

use crate::test_utils::{TestContext, at, client, party_json};

/// Three appointments for agent:1 on 2025-01-02/03, the 09:00 one claimed by client:10.
async fn seeded() -> TestContext {
    let ctx = TestContext::new();
    let booked = ctx
        .create_appointment("2025-01-02 09:00", "2025-01-02 10:00")
        .await;
    ctx.create_appointment("2025-01-02 11:00", "2025-01-02 12:00")
        .await;
    ctx.create_appointment("2025-01-03 09:00", "2025-01-03 10:00")
        .await;
    ctx.server
        .post(&format!("/api/appointments/slots/{booked}/claim"))
        .json(&json!({ "claimant": party_json(&client()) }))
        .await;
    ctx
}

fn starts(list: &SlotListResponse) -> Vec<&str> {
    list.slots.iter().map(|s| s.start_time.as_str()).collect()
}

#[rstest]
#[case::all("", vec!["2025-01-02 09:00", "2025-01-02 11:00", "2025-01-03 09:00"])]
#[case::available("?view=available", vec!["2025-01-02 11:00", "2025-01-03 09:00"])]
#[case::booked("?view=booked", vec!["2025-01-02 09:00"])]
#[case::upcoming("?view=upcoming", vec!["2025-01-02 09:00"])]
#[case::by_date("?date=2025-01-03", vec!["2025-01-03 09:00"])]
#[case::available_by_date("?view=available&date=2025-01-02", vec!["2025-01-02 11:00"])]
#[case::booked_other_date("?view=booked&date=2025-01-03", vec![])]
#[case::upcoming_by_date("?view=upcoming&date=2025-01-02", vec!["2025-01-02 09:00"])]
#[tokio::test]
async fn test_owner_views(#[case] query: &str, #[case] expected: Vec<&str>) {
    let ctx = seeded().await;

    let response = ctx
        .server
        .get(&format!("/api/appointments/owners/agent/1/slots{query}"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let list: SlotListResponse = response.json();
    assert_eq!(starts(&list), expected);
}

#[tokio::test]
async fn test_upcoming_drops_started_slots() {
    let ctx = seeded().await;
    ctx.clock.set(at("2025-01-02 09:30"));

    let response = ctx
        .server
        .get("/api/appointments/owners/agent/1/slots?view=upcoming")
        .await;

    let list: SlotListResponse = response.json();
    assert!(list.slots.is_empty());
}

#[tokio::test]
async fn test_owner_view_is_scoped_to_domain() {
    let ctx = seeded().await;

    let response = ctx
        .server
        .get("/api/reservations/owners/agent/1/slots")
        .await;

    let list: SlotListResponse = response.json();
    assert!(list.slots.is_empty());
}

#[tokio::test]
async fn test_unknown_view_is_rejected() {
    let ctx = seeded().await;

    let response = ctx
        .server
        .get("/api/appointments/owners/agent/1/slots?view=weekly")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slot_at_start_time() {
    let ctx = seeded().await;

    let response = ctx
        .server
        .get("/api/appointments/owners/agent/1/slots/at?start_time=2025-01-02%2011:00")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let slot: SlotResponse = response.json();
    assert_eq!(slot.end_time, "2025-01-02 12:00");
}

#[rstest]
#[case::no_slot("2025-01-02%2010:00", StatusCode::NOT_FOUND)]
#[case::bad_format("noon", StatusCode::UNPROCESSABLE_ENTITY)]
#[tokio::test]
async fn test_slot_at_failures(#[case] start: &str, #[case] status: StatusCode) {
    let ctx = seeded().await;

    let response = ctx
        .server
        .get(&format!(
            "/api/appointments/owners/agent/1/slots/at?start_time={start}"
        ))
        .await;

    assert_eq!(response.status_code(), status);
}

#[rstest]
#[case::all("", 1)]
#[case::upcoming("?upcoming=true", 1)]
#[case::not_upcoming("?upcoming=false", 1)]
#[tokio::test]
async fn test_claimant_views(#[case] query: &str, #[case] expected: usize) {
    let ctx = seeded().await;

    let response = ctx
        .server
        .get(&format!("/api/appointments/claimants/client/10/slots{query}"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let list: SlotListResponse = response.json();
    assert_eq!(list.slots.len(), expected);
    assert_eq!(list.slots[0].claimant, Some(client()));
}

#[tokio::test]
async fn test_claimant_upcoming_after_start() {
    let ctx = seeded().await;
    ctx.clock.set(at("2025-01-02 09:30"));

    let all: SlotListResponse = ctx
        .server
        .get("/api/appointments/claimants/client/10/slots")
        .await
        .json();
    let upcoming: SlotListResponse = ctx
        .server
        .get("/api/appointments/claimants/client/10/slots?upcoming=true")
        .await
        .json();

    assert_eq!(all.slots.len(), 1);
    assert!(upcoming.slots.is_empty());
}
