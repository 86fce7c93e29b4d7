// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use super::helpers::{create_test_app, id_of, ticket_body, TestApp, TestUser};
use workdesk::domain::models::user::Role;

async fn start(app: &TestApp, user: &TestUser, work_item_id: Uuid) -> axum_test::TestResponse {
    app.server
        .post("/api/time-logs/start")
        .authorization_bearer(&user.token)
        .json(&json!({ "workItemId": work_item_id, "notes": "investigating" }))
        .await
}

#[tokio::test]
async fn test_starting_a_timer_stops_the_running_one() {
    let app = create_test_app().await;
    let agent = app.create_user("Alice", Role::Agent, None).await;
    let first = id_of(
        &app.create_item(&agent, "/api/tickets", ticket_body("First broken thing"))
            .await,
    );
    let second = id_of(
        &app.create_item(&agent, "/api/tickets", ticket_body("Second broken thing"))
            .await,
    );

    let response = start(&app, &agent, first).await;
    response.assert_status(StatusCode::CREATED);
    let first_log: Value = response.json();
    assert_eq!(first_log["isRunning"], true);

    start(&app, &agent, second)
        .await
        .assert_status(StatusCode::CREATED);

    let active: Value = app
        .server
        .get("/api/time-logs/active")
        .authorization_bearer(&agent.token)
        .await
        .json();
    assert_eq!(active["workItemId"], second.to_string());

    let first_actions: Vec<String> = app
        .activity_actions(first)
        .await
        .into_iter()
        .map(|l| l.action)
        .collect();
    assert_eq!(
        first_actions,
        vec!["TICKET_CREATED", "TIMER_STARTED", "TIMER_STOPPED"]
    );

    let response = app
        .server
        .post("/api/time-logs/stop")
        .authorization_bearer(&agent.token)
        .json(&json!({ "timeLogId": first_log["id"] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "This timer is already stopped"
    );
}

#[tokio::test]
async fn test_stop_rules() {
    let app = create_test_app().await;
    let alice = app.create_user("Alice", Role::Agent, None).await;
    let bob = app.create_user("Bob", Role::Agent, None).await;
    let item = id_of(
        &app.create_item(&alice, "/api/tickets", ticket_body("Server room is hot"))
            .await,
    );
    let log: Value = start(&app, &alice, item).await.json();

    let response = app
        .server
        .post("/api/time-logs/stop")
        .authorization_bearer(&bob.token)
        .json(&json!({ "timeLogId": log["id"] }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["error"],
        "You can only stop your own timers"
    );

    let response = app
        .server
        .post("/api/time-logs/stop")
        .authorization_bearer(&alice.token)
        .json(&json!({ "timeLogId": Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Time log not found");

    let response = app
        .server
        .post("/api/time-logs/stop")
        .authorization_bearer(&alice.token)
        .json(&json!({ "timeLogId": log["id"], "notes": "fixed the fan" }))
        .await;
    response.assert_status_ok();
    let stopped: Value = response.json();
    assert_eq!(stopped["isRunning"], false);
    assert_eq!(stopped["durationMins"], 0);
    assert_eq!(stopped["notes"], "fixed the fan");

    let active: Value = app
        .server
        .get("/api/time-logs/active")
        .authorization_bearer(&alice.token)
        .await
        .json();
    assert!(active.is_null());
}

#[tokio::test]
async fn test_start_requires_existing_item() {
    let app = create_test_app().await;
    let alice = app.create_user("Alice", Role::Agent, None).await;

    let response = start(&app, &alice, Uuid::new_v4()).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Work item not found");
}
