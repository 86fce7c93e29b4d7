// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use super::helpers::{assert_exclusive, create_test_app, id_of, ticket_body, TestApp, TestUser};
use workdesk::domain::models::user::Role;

async fn assign(app: &TestApp, actor: &TestUser, path: &str, body: Value) -> axum_test::TestResponse {
    app.server
        .patch(path)
        .authorization_bearer(&actor.token)
        .json(&body)
        .await
}

fn assignee_ids(item: &Value) -> Vec<String> {
    item["assignees"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["userId"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_team_then_individuals_keeps_assignment_exclusive() {
    let app = create_test_app().await;
    let support = app.create_team("Support").await;
    let admin = app.create_user("Ada Admin", Role::Admin, None).await;
    let manager = app.create_user("Max Manager", Role::Manager, None).await;
    let alice = app.create_user("Alice", Role::Agent, Some(support)).await;
    let bob = app.create_user("Bob", Role::Agent, Some(support)).await;
    let requester = app.create_user("Rita", Role::User, None).await;

    let ticket = app
        .create_item(&requester, "/api/tickets", ticket_body("Laptop will not boot"))
        .await;
    let id = id_of(&ticket);
    let path = format!("/api/tickets/{}/assignment", id);

    let response = assign(&app, &admin, &path, json!({ "teamId": support })).await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(item["assignmentMode"], "team");
    assert_eq!(item["team"]["name"], "Support");
    assert_eq!(item["status"], "OPEN");
    assert_exclusive(&item);

    let response = assign(
        &app,
        &manager,
        &path,
        json!({ "assignmentMode": "individuals", "assigneeIds": [alice.id, bob.id] }),
    )
    .await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(item["assignmentMode"], "individuals");
    assert!(item["teamId"].is_null());
    assert_eq!(assignee_ids(&item), vec![alice.id.to_string(), bob.id.to_string()]);
    assert_eq!(item["assigneeId"], alice.id.to_string());
    assert_eq!(item["status"], "IN_PROGRESS");
    assert_exclusive(&item);

    let actions: Vec<String> = app
        .activity_actions(id)
        .await
        .into_iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            "TICKET_CREATED",
            "TICKET_ASSIGNED",
            "TICKET_ASSIGNED",
            "ASSIGNEE_ADDED",
            "ASSIGNEE_ADDED",
        ]
    );
    assert_eq!(app.notifications_for(alice.id).await.len(), 1);
    assert_eq!(app.notifications_for(bob.id).await.len(), 1);
    assert!(app.notifications_for(manager.id).await.is_empty());
}

#[tokio::test]
async fn test_claim_adds_caller_and_rejects_repeat() {
    let app = create_test_app().await;
    let agent = app.create_user("Alice", Role::Agent, None).await;
    let requester = app.create_user("Rita", Role::User, None).await;
    let ticket = app
        .create_item(&requester, "/api/tickets", ticket_body("VPN drops every hour"))
        .await;
    let id = id_of(&ticket);
    let path = format!("/api/tickets/{}/assignment", id);

    let response = assign(&app, &agent, &path, json!({ "claimTicket": true })).await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(item["status"], "IN_PROGRESS");
    assert_eq!(assignee_ids(&item), vec![agent.id.to_string()]);
    assert_exclusive(&item);
    let version = item["version"].clone();

    let logs = app.activity_actions(id).await;
    let claim = logs.last().unwrap();
    assert_eq!(claim.action, "TICKET_CLAIMED");
    assert_eq!(claim.user_id, agent.id);
    assert_eq!(claim.changes["status"]["to"], "IN_PROGRESS");
    assert!(app.notifications_for(agent.id).await.is_empty());

    let response = assign(&app, &agent, &path, json!({ "claimTicket": true })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "You are already assigned to this ticket");

    let item: Value = app
        .server
        .get(&format!("/api/tickets/{}", id))
        .authorization_bearer(&agent.token)
        .await
        .json();
    assert_eq!(item["version"], version);
    assert_eq!(app.assignee_row_count(id).await, 1);
}

#[tokio::test]
async fn test_claim_keeps_existing_assignees_first() {
    let app = create_test_app().await;
    let manager = app.create_user("Max", Role::Manager, None).await;
    let alice = app.create_user("Alice", Role::Agent, None).await;
    let bob = app.create_user("Bob", Role::Agent, None).await;
    let task = app
        .create_item(&manager, "/api/tasks", ticket_body("Rotate the API keys"))
        .await;
    let path = format!("/api/tasks/{}/assignment", id_of(&task));

    assign(&app, &manager, &path, json!({ "assigneeIds": [alice.id] }))
        .await
        .assert_status_ok();
    let response = assign(&app, &bob, &path, json!({ "claimTask": true })).await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(assignee_ids(&item), vec![alice.id.to_string(), bob.id.to_string()]);
    assert_eq!(item["assigneeId"], alice.id.to_string());
}

#[tokio::test]
async fn test_role_checks() {
    let app = create_test_app().await;
    let team = app.create_team("Support").await;
    let agent = app.create_user("Alice", Role::Agent, None).await;
    let requester = app.create_user("Rita", Role::User, None).await;
    let ticket = app
        .create_item(&requester, "/api/tickets", ticket_body("Printer jammed again"))
        .await;
    let path = format!("/api/tickets/{}/assignment", id_of(&ticket));

    let response = assign(&app, &requester, &path, json!({ "claimTicket": true })).await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"], "Only agents can claim tickets");

    let response = assign(&app, &agent, &path, json!({ "teamId": team })).await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["error"],
        "Only managers and admins can assign tickets"
    );

    let response = assign(&app, &agent, &path, json!({})).await;
    response.assert_status(StatusCode::FORBIDDEN);

    // Role is checked before ids are parsed
    let response = assign(&app, &requester, &path, json!({ "assigneeIds": ["x"] })).await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["error"],
        "Only managers and admins can assign tickets"
    );
}

#[tokio::test]
async fn test_request_errors() {
    let app = create_test_app().await;
    let admin = app.create_user("Ada", Role::Admin, None).await;
    let ticket = app
        .create_item(&admin, "/api/tickets", ticket_body("Monitor flickers a lot"))
        .await;
    let id = id_of(&ticket);
    let path = format!("/api/tickets/{}/assignment", id);

    let response = assign(&app, &admin, &path, json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "No valid assignment action provided"
    );

    let response = assign(&app, &admin, &path, json!({ "teamId": Uuid::new_v4() })).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Team not found");

    let response = assign(&app, &admin, &path, json!({ "assigneeIds": [Uuid::new_v4()] })).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "User not found");

    let response = assign(&app, &admin, &path, json!({ "assigneeIds": ["not-a-uuid"] })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["details"]["assigneeIds"].is_array());

    let response = assign(
        &app,
        &admin,
        &format!("/api/tasks/{}/assignment", id),
        json!({ "teamId": null }),
    )
    .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Task not found");

    let response = app
        .server
        .patch(&path)
        .json(&json!({ "teamId": null }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Failed requests must not touch the item
    assert_eq!(app.activity_actions(id).await.len(), 1);
}

#[tokio::test]
async fn test_stale_session_is_rejected() {
    let app = create_test_app().await;
    let admin = app.create_user("Ada", Role::Admin, None).await;
    let ticket = app
        .create_item(&admin, "/api/tickets", ticket_body("Keyboard missing keys"))
        .await;
    let ghost_token = app.create_session(Uuid::new_v4(), Role::Admin, None).await;

    let response = app
        .server
        .patch(&format!("/api/tickets/{}/assignment", id_of(&ticket)))
        .authorization_bearer(&ghost_token)
        .json(&json!({ "teamId": null }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["error"],
        "Your session is invalid. Please log out and log back in."
    );
}

#[tokio::test]
async fn test_individual_diff_and_unassign() {
    let app = create_test_app().await;
    let manager = app.create_user("Max", Role::Manager, None).await;
    let a = app.create_user("Alice", Role::Agent, None).await;
    let b = app.create_user("Bob", Role::Agent, None).await;
    let c = app.create_user("Carol", Role::Agent, None).await;
    let task = app
        .create_item(&manager, "/api/tasks", ticket_body("Upgrade the database"))
        .await;
    let id = id_of(&task);
    let path = format!("/api/tasks/{}/assignment", id);

    assign(&app, &manager, &path, json!({ "assigneeIds": [a.id, b.id] }))
        .await
        .assert_status_ok();

    let response = assign(&app, &manager, &path, json!({ "assigneeIds": [b.id, c.id, c.id] })).await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(assignee_ids(&item), vec![b.id.to_string(), c.id.to_string()]);
    assert_eq!(item["assigneeId"], b.id.to_string());
    assert_exclusive(&item);

    let logs = app.activity_actions(id).await;
    let removed: Vec<_> = logs.iter().filter(|l| l.action == "ASSIGNEE_REMOVED").collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].changes["assigneeRemoved"], "Alice");
    assert_eq!(app.notifications_for(c.id).await.len(), 1);
    assert_eq!(app.notifications_for(b.id).await.len(), 1);

    let response = assign(&app, &manager, &path, json!({ "assignmentMode": "individuals" })).await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert!(item["assignmentMode"].is_null());
    assert!(item["assignees"].as_array().unwrap().is_empty());
    // Status does not revert when the last assignee is removed
    assert_eq!(item["status"], "IN_PROGRESS");
    assert_exclusive(&item);
}

#[tokio::test]
async fn test_legacy_assignee_mirrors_first_requested_id() {
    let app = create_test_app().await;
    let manager = app.create_user("Max", Role::Manager, None).await;
    let alice = app.create_user("Alice", Role::Agent, None).await;
    let carol = app.create_user("Carol", Role::Agent, None).await;
    let task = app
        .create_item(&manager, "/api/tasks", ticket_body("Rotate the TLS certificates"))
        .await;
    let path = format!("/api/tasks/{}/assignment", id_of(&task));

    assign(&app, &manager, &path, json!({ "assigneeIds": [alice.id] }))
        .await
        .assert_status_ok();

    let response = assign(&app, &manager, &path, json!({ "assigneeIds": [carol.id, alice.id] })).await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(assignee_ids(&item), vec![alice.id.to_string(), carol.id.to_string()]);
    assert_eq!(item["assigneeId"], carol.id.to_string());
    assert_exclusive(&item);
}

#[tokio::test]
async fn test_legacy_single_assignee() {
    let app = create_test_app().await;
    let team = app.create_team("Network").await;
    let admin = app.create_user("Ada", Role::Admin, None).await;
    let agent = app.create_user("Alice", Role::Agent, None).await;
    let ticket = app
        .create_item(&admin, "/api/tickets", ticket_body("Switch port is dead"))
        .await;
    let id = id_of(&ticket);
    let path = format!("/api/tickets/{}/assignment", id);

    assign(&app, &admin, &path, json!({ "teamId": team }))
        .await
        .assert_status_ok();

    let response = assign(&app, &admin, &path, json!({ "assigneeId": agent.id })).await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(item["assigneeId"], agent.id.to_string());
    assert_eq!(item["status"], "IN_PROGRESS");
    assert_exclusive(&item);

    let logs = app.activity_actions(id).await;
    let last = logs.last().unwrap();
    assert_eq!(last.action, "TICKET_ASSIGNED");
    assert_eq!(last.changes["assigneeId"]["to"], "Alice");
    assert_eq!(last.changes["teamId"]["from"], "Network");

    let response = assign(&app, &admin, &path, json!({ "assigneeId": "" })).await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert!(item["assignmentMode"].is_null());
    assert!(item["assigneeId"].is_null());
    assert_exclusive(&item);
}

#[tokio::test]
async fn test_self_assignment_sends_no_notification() {
    let app = create_test_app().await;
    let manager = app.create_user("Max", Role::Manager, None).await;
    let task = app
        .create_item(&manager, "/api/tasks", ticket_body("Write the runbook"))
        .await;

    assign(
        &app,
        &manager,
        &format!("/api/tasks/{}/assignment", id_of(&task)),
        json!({ "assigneeIds": [manager.id] }),
    )
    .await
    .assert_status_ok();
    assert!(app.notifications_for(manager.id).await.is_empty());
}
