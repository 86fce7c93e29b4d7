// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use super::helpers::{
    assert_exclusive, create_test_app, create_test_app_with_routing, id_of, ticket_body, TestApp,
};
use workdesk::config::settings::RoutingSettings;
use workdesk::domain::models::user::Role;

#[tokio::test]
async fn test_numbering_is_sequential_per_type() {
    let app = create_test_app().await;
    let manager = app.create_user("Max", Role::Manager, None).await;

    let first = app
        .create_item(&manager, "/api/tickets", ticket_body("First ticket here"))
        .await;
    let task = app
        .create_item(&manager, "/api/tasks", ticket_body("First task here"))
        .await;
    let second = app
        .create_item(&manager, "/api/tickets", ticket_body("Second ticket here"))
        .await;

    assert_eq!(first["ticketNumber"], "T-0001");
    assert!(first["taskNumber"].is_null());
    assert_eq!(second["ticketNumber"], "T-0002");
    assert_eq!(task["taskNumber"], "TASK-0001");
    assert_eq!(task["type"], "TASK");
    assert_eq!(first["status"], "OPEN");

    let logs = app.activity_actions(id_of(&second)).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "TICKET_CREATED");
    assert_eq!(logs[0].user_id, manager.id);
    assert_eq!(logs[0].changes["ticketNumber"], "T-0002");
}

#[tokio::test]
async fn test_users_cannot_create_tasks() {
    let app = create_test_app().await;
    let user = app.create_user("Rita", Role::User, None).await;

    let response = app
        .server
        .post("/api/tasks")
        .authorization_bearer(&user.token)
        .json(&ticket_body("Please do a thing"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["error"],
        "You do not have permission to create tasks. Only Admins, Managers, and Agents can create tasks."
    );
}

#[tokio::test]
async fn test_create_validation() {
    let app = create_test_app().await;
    let user = app.create_user("Rita", Role::User, None).await;

    let response = app
        .server
        .post("/api/tickets")
        .authorization_bearer(&user.token)
        .json(&json!({ "title": "Hi", "description": "too short", "priority": "LOW" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"]["title"].is_array());
    assert!(body["details"]["description"].is_array());

    let response = app
        .server
        .post("/api/tickets")
        .authorization_bearer(&user.token)
        .json(&json!({ "title": "No priority given", "description": "Priority is required here" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["details"]["body"].is_array());
}

#[tokio::test]
async fn test_tickets_route_to_configured_teams() {
    let it_team = Uuid::new_v4();
    let lms_team = Uuid::new_v4();
    let app = create_test_app_with_routing(RoutingSettings {
        it_team_id: Some(it_team),
        lms_team_id: Some(lms_team),
    })
    .await;
    // Routing targets must exist as real teams
    insert_team(&app, it_team, "IT").await;
    insert_team(&app, lms_team, "LMS").await;

    let user = app.create_user("Rita", Role::User, None).await;
    let agent = app.create_user("Alice", Role::Agent, None).await;
    let admin = app.create_user("Ada", Role::Admin, None).await;

    let from_user = app
        .create_item(&user, "/api/tickets", ticket_body("Email is not syncing"))
        .await;
    assert_eq!(from_user["teamId"], it_team.to_string());
    assert_eq!(from_user["assignmentMode"], "team");

    let from_agent = app
        .create_item(&agent, "/api/tickets", ticket_body("Course upload failed"))
        .await;
    assert_eq!(from_agent["teamId"], lms_team.to_string());

    let from_admin = app
        .create_item(&admin, "/api/tickets", ticket_body("Nothing routed here"))
        .await;
    assert!(from_admin["assignmentMode"].is_null());
    assert_exclusive(&from_admin);
}

async fn insert_team(app: &TestApp, id: Uuid, name: &str) {
    use sea_orm::{ActiveModelTrait, Set};
    use workdesk::infrastructure::database::entities::team;
    team::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        color: Set(None),
        description: Set(None),
        created_at: Set(chrono::Utc::now().fixed_offset()),
    }
    .insert(app.db.as_ref())
    .await
    .unwrap();
}

#[tokio::test]
async fn test_create_with_individuals_notifies_everyone_but_creator() {
    let app = create_test_app().await;
    let manager = app.create_user("Max", Role::Manager, None).await;
    let alice = app.create_user("Alice", Role::Agent, None).await;

    let mut body = ticket_body("Migrate the wiki pages");
    body["assignmentMode"] = json!("individuals");
    body["assigneeIds"] = json!([alice.id, manager.id, alice.id]);
    let task = app.create_item(&manager, "/api/tasks", body).await;

    assert_eq!(task["assignees"].as_array().unwrap().len(), 2);
    assert_eq!(task["assigneeId"], alice.id.to_string());
    assert_eq!(task["status"], "OPEN");
    assert_exclusive(&task);
    assert_eq!(app.notifications_for(alice.id).await.len(), 1);
    assert!(app.notifications_for(manager.id).await.is_empty());

    let mut body = ticket_body("Assign to a ghost");
    body["assigneeIds"] = json!([Uuid::new_v4()]);
    let response = app
        .server
        .post("/api/tasks")
        .authorization_bearer(&manager.token)
        .json(&body)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_team_mode_defaults_to_creator_team() {
    let app = create_test_app().await;
    let team = app.create_team("Ops").await;
    let agent = app.create_user("Alice", Role::Agent, Some(team)).await;

    let mut body = ticket_body("Renew certificates");
    body["assignmentMode"] = json!("team");
    let task = app.create_item(&agent, "/api/tasks", body).await;
    assert_eq!(task["teamId"], team.to_string());
    assert_eq!(task["team"]["name"], "Ops");
    assert_exclusive(&task);
}

async fn list(app: &TestApp, token: &str, query: &str) -> Value {
    app.server
        .get(&format!("/api/tickets{}", query))
        .authorization_bearer(token)
        .await
        .json::<Value>()
}

#[tokio::test]
async fn test_list_scoping_by_role() {
    let app = create_test_app().await;
    let team = app.create_team("Support").await;
    let other_team = app.create_team("Facilities").await;
    let manager = app.create_user("Max", Role::Manager, Some(team)).await;
    let agent = app.create_user("Alice", Role::Agent, Some(team)).await;
    let rita = app.create_user("Rita", Role::User, Some(team)).await;
    let sam = app.create_user("Sam", Role::User, Some(team)).await;

    let rita_ticket = app
        .create_item(&rita, "/api/tickets", ticket_body("Rita needs a mouse"))
        .await;
    app.create_item(&sam, "/api/tickets", ticket_body("Sam needs a chair"))
        .await;
    let other = app
        .create_item(&sam, "/api/tickets", ticket_body("Sam needs a desk too"))
        .await;

    app.server
        .patch(&format!("/api/tickets/{}/assignment", id_of(&rita_ticket)))
        .authorization_bearer(&manager.token)
        .json(&json!({ "teamId": team }))
        .await
        .assert_status_ok();
    app.server
        .patch(&format!("/api/tickets/{}/assignment", id_of(&other)))
        .authorization_bearer(&manager.token)
        .json(&json!({ "teamId": other_team }))
        .await
        .assert_status_ok();

    let page = list(&app, &rita.token, "").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["creatorId"], rita.id.to_string());

    let page = list(&app, &agent.token, "").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["id"], id_of(&rita_ticket).to_string());

    let page = list(&app, &manager.token, "").await;
    assert_eq!(page["total"], 3);

    let page = list(&app, &manager.token, "?mine=true").await;
    assert_eq!(page["total"], 1);

    let page = list(&app, &manager.token, "?limit=2&page=2").await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["page"], 2);

    let page = list(&app, &manager.token, "?status=CLOSED").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_get_hides_unrelated_items_from_users() {
    let app = create_test_app().await;
    let rita = app.create_user("Rita", Role::User, None).await;
    let sam = app.create_user("Sam", Role::User, None).await;
    let agent = app.create_user("Alice", Role::Agent, None).await;
    let ticket = app
        .create_item(&rita, "/api/tickets", ticket_body("Private problem"))
        .await;
    let path = format!("/api/tickets/{}", id_of(&ticket));

    let response = app.server.get(&path).authorization_bearer(&sam.token).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Ticket not found");

    let response = app.server.get(&path).authorization_bearer(&agent.token).await;
    response.assert_status_ok();
    let detail: Value = response.json();
    assert_eq!(detail["ticketNumber"], "T-0001");
    assert!(detail["comments"].is_array());
    assert!(detail["timeLogs"].is_array());
    assert_eq!(detail["activityLogs"][0]["action"], "TICKET_CREATED");

    let response = app
        .server
        .get("/api/tickets/not-a-uuid")
        .authorization_bearer(&agent.token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_status_sets_and_clears_completed_at() {
    let app = create_test_app().await;
    let agent = app.create_user("Alice", Role::Agent, None).await;
    let rita = app.create_user("Rita", Role::User, None).await;
    let sam = app.create_user("Sam", Role::User, None).await;
    let ticket = app
        .create_item(&rita, "/api/tickets", ticket_body("Screen is cracked"))
        .await;
    let id = id_of(&ticket);
    let path = format!("/api/tickets/{}", id);

    let response = app
        .server
        .patch(&path)
        .authorization_bearer(&agent.token)
        .json(&json!({ "status": "RESOLVED", "priority": "HIGH" }))
        .await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(item["status"], "RESOLVED");
    assert!(!item["completedAt"].is_null());

    let response = app
        .server
        .patch(&path)
        .authorization_bearer(&rita.token)
        .json(&json!({ "status": "OPEN" }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["completedAt"].is_null());

    let response = app
        .server
        .patch(&path)
        .authorization_bearer(&sam.token)
        .json(&json!({ "status": "CLOSED" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"], "Access denied");

    // Unchanged values write no log
    app.server
        .patch(&path)
        .authorization_bearer(&agent.token)
        .json(&json!({ "priority": "HIGH" }))
        .await
        .assert_status_ok();

    let logs = app.activity_actions(id).await;
    let updates: Vec<_> = logs.iter().filter(|l| l.action == "TICKET_UPDATED").collect();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].changes["status"]["to"], "RESOLVED");
    assert_eq!(updates[0].changes["priority"]["from"], "MEDIUM");
}
