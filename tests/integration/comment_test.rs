// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use super::helpers::{create_test_app, id_of, ticket_body};
use workdesk::domain::models::user::Role;

#[tokio::test]
async fn test_comments_respect_internal_visibility() {
    let app = create_test_app().await;
    let agent = app.create_user("Alice", Role::Agent, None).await;
    let rita = app.create_user("Rita", Role::User, None).await;
    let ticket = id_of(
        &app.create_item(&rita, "/api/tickets", ticket_body("Cannot print PDFs"))
            .await,
    );

    let response = app
        .server
        .post("/api/comments")
        .authorization_bearer(&agent.token)
        .json(&json!({ "workItemId": ticket, "content": "Looking into it" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let comment: Value = response.json();
    assert_eq!(comment["user"]["name"], "Alice");

    app.server
        .post("/api/comments")
        .authorization_bearer(&agent.token)
        .json(&json!({ "workItemId": ticket, "content": "Driver is ancient", "isInternal": true }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .post("/api/comments")
        .authorization_bearer(&rita.token)
        .json(&json!({ "workItemId": ticket, "content": "Secret", "isInternal": true }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["error"],
        "You do not have permission to create internal comments"
    );

    // Only the public comment notifies the creator
    let notifications = app.notifications_for(rita.id).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "COMMENT_ADDED");

    let path = format!("/api/tickets/{}", ticket);
    let as_user: Value = app.server.get(&path).authorization_bearer(&rita.token).await.json();
    assert_eq!(as_user["comments"].as_array().unwrap().len(), 1);
    let as_agent: Value = app.server.get(&path).authorization_bearer(&agent.token).await.json();
    assert_eq!(as_agent["comments"].as_array().unwrap().len(), 2);

    let actions: Vec<String> = app
        .activity_actions(ticket)
        .await
        .into_iter()
        .map(|l| l.action)
        .collect();
    assert_eq!(actions.iter().filter(|a| *a == "COMMENT_ADDED").count(), 2);
}

#[tokio::test]
async fn test_comment_validation_and_missing_item() {
    let app = create_test_app().await;
    let rita = app.create_user("Rita", Role::User, None).await;

    let response = app
        .server
        .post("/api/comments")
        .authorization_bearer(&rita.token)
        .json(&json!({ "workItemId": Uuid::new_v4(), "content": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/comments")
        .authorization_bearer(&rita.token)
        .json(&json!({ "workItemId": Uuid::new_v4(), "content": "Hello?" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // Creator commenting on their own ticket gets no notification
    let ticket = id_of(
        &app.create_item(&rita, "/api/tickets", ticket_body("Chair is squeaky"))
            .await,
    );
    app.server
        .post("/api/comments")
        .authorization_bearer(&rita.token)
        .json(&json!({ "workItemId": ticket, "content": "Still squeaky" }))
        .await
        .assert_status(StatusCode::CREATED);
    assert!(app.notifications_for(rita.id).await.is_empty());
}
