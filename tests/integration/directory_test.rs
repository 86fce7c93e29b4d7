// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::Value;

use super::helpers::create_test_app;
use workdesk::domain::models::user::Role;

#[tokio::test]
async fn test_directory_reads() {
    let app = create_test_app().await;
    let support = app.create_team("Support").await;
    app.create_team("Accounting").await;
    let manager = app.create_user("Max", Role::Manager, Some(support)).await;
    app.create_user("Alice", Role::Agent, Some(support)).await;
    let rita = app.create_user("Rita", Role::User, Some(support)).await;

    let teams: Value = app
        .server
        .get("/api/teams")
        .authorization_bearer(&manager.token)
        .await
        .json();
    let teams = teams.as_array().unwrap();
    assert_eq!(teams[0]["name"], "Accounting");
    assert_eq!(teams[0]["memberCount"], 0);
    assert_eq!(teams[1]["memberCount"], 3);

    let agents: Value = app
        .server
        .get(&format!("/api/users/agents?teamId={}", support))
        .authorization_bearer(&rita.token)
        .await
        .json();
    assert_eq!(agents.as_array().unwrap().len(), 2);

    let assignable: Value = app
        .server
        .get("/api/users/task-assignable")
        .authorization_bearer(&manager.token)
        .await
        .json();
    assert_eq!(assignable.as_array().unwrap().len(), 3);

    app.server
        .get("/api/users/task-assignable")
        .authorization_bearer(&rita.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let categories: Value = app
        .server
        .get("/api/categories")
        .authorization_bearer(&rita.token)
        .await
        .json();
    assert!(categories.as_array().unwrap().is_empty());
}
