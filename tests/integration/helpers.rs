// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use workdesk::config::settings::{RoutingSettings, Settings};
use workdesk::domain::models::user::Role;
use workdesk::infrastructure::database::connection;
use workdesk::infrastructure::database::entities::{
    activity_log, notification, session, team, user, work_item_assignee,
};
use workdesk::presentation::routes;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub settings: Arc<Settings>,
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub team_id: Option<Uuid>,
    pub token: String,
}

/// 内存数据库，单连接保证所有查询看到同一个库
pub async fn test_db() -> Arc<DatabaseConnection> {
    let mut settings = Settings::for_database("sqlite::memory:").unwrap();
    settings.database.max_connections = Some(1);
    settings.database.idle_timeout = None;
    Arc::new(
        connection::connect_and_migrate(&settings.database)
            .await
            .unwrap(),
    )
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with_routing(RoutingSettings::default()).await
}

pub async fn create_test_app_with_routing(routing: RoutingSettings) -> TestApp {
    let db = test_db().await;
    let mut settings = Settings::for_database("sqlite::memory:").unwrap();
    settings.routing = routing;
    settings.metrics.enabled = false;
    let settings = Arc::new(settings);

    let app = routes::build_app(db.clone(), settings.clone());
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        db,
        settings,
    }
}

impl TestApp {
    pub async fn create_team(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        team::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            color: Set(Some("#3366ff".to_string())),
            description: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(self.db.as_ref())
        .await
        .unwrap();
        id
    }

    /// 创建用户及其有效会话
    pub async fn create_user(&self, name: &str, role: Role, team_id: Option<Uuid>) -> TestUser {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();
        user::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            email: Set(format!("{}@example.com", id)),
            avatar: Set(None),
            role: Set(role.to_string()),
            team_id: Set(team_id),
            is_active: Set(true),
            created_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .unwrap();

        let token = self.create_session(id, role, team_id).await;
        TestUser {
            id,
            name: name.to_string(),
            role,
            team_id,
            token,
        }
    }

    /// 只创建会话，不创建用户记录
    pub async fn create_session(&self, user_id: Uuid, role: Role, team_id: Option<Uuid>) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now().fixed_offset();
        session::ActiveModel {
            token: Set(token.clone()),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            team_id: Set(team_id),
            expires_at: Set(Some(now + Duration::hours(8))),
            created_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .unwrap();
        token
    }

    /// 创建工作项并返回响应体
    pub async fn create_item(&self, creator: &TestUser, path: &str, body: Value) -> Value {
        let response = self
            .server
            .post(path)
            .authorization_bearer(&creator.token)
            .json(&body)
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }

    pub async fn activity_actions(&self, work_item_id: Uuid) -> Vec<activity_log::Model> {
        activity_log::Entity::find()
            .filter(activity_log::Column::WorkItemId.eq(work_item_id))
            .order_by_asc(activity_log::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .unwrap()
    }

    pub async fn notifications_for(&self, user_id: Uuid) -> Vec<notification::Model> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .unwrap()
    }

    pub async fn assignee_row_count(&self, work_item_id: Uuid) -> u64 {
        work_item_assignee::Entity::find()
            .filter(work_item_assignee::Column::WorkItemId.eq(work_item_id))
            .count(self.db.as_ref())
            .await
            .unwrap()
    }
}

pub fn ticket_body(title: &str) -> Value {
    serde_json::json!({
        "title": title,
        "description": "Something is broken and needs attention",
        "priority": "MEDIUM"
    })
}

pub fn id_of(value: &Value) -> Uuid {
    value["id"].as_str().unwrap().parse().unwrap()
}

/// 校验分配互斥：未分配、团队分配、个人分配三者恰好其一
pub fn assert_exclusive(item: &Value) {
    let mode = item["assignmentMode"].as_str();
    let team = &item["teamId"];
    let assignees = item["assignees"].as_array().unwrap();
    let legacy = &item["assigneeId"];
    match mode {
        None => {
            assert!(team.is_null());
            assert!(assignees.is_empty());
            assert!(legacy.is_null());
        }
        Some("team") => {
            assert!(!team.is_null());
            assert!(assignees.is_empty());
            assert!(legacy.is_null());
        }
        Some("individuals") => {
            assert!(team.is_null());
            assert!(!assignees.is_empty());
            assert!(assignees.iter().any(|a| &a["userId"] == legacy));
        }
        Some(other) => panic!("unexpected assignment mode {}", other),
    }
}
