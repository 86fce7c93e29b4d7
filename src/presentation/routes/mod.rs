// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::config::settings::Settings;
use crate::domain::models::work_item::WorkItemType;
use crate::infrastructure::repositories::comment_repo_impl::CommentRepositoryImpl;
use crate::infrastructure::repositories::directory_repo_impl::DirectoryRepositoryImpl;
use crate::infrastructure::repositories::time_log_repo_impl::TimeLogRepositoryImpl;
use crate::infrastructure::repositories::work_item_repo_impl::WorkItemRepositoryImpl;
use crate::presentation::handlers::{
    assignment_handler, comment_handler, directory_handler, time_log_handler, work_item_handler,
};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};

type WorkItems = WorkItemRepositoryImpl;
type Directory = DirectoryRepositoryImpl;
type TimeLogs = TimeLogRepositoryImpl;
type Comments = CommentRepositoryImpl;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由，仓库与配置通过 `Extension` 注入
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let protected_routes = Router::new()
        .merge(work_item_routes(WorkItemType::Ticket))
        .merge(work_item_routes(WorkItemType::Task))
        .route(
            "/api/time-logs/start",
            post(time_log_handler::start_timer::<TimeLogs, WorkItems>),
        )
        .route(
            "/api/time-logs/stop",
            post(time_log_handler::stop_timer::<TimeLogs, WorkItems>),
        )
        .route(
            "/api/time-logs/active",
            get(time_log_handler::active_timer::<TimeLogs, WorkItems>),
        )
        .route(
            "/api/comments",
            post(comment_handler::create_comment::<Comments, WorkItems, Directory>),
        )
        .route("/api/teams", get(directory_handler::list_teams::<Directory>))
        .route(
            "/api/categories",
            get(directory_handler::list_categories::<Directory>),
        )
        .route(
            "/api/users/agents",
            get(directory_handler::list_agents::<Directory>),
        )
        .route(
            "/api/users/task-assignable",
            get(directory_handler::list_task_assignable::<Directory>),
        );

    Router::new().merge(public_routes).merge(protected_routes)
}

/// 工单与任务共用的路由，类型通过 `Extension<WorkItemType>` 传给处理器
fn work_item_routes(item_type: WorkItemType) -> Router {
    let base = format!("/api/{}", item_type.path_segment());
    Router::new()
        .route(
            &base,
            get(work_item_handler::list_work_items::<WorkItems, Directory, TimeLogs, Comments>)
                .post(
                    work_item_handler::create_work_item::<WorkItems, Directory, TimeLogs, Comments>,
                ),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(work_item_handler::get_work_item::<WorkItems, Directory, TimeLogs, Comments>)
                .patch(
                    work_item_handler::update_work_item::<WorkItems, Directory, TimeLogs, Comments>,
                ),
        )
        .route(
            &format!("{}/{{id}}/assignment", base),
            patch(assignment_handler::update_assignment::<WorkItems, Directory>),
        )
        .layer(Extension(item_type))
}

/// 组装完整应用：路由、认证中间件、仓库注入与请求追踪
///
/// # 参数
///
/// * `db` - 数据库连接
/// * `settings` - 应用配置
pub fn build_app(db: Arc<DatabaseConnection>, settings: Arc<Settings>) -> Router {
    let work_items = Arc::new(WorkItemRepositoryImpl::new(db.clone()));
    let directory = Arc::new(DirectoryRepositoryImpl::new(db.clone()));
    let time_logs = Arc::new(TimeLogRepositoryImpl::new(db.clone()));
    let comments = Arc::new(CommentRepositoryImpl::new(db.clone()));

    routes()
        .layer(middleware::from_fn_with_state(
            AuthState { db },
            auth_middleware,
        ))
        .layer(Extension(work_items))
        .layer(Extension(directory))
        .layer(Extension(time_logs))
        .layer(Extension(comments))
        .layer(Extension(settings))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
