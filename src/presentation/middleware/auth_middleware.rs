// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::user::{Actor, Role};
use crate::domain::models::work_item::DomainError;
use crate::infrastructure::database::entities::session;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{debug, warn};

use std::sync::Arc;

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    /// 数据库连接
    pub db: Arc<DatabaseConnection>,
}

const PUBLIC_PATHS: &[&str] = &["/health", "/v1/version"];

fn unauthorized() -> AppError {
    DomainError::Unauthorized("Unauthorized".to_string()).into()
}

/// 认证中间件
///
/// 根据 `Authorization: Bearer <token>` 查找未过期的会话，
/// 并把调用者写入请求扩展
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(AppError)` - 缺少令牌、会话不存在或已过期时为 401
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    debug!("AuthMiddleware processing path: {}", path);
    if PUBLIC_PATHS.contains(&path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(unauthorized)?
        .to_string();

    let session = session::Entity::find_by_id(token)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            warn!("Session not found for bearer token");
            unauthorized()
        })?;

    if session
        .expires_at
        .is_some_and(|expires_at| expires_at <= Utc::now().fixed_offset())
    {
        debug!("Session for user {} has expired", session.user_id);
        return Err(unauthorized());
    }

    let role: Role = session.role.parse().map_err(|_| {
        warn!("Session for user {} carries unknown role {}", session.user_id, session.role);
        unauthorized()
    })?;

    req.extensions_mut().insert(Actor {
        user_id: session.user_id,
        role,
        team_id: session.team_id,
    });
    Ok(next.run(req).await)
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod tests;
