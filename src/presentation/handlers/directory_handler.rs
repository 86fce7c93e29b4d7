// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    Json,
};
use std::sync::Arc;

use crate::{
    application::{
        dto::directory_request::DirectoryQueryDto,
        use_cases::directory_use_case::DirectoryUseCase,
    },
    domain::{
        models::user::{CategorySummary, TeamWithMembers, UserSummary},
        repositories::directory_repository::DirectoryRepository,
    },
    presentation::{errors::AppError, extractors::current_user::CurrentUser},
};

/// 列出全部团队及成员数
pub async fn list_teams<DR>(
    Extension(directory): Extension<Arc<DR>>,
    CurrentUser(_actor): CurrentUser,
) -> Result<Json<Vec<TeamWithMembers>>, AppError>
where
    DR: DirectoryRepository + 'static,
{
    Ok(Json(DirectoryUseCase::new(directory).teams().await?))
}

/// 列出调用者可用的分类
pub async fn list_categories<DR>(
    Extension(directory): Extension<Arc<DR>>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<CategorySummary>>, AppError>
where
    DR: DirectoryRepository + 'static,
{
    Ok(Json(DirectoryUseCase::new(directory).categories(&actor).await?))
}

pub async fn list_agents<DR>(
    Extension(directory): Extension<Arc<DR>>,
    CurrentUser(_actor): CurrentUser,
    Query(query): Query<DirectoryQueryDto>,
) -> Result<Json<Vec<UserSummary>>, AppError>
where
    DR: DirectoryRepository + 'static,
{
    Ok(Json(
        DirectoryUseCase::new(directory).agents(query.team_id).await?,
    ))
}

pub async fn list_task_assignable<DR>(
    Extension(directory): Extension<Arc<DR>>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<DirectoryQueryDto>,
) -> Result<Json<Vec<UserSummary>>, AppError>
where
    DR: DirectoryRepository + 'static,
{
    let users = DirectoryUseCase::new(directory)
        .task_assignable(&actor, query.team_id)
        .await?;
    Ok(Json(users))
}
