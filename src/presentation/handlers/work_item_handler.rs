// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::parse_item_id;
use crate::{
    application::{
        dto::{
            work_item_request::{
                CreateWorkItemRequestDto, ListWorkItemsQueryDto, UpdateWorkItemRequestDto,
            },
            work_item_response::{PageDto, WorkItemDetailDto, WorkItemDto},
        },
        use_cases::work_item_use_case::WorkItemUseCase,
    },
    config::settings::Settings,
    domain::{
        models::work_item::WorkItemType,
        repositories::{
            comment_repository::CommentRepository, directory_repository::DirectoryRepository,
            time_log_repository::TimeLogRepository, work_item_repository::WorkItemRepository,
        },
    },
    presentation::{
        errors::AppError,
        extractors::{current_user::CurrentUser, json_body::JsonBody},
    },
};

/// 请求所需的仓库集合
pub struct Repositories<WR, DR, TR, CR> {
    pub work_items: Arc<WR>,
    pub directory: Arc<DR>,
    pub time_logs: Arc<TR>,
    pub comments: Arc<CR>,
}

impl<WR, DR, TR, CR> Repositories<WR, DR, TR, CR>
where
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
    TR: TimeLogRepository + 'static,
    CR: CommentRepository + 'static,
{
    fn use_case(self) -> WorkItemUseCase<WR, DR, TR, CR> {
        WorkItemUseCase::new(self.work_items, self.directory, self.time_logs, self.comments)
    }
}

/// 分页列出工单/任务
pub async fn list_work_items<WR, DR, TR, CR>(
    Extension(work_items): Extension<Arc<WR>>,
    Extension(directory): Extension<Arc<DR>>,
    Extension(time_logs): Extension<Arc<TR>>,
    Extension(comments): Extension<Arc<CR>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(item_type): Extension<WorkItemType>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ListWorkItemsQueryDto>,
) -> Result<Json<PageDto<WorkItemDto>>, AppError>
where
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
    TR: TimeLogRepository + 'static,
    CR: CommentRepository + 'static,
{
    let use_case = Repositories {
        work_items,
        directory,
        time_logs,
        comments,
    }
    .use_case();
    let page = use_case
        .list(&actor, item_type, query, &settings.pagination)
        .await?;
    Ok(Json(page))
}

/// 创建工单/任务
pub async fn create_work_item<WR, DR, TR, CR>(
    Extension(work_items): Extension<Arc<WR>>,
    Extension(directory): Extension<Arc<DR>>,
    Extension(time_logs): Extension<Arc<TR>>,
    Extension(comments): Extension<Arc<CR>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(item_type): Extension<WorkItemType>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<CreateWorkItemRequestDto>,
) -> Result<(StatusCode, Json<WorkItemDto>), AppError>
where
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
    TR: TimeLogRepository + 'static,
    CR: CommentRepository + 'static,
{
    let use_case = Repositories {
        work_items,
        directory,
        time_logs,
        comments,
    }
    .use_case();
    let item = use_case
        .create(&actor, item_type, payload, &settings.routing.targets())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// 获取单个工单/任务详情
pub async fn get_work_item<WR, DR, TR, CR>(
    Extension(work_items): Extension<Arc<WR>>,
    Extension(directory): Extension<Arc<DR>>,
    Extension(time_logs): Extension<Arc<TR>>,
    Extension(comments): Extension<Arc<CR>>,
    Extension(item_type): Extension<WorkItemType>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<WorkItemDetailDto>, AppError>
where
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
    TR: TimeLogRepository + 'static,
    CR: CommentRepository + 'static,
{
    let id = parse_item_id(item_type, &id)?;
    let use_case = Repositories {
        work_items,
        directory,
        time_logs,
        comments,
    }
    .use_case();
    Ok(Json(use_case.get(&actor, item_type, id).await?))
}

/// 部分更新工单/任务
pub async fn update_work_item<WR, DR, TR, CR>(
    Extension(work_items): Extension<Arc<WR>>,
    Extension(directory): Extension<Arc<DR>>,
    Extension(time_logs): Extension<Arc<TR>>,
    Extension(comments): Extension<Arc<CR>>,
    Extension(item_type): Extension<WorkItemType>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateWorkItemRequestDto>,
) -> Result<Json<WorkItemDto>, AppError>
where
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
    TR: TimeLogRepository + 'static,
    CR: CommentRepository + 'static,
{
    let id = parse_item_id(item_type, &id)?;
    let use_case = Repositories {
        work_items,
        directory,
        time_logs,
        comments,
    }
    .use_case();
    Ok(Json(use_case.update(&actor, item_type, id, payload).await?))
}
