// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;

use super::parse_item_id;
use crate::{
    application::{
        dto::{assignment_request::AssignmentRequestDto, work_item_response::WorkItemDto},
        use_cases::assignment_use_case::AssignmentUseCase,
    },
    domain::{
        models::work_item::WorkItemType,
        repositories::{
            directory_repository::DirectoryRepository, work_item_repository::WorkItemRepository,
        },
    },
    presentation::{
        errors::AppError,
        extractors::{current_user::CurrentUser, json_body::JsonBody},
    },
};

/// 修改工单/任务分配
///
/// `PATCH /api/tickets/{id}/assignment`、`PATCH /api/tasks/{id}/assignment`
pub async fn update_assignment<WR, DR>(
    Extension(work_items): Extension<Arc<WR>>,
    Extension(directory): Extension<Arc<DR>>,
    Extension(item_type): Extension<WorkItemType>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<AssignmentRequestDto>,
) -> Result<Json<WorkItemDto>, AppError>
where
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
{
    let id = parse_item_id(item_type, &id)?;
    let use_case = AssignmentUseCase::new(work_items, directory);
    let item = use_case.assign(&actor, item_type, id, payload).await?;
    Ok(Json(item))
}
