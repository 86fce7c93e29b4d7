// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;

use crate::{
    application::{
        dto::{comment_request::CreateCommentRequestDto, work_item_response::CommentDto},
        use_cases::comment_use_case::CommentUseCase,
    },
    domain::repositories::{
        comment_repository::CommentRepository, directory_repository::DirectoryRepository,
        work_item_repository::WorkItemRepository,
    },
    presentation::{
        errors::AppError,
        extractors::{current_user::CurrentUser, json_body::JsonBody},
    },
};

/// 添加评论
pub async fn create_comment<CR, WR, DR>(
    Extension(comments): Extension<Arc<CR>>,
    Extension(work_items): Extension<Arc<WR>>,
    Extension(directory): Extension<Arc<DR>>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<CreateCommentRequestDto>,
) -> Result<(StatusCode, Json<CommentDto>), AppError>
where
    CR: CommentRepository + 'static,
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
{
    let use_case = CommentUseCase::new(comments, work_items, directory);
    let comment = use_case.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
