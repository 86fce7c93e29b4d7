// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use tracing::debug;
use validator::Validate;

use super::assignment_use_case::INVALID_SESSION_MESSAGE;
use crate::application::dto::comment_request::CreateCommentRequestDto;
use crate::application::dto::work_item_response::CommentDto;
use crate::domain::models::comment::CommentWithAuthor;
use crate::domain::models::user::Actor;
use crate::domain::models::work_item::DomainError;
use crate::domain::repositories::comment_repository::{CommentRepository, NewComment};
use crate::domain::repositories::directory_repository::DirectoryRepository;
use crate::domain::repositories::work_item_repository::WorkItemRepository;
use crate::domain::services::{access_policy, audit};

pub struct CommentUseCase<CR, WR, DR> {
    comments: Arc<CR>,
    work_items: Arc<WR>,
    directory: Arc<DR>,
}

impl<CR, WR, DR> CommentUseCase<CR, WR, DR>
where
    CR: CommentRepository + 'static,
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
{
    pub fn new(comments: Arc<CR>, work_items: Arc<WR>, directory: Arc<DR>) -> Self {
        Self {
            comments,
            work_items,
            directory,
        }
    }

    /// 添加评论
    ///
    /// 内部评论只允许服务人员发布；他人发布的公开评论会通知创建者
    pub async fn create(
        &self,
        actor: &Actor,
        dto: CreateCommentRequestDto,
    ) -> Result<CommentDto, DomainError> {
        dto.validate()?;
        let item = self
            .work_items
            .find_by_id(dto.work_item_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Work item not found".to_string()))?;

        if dto.is_internal && !access_policy::can_see_internal_comments(actor.role) {
            return Err(DomainError::Forbidden(
                "You do not have permission to create internal comments".to_string(),
            ));
        }

        let author = self
            .directory
            .find_user(actor.user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized(INVALID_SESSION_MESSAGE.to_string()))?;

        let notification = (!dto.is_internal && item.creator_id != actor.user_id)
            .then(|| audit::comment_notification(&item, &author.name));

        let comment = self
            .comments
            .create(
                NewComment {
                    work_item_id: item.id,
                    user_id: actor.user_id,
                    content: dto.content,
                    is_internal: dto.is_internal,
                },
                notification,
            )
            .await?;
        debug!("Comment {} added to {}", comment.id, item.display_number());

        Ok(CommentWithAuthor {
            comment,
            author: Some(author),
        }
        .into())
    }
}
