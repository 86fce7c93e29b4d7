// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::activity::NewNotification;
use crate::domain::models::comment::{Comment, CommentWithAuthor};
use crate::domain::repositories::work_item_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewComment {
    pub work_item_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub is_internal: bool,
}

/// 评论仓库特质
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// 创建评论，同一事务内写入活动日志与可选通知
    async fn create(
        &self,
        comment: NewComment,
        notification: Option<NewNotification>,
    ) -> Result<Comment, RepositoryError>;
    /// 工作项的评论，按时间升序
    async fn list_for_work_item(
        &self,
        work_item_id: Uuid,
        include_internal: bool,
    ) -> Result<Vec<CommentWithAuthor>, RepositoryError>;
}
