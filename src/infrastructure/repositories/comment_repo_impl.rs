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

use crate::domain::models::activity::NewNotification;
use crate::domain::models::comment::{Comment, CommentWithAuthor};
use crate::domain::models::user::UserSummary;
use crate::domain::repositories::comment_repository::{CommentRepository, NewComment};
use crate::domain::repositories::work_item_repository::RepositoryError;
use crate::domain::services::audit;
use crate::infrastructure::database::entities::{comment as comment_entity, user};
use crate::infrastructure::repositories::activity_writer::{
    insert_activity_logs, insert_notifications,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 评论仓库实现
#[derive(Clone)]
pub struct CommentRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CommentRepositoryImpl {
    /// 创建新的评论仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<comment_entity::Model> for Comment {
    fn from(model: comment_entity::Model) -> Self {
        Self {
            id: model.id,
            work_item_id: model.work_item_id,
            user_id: model.user_id,
            content: model.content,
            is_internal: model.is_internal,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn create(
        &self,
        comment: NewComment,
        notification: Option<NewNotification>,
    ) -> Result<Comment, RepositoryError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();

        let model = comment_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            work_item_id: Set(comment.work_item_id),
            user_id: Set(comment.user_id),
            content: Set(comment.content),
            is_internal: Set(comment.is_internal),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let log = audit::comment_added(
            model.work_item_id,
            model.user_id,
            model.id,
            model.is_internal,
        );
        insert_activity_logs(&txn, &[log], now).await?;
        if let Some(notification) = notification {
            insert_notifications(&txn, &[notification], now).await?;
        }

        txn.commit().await?;
        Ok(model.into())
    }

    async fn list_for_work_item(
        &self,
        work_item_id: Uuid,
        include_internal: bool,
    ) -> Result<Vec<CommentWithAuthor>, RepositoryError> {
        let mut select = comment_entity::Entity::find()
            .filter(comment_entity::Column::WorkItemId.eq(work_item_id));
        if !include_internal {
            select = select.filter(comment_entity::Column::IsInternal.eq(false));
        }
        let comments = select
            .order_by_asc(comment_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let author_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        let authors: HashMap<Uuid, UserSummary> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            user::Entity::find()
                .filter(user::Column::Id.is_in(author_ids))
                .all(self.db.as_ref())
                .await?
                .into_iter()
                .map(|u| (u.id, u.into()))
                .collect()
        };

        Ok(comments
            .into_iter()
            .map(|c| CommentWithAuthor {
                author: authors.get(&c.user_id).cloned(),
                comment: c.into(),
            })
            .collect())
    }
}
