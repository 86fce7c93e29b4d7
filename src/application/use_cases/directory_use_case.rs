// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::models::user::{Actor, CategorySummary, Role, TeamWithMembers, UserSummary};
use crate::domain::models::work_item::DomainError;
use crate::domain::repositories::directory_repository::DirectoryRepository;

/// 参考数据读取：团队、分类与可分配用户
pub struct DirectoryUseCase<DR> {
    directory: Arc<DR>,
}

impl<DR> DirectoryUseCase<DR>
where
    DR: DirectoryRepository + 'static,
{
    pub fn new(directory: Arc<DR>) -> Self {
        Self { directory }
    }

    pub async fn teams(&self) -> Result<Vec<TeamWithMembers>, DomainError> {
        Ok(self.directory.list_teams().await?)
    }

    /// 全局分类与调用者团队的分类
    pub async fn categories(&self, actor: &Actor) -> Result<Vec<CategorySummary>, DomainError> {
        Ok(self.directory.list_categories(actor.team_id).await?)
    }

    /// 可接单的服务人员
    pub async fn agents(&self, team_id: Option<Uuid>) -> Result<Vec<UserSummary>, DomainError> {
        Ok(self
            .directory
            .list_active_users(Some(Role::staff_roles().to_vec()), team_id)
            .await?)
    }

    /// 任务可分配的用户，普通用户无权查看
    pub async fn task_assignable(
        &self,
        actor: &Actor,
        team_id: Option<Uuid>,
    ) -> Result<Vec<UserSummary>, DomainError> {
        if actor.role == Role::User {
            return Err(DomainError::Forbidden("Access denied".to_string()));
        }
        Ok(self.directory.list_active_users(None, team_id).await?)
    }
}
