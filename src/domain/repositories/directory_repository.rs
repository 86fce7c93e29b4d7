// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::{
    CategorySummary, Role, TeamSummary, TeamWithMembers, UserSummary,
};
use crate::domain::repositories::work_item_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 目录仓库特质
///
/// 只读访问用户、团队与分类
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, RepositoryError>;
    /// 批量查找用户，不保证顺序
    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, RepositoryError>;
    async fn find_team(&self, id: Uuid) -> Result<Option<TeamSummary>, RepositoryError>;
    /// 全部团队及成员数，按名称排序
    async fn list_teams(&self) -> Result<Vec<TeamWithMembers>, RepositoryError>;
    /// 全局分类加上指定团队的分类，按名称排序
    async fn list_categories(
        &self,
        team_id: Option<Uuid>,
    ) -> Result<Vec<CategorySummary>, RepositoryError>;
    /// 活跃用户，可按角色与团队过滤，按名称排序
    async fn list_active_users(
        &self,
        roles: Option<Vec<Role>>,
        team_id: Option<Uuid>,
    ) -> Result<Vec<UserSummary>, RepositoryError>;
}
