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

use crate::domain::models::user::{
    CategorySummary, ProjectSummary, Role, TeamSummary, TeamWithMembers, UserSummary,
};
use crate::domain::repositories::directory_repository::DirectoryRepository;
use crate::domain::repositories::work_item_repository::RepositoryError;
use crate::infrastructure::database::entities::{category, project, team, user};
use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 目录仓库实现
///
/// 基于SeaORM的用户、团队与分类只读访问
#[derive(Clone)]
pub struct DirectoryRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl DirectoryRepositoryImpl {
    /// 创建新的目录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<user::Model> for UserSummary {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            avatar: model.avatar,
            role: model.role.parse().unwrap_or(Role::User),
            team_id: model.team_id,
        }
    }
}

impl From<team::Model> for TeamSummary {
    fn from(model: team::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
        }
    }
}

impl From<category::Model> for CategorySummary {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            color: model.color,
            icon: model.icon,
        }
    }
}

impl From<project::Model> for ProjectSummary {
    fn from(model: project::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[async_trait]
impl DirectoryRepository for DirectoryRepositoryImpl {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, RepositoryError> {
        let model = user::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<TeamSummary>, RepositoryError> {
        let model = team::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn list_teams(&self) -> Result<Vec<TeamWithMembers>, RepositoryError> {
        let teams = team::Entity::find()
            .order_by_asc(team::Column::Name)
            .all(self.db.as_ref())
            .await?;

        let counts: HashMap<Uuid, i64> = user::Entity::find()
            .select_only()
            .column(user::Column::TeamId)
            .column_as(Expr::col(user::Column::Id).count(), "member_count")
            .filter(user::Column::TeamId.is_not_null())
            .group_by(user::Column::TeamId)
            .into_tuple::<(Option<Uuid>, i64)>()
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .filter_map(|(team_id, count)| team_id.map(|id| (id, count)))
            .collect();

        Ok(teams
            .into_iter()
            .map(|t| TeamWithMembers {
                member_count: counts.get(&t.id).copied().unwrap_or(0).max(0) as u64,
                id: t.id,
                name: t.name,
                color: t.color,
                description: t.description,
            })
            .collect())
    }

    async fn list_categories(
        &self,
        team_id: Option<Uuid>,
    ) -> Result<Vec<CategorySummary>, RepositoryError> {
        let mut visible = Condition::any().add(category::Column::TeamId.is_null());
        if let Some(team_id) = team_id {
            visible = visible.add(category::Column::TeamId.eq(team_id));
        }

        let models = category::Entity::find()
            .filter(visible)
            .order_by_asc(category::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_active_users(
        &self,
        roles: Option<Vec<Role>>,
        team_id: Option<Uuid>,
    ) -> Result<Vec<UserSummary>, RepositoryError> {
        let mut select = user::Entity::find().filter(user::Column::IsActive.eq(true));
        if let Some(roles) = roles {
            let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
            select = select.filter(user::Column::Role.is_in(roles));
        }
        if let Some(team_id) = team_id {
            select = select.filter(user::Column::TeamId.eq(team_id));
        }

        let models = select
            .order_by_asc(user::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
