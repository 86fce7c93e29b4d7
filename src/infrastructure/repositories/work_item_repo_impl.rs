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

use crate::domain::models::activity::{ActivityLog, NewActivityLog};
use crate::domain::models::user::UserSummary;
use crate::domain::models::work_item::{
    AssignmentMode, Assignee, WorkItem, WorkItemDetails, WorkItemStatus, WorkItemType,
};
use crate::domain::repositories::work_item_repository::{
    NewWorkItem, RepositoryError, WorkItemQuery, WorkItemRepository,
};
use crate::domain::services::access_policy::ListScope;
use crate::domain::services::assignment_service::{
    assignment_notification, legacy_mirror, AssigneeRemoval, AssignmentPlan,
};
use crate::domain::services::audit;
use crate::domain::services::numbering::{format_display_number, parse_display_number};
use crate::domain::services::team_routing::InitialAssignment;
use crate::infrastructure::database::entities::{
    activity_log, category, project, team, user, work_item as work_item_entity,
    work_item_assignee, work_item_sequence,
};
use crate::infrastructure::repositories::activity_writer::{
    insert_activity_logs, insert_notifications,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 工作项仓库实现
///
/// 基于SeaORM实现的工作项数据访问层，所有写操作在单个事务中完成
#[derive(Clone)]
pub struct WorkItemRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl WorkItemRepositoryImpl {
    /// 创建新的工作项仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的工作项仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 在事务内递增并返回该类型的下一个序号
    async fn next_sequence(
        txn: &DatabaseTransaction,
        item_type: WorkItemType,
    ) -> Result<i64, RepositoryError> {
        let kind = item_type.to_string();
        let updated = work_item_sequence::Entity::update_many()
            .col_expr(
                work_item_sequence::Column::LastValue,
                Expr::col(work_item_sequence::Column::LastValue).add(1),
            )
            .filter(work_item_sequence::Column::Kind.eq(kind.clone()))
            .exec(txn)
            .await?;

        if updated.rows_affected == 0 {
            // Counter row missing, seed it from the highest number on record
            let seed = Self::highest_existing_number(txn, item_type).await? + 1;
            work_item_sequence::ActiveModel {
                kind: Set(kind),
                last_value: Set(seed as i32),
            }
            .insert(txn)
            .await?;
            return Ok(seed);
        }

        let row = work_item_sequence::Entity::find_by_id(kind)
            .one(txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(i64::from(row.last_value))
    }

    async fn highest_existing_number(
        txn: &DatabaseTransaction,
        item_type: WorkItemType,
    ) -> Result<i64, RepositoryError> {
        let column = match item_type {
            WorkItemType::Ticket => work_item_entity::Column::TicketNumber,
            WorkItemType::Task => work_item_entity::Column::TaskNumber,
        };
        let numbers: Vec<Option<String>> = work_item_entity::Entity::find()
            .select_only()
            .column(column)
            .filter(work_item_entity::Column::ItemType.eq(item_type.to_string()))
            .into_tuple()
            .all(txn)
            .await?;

        Ok(numbers
            .iter()
            .flatten()
            .filter_map(|n| parse_display_number(item_type, n))
            .max()
            .unwrap_or(0))
    }

    async fn insert_assignees(
        txn: &DatabaseTransaction,
        work_item_id: Uuid,
        user_ids: &[Uuid],
        assigned_by: Uuid,
        now: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        for (offset, user_id) in user_ids.iter().enumerate() {
            // Keep insertion order stable under ORDER BY assigned_at
            work_item_assignee::ActiveModel {
                work_item_id: Set(work_item_id),
                user_id: Set(*user_id),
                assigned_by: Set(assigned_by),
                assigned_at: Set(now + Duration::microseconds(offset as i64)),
            }
            .insert(txn)
            .await?;
        }
        Ok(())
    }
}

impl From<work_item_entity::Model> for WorkItem {
    fn from(model: work_item_entity::Model) -> Self {
        Self {
            id: model.id,
            item_type: model.item_type.parse().unwrap_or(WorkItemType::Ticket),
            ticket_number: model.ticket_number,
            task_number: model.task_number,
            title: model.title,
            description: model.description,
            status: model.status.parse().unwrap_or_default(),
            priority: model.priority.parse().unwrap_or_default(),
            assignment_mode: model.assignment_mode.and_then(|m| m.parse().ok()),
            team_id: model.team_id,
            assignee_id: model.assignee_id,
            creator_id: model.creator_id,
            category_id: model.category_id,
            project_id: model.project_id,
            due_date: model.due_date,
            estimated_hours: model.estimated_hours,
            completed_at: model.completed_at,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<WorkItem> for work_item_entity::ActiveModel {
    fn from(item: WorkItem) -> Self {
        Self {
            id: Set(item.id),
            item_type: Set(item.item_type.to_string()),
            ticket_number: Set(item.ticket_number),
            task_number: Set(item.task_number),
            title: Set(item.title),
            description: Set(item.description),
            status: Set(item.status.to_string()),
            priority: Set(item.priority.to_string()),
            assignment_mode: Set(item.assignment_mode.map(|m| m.to_string())),
            team_id: Set(item.team_id),
            assignee_id: Set(item.assignee_id),
            creator_id: Set(item.creator_id),
            category_id: Set(item.category_id),
            project_id: Set(item.project_id),
            due_date: Set(item.due_date),
            estimated_hours: Set(item.estimated_hours),
            completed_at: Set(item.completed_at),
            version: Set(item.version),
            created_at: Set(item.created_at),
            updated_at: Set(item.updated_at),
        }
    }
}

impl From<activity_log::Model> for ActivityLog {
    fn from(model: activity_log::Model) -> Self {
        Self {
            id: model.id,
            work_item_id: model.work_item_id,
            user_id: model.user_id,
            action: model.action,
            changes: model.changes,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl WorkItemRepository for WorkItemRepositoryImpl {
    async fn create(&self, new_item: NewWorkItem) -> Result<WorkItem, RepositoryError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();

        let sequence = Self::next_sequence(&txn, new_item.item_type).await?;
        let number = format_display_number(new_item.item_type, sequence);

        let (assignment_mode, team_id, assignee_ids) = match new_item.assignment {
            InitialAssignment::Unassigned => (None, None, Vec::new()),
            InitialAssignment::Team(team_id) => (Some(AssignmentMode::Team), Some(team_id), Vec::new()),
            InitialAssignment::Individuals(ids) => (Some(AssignmentMode::Individuals), None, ids),
        };

        let item = WorkItem {
            id: Uuid::new_v4(),
            item_type: new_item.item_type,
            ticket_number: (new_item.item_type == WorkItemType::Ticket).then(|| number.clone()),
            task_number: (new_item.item_type == WorkItemType::Task).then(|| number.clone()),
            title: new_item.title,
            description: new_item.description,
            status: WorkItemStatus::Open,
            priority: new_item.priority,
            assignment_mode,
            team_id,
            assignee_id: legacy_mirror(&assignee_ids),
            creator_id: new_item.creator_id,
            category_id: new_item.category_id,
            project_id: new_item.project_id,
            due_date: new_item.due_date,
            estimated_hours: new_item.estimated_hours,
            completed_at: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        work_item_entity::ActiveModel::from(item.clone())
            .insert(&txn)
            .await?;
        Self::insert_assignees(&txn, item.id, &assignee_ids, item.creator_id, now).await?;

        let notifications: Vec<_> = new_item
            .notify_user_ids
            .iter()
            .map(|user_id| assignment_notification(&item, *user_id))
            .collect();
        insert_notifications(&txn, &notifications, now).await?;
        insert_activity_logs(
            &txn,
            &[audit::work_item_created(&item, assignee_ids.len())],
            now,
        )
        .await?;

        txn.commit().await?;
        debug!("Created work item {} ({})", number, item.id);
        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkItem>, RepositoryError> {
        let model = work_item_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_assignees(&self, work_item_id: Uuid) -> Result<Vec<Assignee>, RepositoryError> {
        let rows = work_item_assignee::Entity::find()
            .filter(work_item_assignee::Column::WorkItemId.eq(work_item_id))
            .order_by_asc(work_item_assignee::Column::AssignedAt)
            .all(self.db.as_ref())
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = rows.iter().map(|r| r.user_id).collect();
        let users: HashMap<Uuid, UserSummary> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|u| (u.id, u.into()))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| Assignee {
                user: users.get(&row.user_id).cloned(),
                user_id: row.user_id,
                assigned_by: row.assigned_by,
                assigned_at: row.assigned_at,
            })
            .collect())
    }

    async fn load_details(&self, item: WorkItem) -> Result<WorkItemDetails, RepositoryError> {
        let db = self.db.as_ref();
        let assignees = self.find_assignees(item.id).await?;

        let creator = user::Entity::find_by_id(item.creator_id).one(db).await?;
        let assignee = match item.assignee_id {
            Some(id) => user::Entity::find_by_id(id).one(db).await?,
            None => None,
        };
        let team = match item.team_id {
            Some(id) => team::Entity::find_by_id(id).one(db).await?,
            None => None,
        };
        let category = match item.category_id {
            Some(id) => category::Entity::find_by_id(id).one(db).await?,
            None => None,
        };
        let project = match item.project_id {
            Some(id) => project::Entity::find_by_id(id).one(db).await?,
            None => None,
        };

        Ok(WorkItemDetails {
            item,
            creator: creator.map(Into::into),
            assignee: assignee.map(Into::into),
            team: team.map(Into::into),
            category: category.map(Into::into),
            project: project.map(Into::into),
            assignees,
        })
    }

    async fn apply_assignment(&self, plan: &AssignmentPlan) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();

        let updated = work_item_entity::Entity::update_many()
            .col_expr(
                work_item_entity::Column::AssignmentMode,
                Expr::value(plan.assignment_mode.map(|m| m.to_string())),
            )
            .col_expr(work_item_entity::Column::TeamId, Expr::value(plan.team_id))
            .col_expr(
                work_item_entity::Column::AssigneeId,
                Expr::value(plan.assignee_id),
            )
            .col_expr(
                work_item_entity::Column::Status,
                Expr::value(plan.status.to_string()),
            )
            .col_expr(
                work_item_entity::Column::Version,
                Expr::col(work_item_entity::Column::Version).add(1),
            )
            .col_expr(work_item_entity::Column::UpdatedAt, Expr::value(now))
            .filter(work_item_entity::Column::Id.eq(plan.work_item_id))
            .filter(work_item_entity::Column::Version.eq(plan.expected_version))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            // Dropping the transaction rolls it back
            return Err(RepositoryError::Conflict);
        }

        let removal = work_item_assignee::Entity::delete_many()
            .filter(work_item_assignee::Column::WorkItemId.eq(plan.work_item_id));
        match &plan.remove {
            AssigneeRemoval::Nothing => {}
            AssigneeRemoval::All => {
                removal.exec(&txn).await?;
            }
            AssigneeRemoval::Only(user_ids) if !user_ids.is_empty() => {
                removal
                    .filter(work_item_assignee::Column::UserId.is_in(user_ids.clone()))
                    .exec(&txn)
                    .await?;
            }
            AssigneeRemoval::Only(_) => {}
        }

        Self::insert_assignees(&txn, plan.work_item_id, &plan.add, plan.actor_id, now).await?;
        insert_activity_logs(&txn, &plan.activity_logs, now).await?;
        insert_notifications(&txn, &plan.notifications, now).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn save_update(
        &self,
        item: &WorkItem,
        expected_version: i32,
        log: Option<NewActivityLog>,
    ) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let updated = work_item_entity::Entity::update_many()
            .col_expr(work_item_entity::Column::Title, Expr::value(item.title.clone()))
            .col_expr(
                work_item_entity::Column::Description,
                Expr::value(item.description.clone()),
            )
            .col_expr(
                work_item_entity::Column::Status,
                Expr::value(item.status.to_string()),
            )
            .col_expr(
                work_item_entity::Column::Priority,
                Expr::value(item.priority.to_string()),
            )
            .col_expr(
                work_item_entity::Column::CategoryId,
                Expr::value(item.category_id),
            )
            .col_expr(
                work_item_entity::Column::ProjectId,
                Expr::value(item.project_id),
            )
            .col_expr(work_item_entity::Column::DueDate, Expr::value(item.due_date))
            .col_expr(
                work_item_entity::Column::EstimatedHours,
                Expr::value(item.estimated_hours),
            )
            .col_expr(
                work_item_entity::Column::CompletedAt,
                Expr::value(item.completed_at),
            )
            .col_expr(
                work_item_entity::Column::Version,
                Expr::col(work_item_entity::Column::Version).add(1),
            )
            .col_expr(
                work_item_entity::Column::UpdatedAt,
                Expr::value(item.updated_at),
            )
            .filter(work_item_entity::Column::Id.eq(item.id))
            .filter(work_item_entity::Column::Version.eq(expected_version))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(RepositoryError::Conflict);
        }

        if let Some(log) = log {
            insert_activity_logs(&txn, &[log], item.updated_at).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn query(&self, query: WorkItemQuery) -> Result<(Vec<WorkItem>, u64), RepositoryError> {
        let mut select = work_item_entity::Entity::find()
            .filter(work_item_entity::Column::ItemType.eq(query.item_type.to_string()));

        if let Some(status) = query.status {
            select = select.filter(work_item_entity::Column::Status.eq(status.to_string()));
        }
        if let Some(priority) = query.priority {
            select = select.filter(work_item_entity::Column::Priority.eq(priority.to_string()));
        }

        if let ListScope::Related {
            user_id,
            team_id,
            team_mode_only,
        } = query.scope
        {
            let assigned_ids: Vec<Uuid> = work_item_assignee::Entity::find()
                .select_only()
                .column(work_item_assignee::Column::WorkItemId)
                .filter(work_item_assignee::Column::UserId.eq(user_id))
                .into_tuple()
                .all(self.db.as_ref())
                .await?;

            let mut related = Condition::any()
                .add(work_item_entity::Column::CreatorId.eq(user_id))
                .add(work_item_entity::Column::AssigneeId.eq(user_id));
            if !assigned_ids.is_empty() {
                related = related.add(work_item_entity::Column::Id.is_in(assigned_ids));
            }
            if let Some(team_id) = team_id {
                let mut same_team =
                    Condition::all().add(work_item_entity::Column::TeamId.eq(team_id));
                if team_mode_only {
                    same_team = same_team.add(
                        work_item_entity::Column::AssignmentMode
                            .eq(AssignmentMode::Team.to_string()),
                    );
                }
                related = related.add(same_team);
            }
            select = select.filter(related);
        }

        let paginator = select
            .order_by_desc(work_item_entity::Column::CreatedAt)
            .paginate(self.db.as_ref(), query.limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(query.page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn recent_activity(
        &self,
        work_item_id: Uuid,
        limit: u64,
    ) -> Result<Vec<ActivityLog>, RepositoryError> {
        let models = activity_log::Entity::find()
            .filter(activity_log::Column::WorkItemId.eq(work_item_id))
            .order_by_desc(activity_log::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
