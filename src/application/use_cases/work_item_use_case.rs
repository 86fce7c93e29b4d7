// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::assignment_use_case::{resolve_users, INVALID_SESSION_MESSAGE};
use crate::application::dto::work_item_request::{
    CreateWorkItemRequestDto, ListWorkItemsQueryDto, UpdateWorkItemRequestDto,
};
use crate::application::dto::work_item_response::{PageDto, WorkItemDetailDto, WorkItemDto};
use crate::config::settings::PaginationSettings;
use crate::domain::models::user::{Actor, Role};
use crate::domain::models::work_item::{DomainError, WorkItem, WorkItemType};
use crate::domain::repositories::comment_repository::CommentRepository;
use crate::domain::repositories::directory_repository::DirectoryRepository;
use crate::domain::repositories::time_log_repository::TimeLogRepository;
use crate::domain::repositories::work_item_repository::{
    NewWorkItem, WorkItemQuery, WorkItemRepository,
};
use crate::domain::services::access_policy;
use crate::domain::services::audit;
use crate::domain::services::team_routing::{self, InitialAssignment, RoutingTargets};
use crate::infrastructure::metrics;

const DETAIL_TIME_LOG_LIMIT: u64 = 10;
const DETAIL_ACTIVITY_LIMIT: u64 = 20;

/// 工作项用例：创建、更新、单项读取与列表
pub struct WorkItemUseCase<WR, DR, TR, CR> {
    work_items: Arc<WR>,
    directory: Arc<DR>,
    time_logs: Arc<TR>,
    comments: Arc<CR>,
}

impl<WR, DR, TR, CR> WorkItemUseCase<WR, DR, TR, CR>
where
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
    TR: TimeLogRepository + 'static,
    CR: CommentRepository + 'static,
{
    pub fn new(
        work_items: Arc<WR>,
        directory: Arc<DR>,
        time_logs: Arc<TR>,
        comments: Arc<CR>,
    ) -> Self {
        Self {
            work_items,
            directory,
            time_logs,
            comments,
        }
    }

    /// 创建工单或任务
    ///
    /// # 参数
    ///
    /// * `actor` - 创建者
    /// * `item_type` - 工作项类型
    /// * `dto` - 创建请求
    /// * `routing` - 未指定分配时工单的默认团队
    ///
    /// # 返回值
    ///
    /// * `Ok(WorkItemDto)` - 新建的工作项
    /// * `Err(DomainError)` - 权限、校验或引用错误
    pub async fn create(
        &self,
        actor: &Actor,
        item_type: WorkItemType,
        dto: CreateWorkItemRequestDto,
        routing: &RoutingTargets,
    ) -> Result<WorkItemDto, DomainError> {
        if item_type == WorkItemType::Task && actor.role == Role::User {
            return Err(DomainError::Forbidden(
                "You do not have permission to create tasks. Only Admins, Managers, and Agents can create tasks."
                    .to_string(),
            ));
        }
        dto.validate()?;

        if self.directory.find_user(actor.user_id).await?.is_none() {
            return Err(DomainError::Unauthorized(INVALID_SESSION_MESSAGE.to_string()));
        }

        let input = dto.assignment_input(item_type);
        let assignment = team_routing::initial_assignment(item_type, input, actor, routing);
        let notify_user_ids = match &assignment {
            InitialAssignment::Team(team_id) => {
                if self.directory.find_team(*team_id).await?.is_none() {
                    return Err(DomainError::NotFound("Team not found".to_string()));
                }
                Vec::new()
            }
            InitialAssignment::Individuals(ids) => {
                resolve_users(self.directory.as_ref(), ids).await?;
                ids.iter()
                    .copied()
                    .filter(|id| *id != actor.user_id)
                    .collect()
            }
            InitialAssignment::Unassigned => Vec::new(),
        };

        let is_task = item_type == WorkItemType::Task;
        let item = self
            .work_items
            .create(NewWorkItem {
                item_type,
                title: dto.title,
                description: dto.description,
                priority: dto.priority,
                creator_id: actor.user_id,
                category_id: dto.category_id,
                project_id: dto.project_id.filter(|_| is_task),
                due_date: dto.due_date,
                estimated_hours: dto.estimated_hours.filter(|_| is_task),
                assignment,
                notify_user_ids,
            })
            .await?;

        metrics::record_work_item_created(item_type.noun());
        info!(
            "{} {} created by {}",
            item_type.title_noun(),
            item.display_number(),
            actor.user_id
        );
        Ok(self.work_items.load_details(item).await?.into())
    }

    /// 部分更新字段，不涉及分配
    ///
    /// 服务人员、创建者或受理人可更新，其余返回 403
    pub async fn update(
        &self,
        actor: &Actor,
        item_type: WorkItemType,
        id: Uuid,
        dto: UpdateWorkItemRequestDto,
    ) -> Result<WorkItemDto, DomainError> {
        dto.validate()?;
        let mut item = self.find_item(item_type, id).await?;

        let assignee_ids = self.assignee_ids(item.id).await?;
        if !access_policy::can_access(actor, &item, &assignee_ids) {
            return Err(DomainError::Forbidden("Access denied".to_string()));
        }

        let expected_version = item.version;
        let changes = item.apply_update(&dto.into_update(item_type), Utc::now().fixed_offset());
        let log = audit::work_item_updated(&item, actor.user_id, changes);
        self.work_items
            .save_update(&item, expected_version, log)
            .await?;

        let updated = self.find_item(item_type, id).await?;
        Ok(self.work_items.load_details(updated).await?.into())
    }

    /// 读取单项详情
    ///
    /// 无权访问与不存在返回相同的 404
    pub async fn get(
        &self,
        actor: &Actor,
        item_type: WorkItemType,
        id: Uuid,
    ) -> Result<WorkItemDetailDto, DomainError> {
        let item = self.find_item(item_type, id).await?;
        let assignee_ids = self.assignee_ids(item.id).await?;
        if !access_policy::can_access(actor, &item, &assignee_ids) {
            return Err(DomainError::NotFound(item_type.not_found_message()));
        }

        let include_internal = access_policy::can_see_internal_comments(actor.role);
        let comments = self
            .comments
            .list_for_work_item(item.id, include_internal)
            .await?;
        let time_logs = self
            .time_logs
            .recent_for_work_item(item.id, DETAIL_TIME_LOG_LIMIT)
            .await?;
        let activity = self
            .work_items
            .recent_activity(item.id, DETAIL_ACTIVITY_LIMIT)
            .await?;
        let details = self.work_items.load_details(item).await?;

        Ok(WorkItemDetailDto {
            item: details.into(),
            comments: comments.into_iter().map(Into::into).collect(),
            time_logs: time_logs.into_iter().map(Into::into).collect(),
            activity_logs: activity.into_iter().map(Into::into).collect(),
        })
    }

    /// 按角色范围分页列出工作项，按创建时间倒序
    pub async fn list(
        &self,
        actor: &Actor,
        item_type: WorkItemType,
        query: ListWorkItemsQueryDto,
        pagination: &PaginationSettings,
    ) -> Result<PageDto<WorkItemDto>, DomainError> {
        let (page, limit) = query.paging(pagination.default_limit, pagination.max_limit);
        let scope = access_policy::list_scope(actor, query.mine.unwrap_or(false));

        let (items, total) = self
            .work_items
            .query(WorkItemQuery {
                item_type,
                scope,
                status: query.status,
                priority: query.priority,
                page,
                limit,
            })
            .await?;

        let mut data = Vec::with_capacity(items.len());
        for item in items {
            data.push(self.work_items.load_details(item).await?.into());
        }
        Ok(PageDto::new(data, total, page, limit))
    }

    async fn find_item(&self, item_type: WorkItemType, id: Uuid) -> Result<WorkItem, DomainError> {
        self.work_items
            .find_by_id(id)
            .await?
            .filter(|item| item.item_type == item_type)
            .ok_or_else(|| DomainError::NotFound(item_type.not_found_message()))
    }

    async fn assignee_ids(&self, work_item_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        Ok(self
            .work_items
            .find_assignees(work_item_id)
            .await?
            .into_iter()
            .map(|a| a.user_id)
            .collect())
    }
}
