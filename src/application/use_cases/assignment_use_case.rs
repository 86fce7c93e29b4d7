// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::application::dto::assignment_request::AssignmentRequestDto;
use crate::application::dto::work_item_response::WorkItemDto;
use crate::domain::models::user::{Actor, UserSummary};
use crate::domain::models::work_item::{DomainError, WorkItem, WorkItemType};
use crate::domain::repositories::directory_repository::DirectoryRepository;
use crate::domain::repositories::work_item_repository::WorkItemRepository;
use crate::domain::services::assignment_service::{
    self, AssignmentAction, AssignmentContext, AssignmentIntent,
};
use crate::infrastructure::metrics;

pub const INVALID_SESSION_MESSAGE: &str =
    "Your session is invalid. Please log out and log back in.";

/// 分配用例
///
/// 协调请求解析、权限校验、引用解析、计划生成与事务执行
pub struct AssignmentUseCase<WR, DR> {
    work_items: Arc<WR>,
    directory: Arc<DR>,
}

impl<WR, DR> AssignmentUseCase<WR, DR>
where
    WR: WorkItemRepository + 'static,
    DR: DirectoryRepository + 'static,
{
    pub fn new(work_items: Arc<WR>, directory: Arc<DR>) -> Self {
        Self {
            work_items,
            directory,
        }
    }

    /// 修改工作项分配
    ///
    /// 检查顺序：工作项 → 调用者用户记录 → 角色 → 请求体解析与动作识别 → 引用解析。
    /// 所有检查在写入之前完成，写入在单个事务中执行。
    ///
    /// # 参数
    ///
    /// * `actor` - 已认证的调用者
    /// * `item_type` - 路由对应的工作项类型
    /// * `id` - 工作项ID
    /// * `dto` - 分配请求
    ///
    /// # 返回值
    ///
    /// * `Ok(WorkItemDto)` - 更新后的工作项及其关联
    /// * `Err(DomainError)` - 校验、权限或并发冲突错误
    pub async fn assign(
        &self,
        actor: &Actor,
        item_type: WorkItemType,
        id: Uuid,
        dto: AssignmentRequestDto,
    ) -> Result<WorkItemDto, DomainError> {
        let item = self.find_item(item_type, id).await?;
        let actor_user = self
            .directory
            .find_user(actor.user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized(INVALID_SESSION_MESSAGE.to_string()))?;

        assignment_service::authorize(dto.is_claim(item_type), actor.role, item_type)?;
        let intent = dto.into_intent(item_type)?.ok_or_else(|| {
            DomainError::BadRequest("No valid assignment action provided".to_string())
        })?;
        let action = self.resolve(intent).await?;
        let label = action.label();

        let assignees = self.work_items.find_assignees(item.id).await?;
        let current_team = match item.team_id {
            Some(team_id) => self.directory.find_team(team_id).await?,
            None => None,
        };
        let legacy_assignee = match item.assignee_id {
            Some(user_id) => self.directory.find_user(user_id).await?,
            None => None,
        };

        let ctx = AssignmentContext {
            item: &item,
            assignees: &assignees,
            current_team: current_team.as_ref(),
            legacy_assignee: legacy_assignee.as_ref(),
            actor,
            actor_name: &actor_user.name,
        };
        let plan = assignment_service::plan(&ctx, action)?;
        debug!(
            "Assignment plan for {}: remove {:?}, add {:?}",
            item.display_number(),
            plan.remove,
            plan.add
        );

        self.work_items.apply_assignment(&plan).await?;
        metrics::record_assignment(label);
        info!(
            "{} {} assignment ({}) by {}",
            item_type.title_noun(),
            item.display_number(),
            label,
            actor.user_id
        );

        let updated = self.find_item(item_type, id).await?;
        Ok(self.work_items.load_details(updated).await?.into())
    }

    async fn find_item(&self, item_type: WorkItemType, id: Uuid) -> Result<WorkItem, DomainError> {
        self.work_items
            .find_by_id(id)
            .await?
            .filter(|item| item.item_type == item_type)
            .ok_or_else(|| DomainError::NotFound(item_type.not_found_message()))
    }

    /// 解析意图中引用的团队与用户，不存在时返回 404
    async fn resolve(&self, intent: AssignmentIntent) -> Result<AssignmentAction, DomainError> {
        match intent {
            AssignmentIntent::Claim => Ok(AssignmentAction::Claim),
            AssignmentIntent::Team(None) => Ok(AssignmentAction::Team(None)),
            AssignmentIntent::Team(Some(team_id)) => {
                let team = self
                    .directory
                    .find_team(team_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound("Team not found".to_string()))?;
                Ok(AssignmentAction::Team(Some(team)))
            }
            AssignmentIntent::Individuals(ids) => {
                let users = resolve_users(self.directory.as_ref(), &ids).await?;
                Ok(AssignmentAction::Individuals(users))
            }
            AssignmentIntent::Single(None) => Ok(AssignmentAction::Single(None)),
            AssignmentIntent::Single(Some(user_id)) => {
                let user = self
                    .directory
                    .find_user(user_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;
                Ok(AssignmentAction::Single(Some(user)))
            }
        }
    }
}

/// 按请求顺序解析用户，任一不存在时返回 404
pub async fn resolve_users<DR>(directory: &DR, ids: &[Uuid]) -> Result<Vec<UserSummary>, DomainError>
where
    DR: DirectoryRepository + ?Sized,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = directory.find_users(ids).await?;
    ids.iter()
        .map(|id| {
            found
                .iter()
                .find(|user| user.id == *id)
                .cloned()
                .ok_or_else(|| DomainError::NotFound("User not found".to_string()))
        })
        .collect()
}
