// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::activity::{ActivityLog, NewActivityLog};
use crate::domain::models::work_item::{
    Assignee, Priority, WorkItem, WorkItemDetails, WorkItemStatus, WorkItemType,
};
use crate::domain::services::access_policy::ListScope;
use crate::domain::services::assignment_service::AssignmentPlan;
use crate::domain::services::team_routing::InitialAssignment;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 版本号不匹配，记录已被并发修改
    #[error("Record was modified concurrently")]
    Conflict,
}

/// 待创建的工作项
///
/// 编号在创建事务内分配
#[derive(Debug, Clone)]
pub struct NewWorkItem {
    pub item_type: WorkItemType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub creator_id: Uuid,
    pub category_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub estimated_hours: Option<f64>,
    pub assignment: InitialAssignment,
    /// 需要收到分配通知的受理人
    pub notify_user_ids: Vec<Uuid>,
}

/// 工作项列表查询参数
#[derive(Debug, Clone)]
pub struct WorkItemQuery {
    pub item_type: WorkItemType,
    pub scope: ListScope,
    pub status: Option<WorkItemStatus>,
    pub priority: Option<Priority>,
    /// 从 1 开始
    pub page: u64,
    pub limit: u64,
}

/// 工作项仓库特质
///
/// 定义工作项及其受理人、活动日志的数据访问接口
#[async_trait]
pub trait WorkItemRepository: Send + Sync {
    /// 分配编号并创建工作项，同一事务内写入受理人、通知与创建日志
    async fn create(&self, new_item: NewWorkItem) -> Result<WorkItem, RepositoryError>;
    /// 根据ID查找工作项
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkItem>, RepositoryError>;
    /// 受理人列表，按分配时间升序
    async fn find_assignees(&self, work_item_id: Uuid) -> Result<Vec<Assignee>, RepositoryError>;
    /// 加载创建者、受理人、团队、分类与项目
    async fn load_details(&self, item: WorkItem) -> Result<WorkItemDetails, RepositoryError>;
    /// 在单个事务中执行分配计划，版本不匹配时返回 `Conflict`
    async fn apply_assignment(&self, plan: &AssignmentPlan) -> Result<(), RepositoryError>;
    /// 保存已修改的工作项字段，版本不匹配时返回 `Conflict`
    async fn save_update(
        &self,
        item: &WorkItem,
        expected_version: i32,
        log: Option<NewActivityLog>,
    ) -> Result<(), RepositoryError>;
    /// 分页查询，返回当前页与总数
    async fn query(&self, query: WorkItemQuery) -> Result<(Vec<WorkItem>, u64), RepositoryError>;
    /// 最近的活动日志，按时间倒序
    async fn recent_activity(
        &self,
        work_item_id: Uuid,
        limit: u64,
    ) -> Result<Vec<ActivityLog>, RepositoryError>;
}
