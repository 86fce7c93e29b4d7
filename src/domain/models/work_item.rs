// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::user::{TeamSummary, UserSummary};
use crate::domain::repositories::work_item_repository::RepositoryError;

/// 工作项实体
///
/// 工单（TICKET）与任务（TASK）共享同一实体，通过 `item_type` 区分。
/// 分配字段（`assignment_mode`、`team_id`、`assignee_id`）始终满足互斥约束：
/// 未分配、分配给团队、分配给个人三者有且仅有一种成立。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// 工作项唯一标识符
    pub id: Uuid,
    /// 工作项类型
    pub item_type: WorkItemType,
    /// 工单编号，如 `T-0001`，仅工单有值
    pub ticket_number: Option<String>,
    /// 任务编号，如 `TASK-0001`，仅任务有值
    pub task_number: Option<String>,
    pub title: String,
    pub description: String,
    pub status: WorkItemStatus,
    pub priority: Priority,
    /// 分配模式，未分配时为空
    pub assignment_mode: Option<AssignmentMode>,
    /// 团队分配目标
    pub team_id: Option<Uuid>,
    /// 兼容字段：第一个受理人，由受理人列表派生，不作为权威数据
    pub assignee_id: Option<Uuid>,
    /// 创建者，创建后不可变
    pub creator_id: Uuid,
    pub category_id: Option<Uuid>,
    /// 所属项目，仅任务使用
    pub project_id: Option<Uuid>,
    pub due_date: Option<DateTime<FixedOffset>>,
    /// 预估工时，仅任务使用
    pub estimated_hours: Option<f64>,
    /// 完成时间，状态为 RESOLVED/CLOSED 时设置
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 乐观并发版本号，每次写入递增
    pub version: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// 工作项类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemType {
    Ticket,
    Task,
}

impl WorkItemType {
    /// 显示编号前缀
    pub fn number_prefix(&self) -> &'static str {
        match self {
            WorkItemType::Ticket => "T-",
            WorkItemType::Task => "TASK-",
        }
    }

    /// 用于消息文本的小写名称
    pub fn noun(&self) -> &'static str {
        match self {
            WorkItemType::Ticket => "ticket",
            WorkItemType::Task => "task",
        }
    }

    /// 用于错误消息与通知标题的首字母大写名称
    pub fn title_noun(&self) -> &'static str {
        match self {
            WorkItemType::Ticket => "Ticket",
            WorkItemType::Task => "Task",
        }
    }

    /// 前端链接路径段
    pub fn path_segment(&self) -> &'static str {
        match self {
            WorkItemType::Ticket => "tickets",
            WorkItemType::Task => "tasks",
        }
    }

    /// 带类型前缀的活动动作标签，例如 `TICKET_ASSIGNED`
    pub fn action(&self, verb: &str) -> String {
        format!("{}_{}", self, verb)
    }

    /// 未找到时的错误消息
    pub fn not_found_message(&self) -> String {
        format!("{} not found", self.title_noun())
    }
}

impl fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WorkItemType::Ticket => write!(f, "TICKET"),
            WorkItemType::Task => write!(f, "TASK"),
        }
    }
}

impl FromStr for WorkItemType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TICKET" => Ok(WorkItemType::Ticket),
            "TASK" => Ok(WorkItemType::Task),
            _ => Err(()),
        }
    }
}

/// 工作项状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemStatus {
    #[default]
    Open,
    InProgress,
    OnHold,
    Resolved,
    Closed,
    Cancelled,
}

/// 状态变更对完成时间的影响
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEffect {
    Set,
    Clear,
    Keep,
}

impl WorkItemStatus {
    pub fn completion_effect(&self) -> CompletionEffect {
        match self {
            WorkItemStatus::Resolved | WorkItemStatus::Closed => CompletionEffect::Set,
            WorkItemStatus::Open | WorkItemStatus::InProgress => CompletionEffect::Clear,
            WorkItemStatus::OnHold | WorkItemStatus::Cancelled => CompletionEffect::Keep,
        }
    }
}

impl fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            WorkItemStatus::Open => "OPEN",
            WorkItemStatus::InProgress => "IN_PROGRESS",
            WorkItemStatus::OnHold => "ON_HOLD",
            WorkItemStatus::Resolved => "RESOLVED",
            WorkItemStatus::Closed => "CLOSED",
            WorkItemStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for WorkItemStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(WorkItemStatus::Open),
            "IN_PROGRESS" => Ok(WorkItemStatus::InProgress),
            "ON_HOLD" => Ok(WorkItemStatus::OnHold),
            "RESOLVED" => Ok(WorkItemStatus::Resolved),
            "CLOSED" => Ok(WorkItemStatus::Closed),
            "CANCELLED" => Ok(WorkItemStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// 优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            "CRITICAL" => Ok(Priority::Critical),
            _ => Err(()),
        }
    }
}

/// 分配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMode {
    Team,
    Individuals,
}

impl fmt::Display for AssignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssignmentMode::Team => write!(f, "team"),
            AssignmentMode::Individuals => write!(f, "individuals"),
        }
    }
}

impl FromStr for AssignmentMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "team" => Ok(AssignmentMode::Team),
            "individuals" => Ok(AssignmentMode::Individuals),
            _ => Err(()),
        }
    }
}

/// 受理人记录
///
/// `user` 在用户记录缺失时为空
#[derive(Debug, Clone, Serialize)]
pub struct Assignee {
    pub user_id: Uuid,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<FixedOffset>,
    pub user: Option<UserSummary>,
}

impl Assignee {
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or("Unknown User")
    }
}

/// 带关联数据的工作项
#[derive(Debug, Clone)]
pub struct WorkItemDetails {
    pub item: WorkItem,
    pub creator: Option<UserSummary>,
    pub assignee: Option<UserSummary>,
    pub team: Option<TeamSummary>,
    pub category: Option<super::user::CategorySummary>,
    pub project: Option<super::user::ProjectSummary>,
    /// 按 `assigned_at` 升序排列
    pub assignees: Vec<Assignee>,
}

/// 部分更新的字段集合
///
/// 外层 `Option` 表示字段是否出现，内层 `Option` 表示是否清空
#[derive(Debug, Clone, Default)]
pub struct WorkItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<WorkItemStatus>,
    pub category_id: Option<Option<Uuid>>,
    pub project_id: Option<Option<Uuid>>,
    pub due_date: Option<Option<DateTime<FixedOffset>>>,
    pub estimated_hours: Option<Option<f64>>,
}

/// 领域错误类型
///
/// 覆盖请求处理中所有可预期的失败，表示层据此选择 HTTP 状态码
#[derive(Error, Debug)]
pub enum DomainError {
    /// 未认证或会话失效
    #[error("{0}")]
    Unauthorized(String),

    /// 角色或关系不允许该操作
    #[error("{0}")]
    Forbidden(String),

    /// 资源不存在或调用者不可见
    #[error("{0}")]
    NotFound(String),

    /// 请求体校验失败，附带字段详情
    #[error("Validation failed")]
    Validation(serde_json::Value),

    /// 业务规则拒绝
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(serde_json::to_value(&errors).unwrap_or(serde_json::Value::Null))
    }
}

impl WorkItem {
    /// 当前类型对应的显示编号
    pub fn display_number(&self) -> &str {
        let number = match self.item_type {
            WorkItemType::Ticket => self.ticket_number.as_deref(),
            WorkItemType::Task => self.task_number.as_deref(),
        };
        number.unwrap_or_default()
    }

    /// 前端详情链接
    pub fn link(&self) -> String {
        format!("/{}/{}", self.item_type.path_segment(), self.id)
    }

    /// 应用部分更新
    ///
    /// 根据新状态维护 `completed_at`，并返回标题、状态、优先级的变更差异
    ///
    /// # 参数
    ///
    /// * `update` - 要应用的字段
    /// * `now` - 当前时间
    ///
    /// # 返回值
    ///
    /// 形如 `{field: {from, to}}` 的变更映射，无变更时为空
    pub fn apply_update(
        &mut self,
        update: &WorkItemUpdate,
        now: DateTime<FixedOffset>,
    ) -> serde_json::Map<String, serde_json::Value> {
        let mut changes = serde_json::Map::new();

        if let Some(title) = &update.title {
            if *title != self.title {
                changes.insert(
                    "title".to_string(),
                    serde_json::json!({ "from": self.title, "to": title }),
                );
            }
            self.title = title.clone();
        }
        if let Some(status) = update.status {
            if status != self.status {
                changes.insert(
                    "status".to_string(),
                    serde_json::json!({ "from": self.status, "to": status }),
                );
            }
            self.status = status;
            match status.completion_effect() {
                CompletionEffect::Set => self.completed_at = Some(now),
                CompletionEffect::Clear => self.completed_at = None,
                CompletionEffect::Keep => {}
            }
        }
        if let Some(priority) = update.priority {
            if priority != self.priority {
                changes.insert(
                    "priority".to_string(),
                    serde_json::json!({ "from": self.priority, "to": priority }),
                );
            }
            self.priority = priority;
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(project_id) = update.project_id {
            self.project_id = project_id;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(estimated_hours) = update.estimated_hours {
            self.estimated_hours = estimated_hours;
        }
        self.updated_at = now;

        changes
    }
}

#[cfg(test)]
#[path = "work_item_test.rs"]
mod tests;
