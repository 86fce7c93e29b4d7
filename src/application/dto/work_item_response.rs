// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::models::activity::ActivityLog;
use crate::domain::models::comment::CommentWithAuthor;
use crate::domain::models::time_log::TimeLog;
use crate::domain::models::user::{CategorySummary, ProjectSummary, TeamSummary, UserSummary};
use crate::domain::models::work_item::{
    Assignee, AssignmentMode, Priority, WorkItemDetails, WorkItemStatus, WorkItemType,
};

/// 受理人DTO
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeDto {
    pub user_id: Uuid,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<FixedOffset>,
    pub user: Option<UserSummary>,
}

impl From<Assignee> for AssigneeDto {
    fn from(assignee: Assignee) -> Self {
        Self {
            user_id: assignee.user_id,
            assigned_by: assignee.assigned_by,
            assigned_at: assignee.assigned_at,
            user: assignee.user,
        }
    }
}

/// 工作项响应DTO
///
/// 附带创建者、兼容受理人、团队、分类、项目以及按分配时间排序的受理人列表
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub item_type: WorkItemType,
    pub ticket_number: Option<String>,
    pub task_number: Option<String>,
    pub title: String,
    pub description: String,
    pub status: WorkItemStatus,
    pub priority: Priority,
    pub assignment_mode: Option<AssignmentMode>,
    pub team_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub creator_id: Uuid,
    pub category_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub estimated_hours: Option<f64>,
    pub completed_at: Option<DateTime<FixedOffset>>,
    pub version: i32,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub creator: Option<UserSummary>,
    pub assignee: Option<UserSummary>,
    pub team: Option<TeamSummary>,
    pub category: Option<CategorySummary>,
    pub project: Option<ProjectSummary>,
    pub assignees: Vec<AssigneeDto>,
}

impl From<WorkItemDetails> for WorkItemDto {
    fn from(details: WorkItemDetails) -> Self {
        let item = details.item;
        Self {
            id: item.id,
            item_type: item.item_type,
            ticket_number: item.ticket_number,
            task_number: item.task_number,
            title: item.title,
            description: item.description,
            status: item.status,
            priority: item.priority,
            assignment_mode: item.assignment_mode,
            team_id: item.team_id,
            assignee_id: item.assignee_id,
            creator_id: item.creator_id,
            category_id: item.category_id,
            project_id: item.project_id,
            due_date: item.due_date,
            estimated_hours: item.estimated_hours,
            completed_at: item.completed_at,
            version: item.version,
            created_at: item.created_at,
            updated_at: item.updated_at,
            creator: details.creator,
            assignee: details.assignee,
            team: details.team,
            category: details.category,
            project: details.project,
            assignees: details.assignees.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: Uuid,
    pub work_item_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub is_internal: bool,
    pub created_at: DateTime<FixedOffset>,
    pub user: Option<UserSummary>,
}

impl From<CommentWithAuthor> for CommentDto {
    fn from(value: CommentWithAuthor) -> Self {
        let comment = value.comment;
        Self {
            id: comment.id,
            work_item_id: comment.work_item_id,
            user_id: comment.user_id,
            content: comment.content,
            is_internal: comment.is_internal,
            created_at: comment.created_at,
            user: value.author,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLogDto {
    pub id: Uuid,
    pub work_item_id: Uuid,
    pub user_id: Uuid,
    pub started_at: DateTime<FixedOffset>,
    pub ended_at: Option<DateTime<FixedOffset>>,
    pub duration_mins: Option<i32>,
    pub is_running: bool,
    pub notes: Option<String>,
}

impl From<TimeLog> for TimeLogDto {
    fn from(log: TimeLog) -> Self {
        Self {
            id: log.id,
            work_item_id: log.work_item_id,
            user_id: log.user_id,
            started_at: log.started_at,
            ended_at: log.ended_at,
            duration_mins: log.duration_mins,
            is_running: log.is_running,
            notes: log.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogDto {
    pub id: Uuid,
    pub work_item_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub changes: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
}

impl From<ActivityLog> for ActivityLogDto {
    fn from(log: ActivityLog) -> Self {
        Self {
            id: log.id,
            work_item_id: log.work_item_id,
            user_id: log.user_id,
            action: log.action,
            changes: log.changes,
            created_at: log.created_at,
        }
    }
}

/// 单项详情DTO
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemDetailDto {
    #[serde(flatten)]
    pub item: WorkItemDto,
    pub comments: Vec<CommentDto>,
    /// 最近 10 条
    pub time_logs: Vec<TimeLogDto>,
    /// 最近 20 条
    pub activity_logs: Vec<ActivityLogDto>,
}

/// 分页响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PageDto<T> {
    pub fn new(data: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}
