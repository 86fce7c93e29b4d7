// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::assignment_request::deserialize_some;
use crate::domain::models::work_item::{
    AssignmentMode, Priority, WorkItemStatus, WorkItemType, WorkItemUpdate,
};
use crate::domain::services::team_routing::AssignmentInput;

const MAX_ESTIMATED_HOURS: f64 = 999.0;

/// 创建工单/任务请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkItemRequestDto {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: String,

    #[validate(length(
        min = 10,
        max = 5000,
        message = "Description must be 10-5000 characters"
    ))]
    pub description: String,

    pub priority: Priority,

    pub category_id: Option<Uuid>,

    /// 仅任务
    pub project_id: Option<Uuid>,

    pub due_date: Option<DateTime<FixedOffset>>,

    /// 仅任务
    #[validate(range(min = 0.0, max = 999.0))]
    pub estimated_hours: Option<f64>,

    pub assignment_mode: Option<AssignmentMode>,

    pub team_id: Option<Uuid>,

    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,

    /// 工单的兼容单受理人字段
    pub assignee_id: Option<Uuid>,
}

impl CreateWorkItemRequestDto {
    /// 提取分配输入，任务不接受兼容字段 `assigneeId`
    pub fn assignment_input(&self, item_type: WorkItemType) -> AssignmentInput {
        AssignmentInput {
            mode: self.assignment_mode,
            team_id: self.team_id,
            assignee_ids: self.assignee_ids.clone(),
            assignee_id: match item_type {
                WorkItemType::Ticket => self.assignee_id,
                WorkItemType::Task => None,
            },
        }
    }
}

/// 更新工单/任务请求DTO
///
/// 所有字段可选；可置空字段区分缺失与 `null`
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_hours"))]
pub struct UpdateWorkItemRequestDto {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 10,
        max = 5000,
        message = "Description must be 10-5000 characters"
    ))]
    pub description: Option<String>,

    pub priority: Option<Priority>,

    pub status: Option<WorkItemStatus>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub project_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<DateTime<FixedOffset>>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub estimated_hours: Option<Option<f64>>,
}

fn validate_update_hours(dto: &UpdateWorkItemRequestDto) -> Result<(), ValidationError> {
    match dto.estimated_hours {
        Some(Some(hours)) if !(0.0..=MAX_ESTIMATED_HOURS).contains(&hours) => {
            let mut error = ValidationError::new("range");
            error.message = Some("Estimated hours must be between 0 and 999".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

impl UpdateWorkItemRequestDto {
    /// 转换为领域更新，工单忽略任务专属字段
    pub fn into_update(self, item_type: WorkItemType) -> WorkItemUpdate {
        let is_task = item_type == WorkItemType::Task;
        WorkItemUpdate {
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            category_id: self.category_id,
            project_id: self.project_id.filter(|_| is_task),
            due_date: self.due_date,
            estimated_hours: self.estimated_hours.filter(|_| is_task),
        }
    }
}

/// 列表查询参数
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkItemsQueryDto {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<WorkItemStatus>,
    pub priority: Option<Priority>,
    /// 管理者只看与自己相关的工作项
    pub mine: Option<bool>,
}

impl ListWorkItemsQueryDto {
    /// 规范化分页：页码从 1 开始，每页数量限制在 `1..=max_limit`
    pub fn paging(&self, default_limit: u64, max_limit: u64) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, max_limit.max(1));
        (page, limit)
    }
}
