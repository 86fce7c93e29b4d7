// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::models::work_item::{AssignmentMode, DomainError, WorkItemType};
use crate::domain::services::assignment_service::AssignmentIntent;

/// 区分字段缺失与显式 `null`
///
/// 配合 `#[serde(default)]` 使用：缺失得到 `None`，`null` 得到 `Some(None)`
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// 分配请求DTO
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequestDto {
    pub assignment_mode: Option<AssignmentMode>,

    /// `null` 或空字符串表示移除团队分配
    #[serde(default, deserialize_with = "deserialize_some")]
    pub team_id: Option<Option<String>>,

    pub assignee_ids: Option<Vec<String>>,

    /// 兼容字段，`null` 或空字符串表示取消分配
    #[serde(default, deserialize_with = "deserialize_some")]
    pub assignee_id: Option<Option<String>>,

    pub claim_ticket: Option<bool>,

    pub claim_task: Option<bool>,
}

impl AssignmentRequestDto {
    /// 是否为认领请求，只读取路由类型对应的认领标志
    pub fn is_claim(&self, item_type: WorkItemType) -> bool {
        match item_type {
            WorkItemType::Ticket => self.claim_ticket,
            WorkItemType::Task => self.claim_task,
        }
        .unwrap_or(false)
    }

    /// 解析为分配意图
    ///
    /// # 参数
    ///
    /// * `item_type` - 路由对应的工作项类型，决定读取哪个认领标志
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(intent))` - 识别出的动作
    /// * `Ok(None)` - 请求中没有可识别的分配字段
    /// * `Err(DomainError::Validation)` - 存在格式错误的 UUID
    pub fn into_intent(self, item_type: WorkItemType) -> Result<Option<AssignmentIntent>, DomainError> {
        let claim = self.is_claim(item_type);

        let team_id = self
            .team_id
            .map(|value| parse_optional_id("teamId", value))
            .transpose()?;
        let assignee_id = self
            .assignee_id
            .map(|value| parse_optional_id("assigneeId", value))
            .transpose()?;
        let assignee_ids = self
            .assignee_ids
            .map(|ids| {
                ids.iter()
                    .map(|id| parse_id("assigneeIds", id))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(AssignmentIntent::from_fields(
            claim,
            self.assignment_mode,
            team_id,
            assignee_ids,
            assignee_id,
        ))
    }
}

fn parse_optional_id(field: &str, value: Option<String>) -> Result<Option<Uuid>, DomainError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_id(field, raw).map(Some),
    }
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        DomainError::Validation(json!({ field: [format!("Invalid id: {}", raw)] }))
    })
}
