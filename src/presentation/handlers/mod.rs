// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use uuid::Uuid;

use crate::domain::models::work_item::{DomainError, WorkItemType};

pub mod assignment_handler;
pub mod comment_handler;
pub mod directory_handler;
pub mod time_log_handler;
pub mod work_item_handler;

/// 解析路径中的工作项ID，格式错误与不存在同样返回 404
pub(crate) fn parse_item_id(item_type: WorkItemType, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::NotFound(item_type.not_found_message()))
}
