// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::work_item::WorkItemType;

/// 格式化显示编号
///
/// 前缀加四位补零序号，超过四位时不截断，例如 `T-0001`、`TASK-10000`
pub fn format_display_number(item_type: WorkItemType, sequence: i64) -> String {
    format!("{}{:04}", item_type.number_prefix(), sequence)
}

/// 解析显示编号中的序号，前缀不匹配时返回 `None`
pub fn parse_display_number(item_type: WorkItemType, number: &str) -> Option<i64> {
    number
        .strip_prefix(item_type.number_prefix())
        .and_then(|digits| digits.parse::<i64>().ok())
}
