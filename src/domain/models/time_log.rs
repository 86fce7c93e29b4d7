// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 计时记录
///
/// 每个用户同一时刻最多只有一条 `is_running` 的记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeLog {
    pub id: Uuid,
    pub work_item_id: Uuid,
    pub user_id: Uuid,
    pub started_at: DateTime<FixedOffset>,
    pub ended_at: Option<DateTime<FixedOffset>>,
    pub duration_mins: Option<i32>,
    pub is_running: bool,
    pub notes: Option<String>,
}

impl TimeLog {
    /// 从开始到 `now` 经过的整分钟数，向下取整
    pub fn elapsed_minutes(&self, now: DateTime<FixedOffset>) -> i32 {
        let millis = (now - self.started_at).num_milliseconds().max(0);
        i32::try_from(millis / 60_000).unwrap_or(i32::MAX)
    }
}
