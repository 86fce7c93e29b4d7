// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 活动日志
///
/// 只追加的审计记录，`changes` 为结构化差异，通常带一条 `message`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub work_item_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub changes: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
}

/// 待写入的活动日志
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivityLog {
    pub work_item_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub changes: serde_json::Value,
}

impl NewActivityLog {
    pub fn message(&self) -> Option<&str> {
        self.changes.get("message").and_then(|m| m.as_str())
    }
}

/// 站内通知
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<FixedOffset>,
}

/// 待写入的通知
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}
