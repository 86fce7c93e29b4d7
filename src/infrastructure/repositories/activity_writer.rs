// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::activity::{NewActivityLog, NewNotification};
use crate::infrastructure::database::entities::{activity_log, notification};
use chrono::{DateTime, Duration, FixedOffset};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};
use uuid::Uuid;

/// 写入活动日志
///
/// 同一批日志的时间戳逐条递增一微秒，保证按时间排序时顺序稳定
pub(crate) async fn insert_activity_logs<C>(
    conn: &C,
    logs: &[NewActivityLog],
    now: DateTime<FixedOffset>,
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    for (offset, log) in logs.iter().enumerate() {
        activity_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            work_item_id: Set(log.work_item_id),
            user_id: Set(log.user_id),
            action: Set(log.action.clone()),
            changes: Set(log.changes.clone()),
            created_at: Set(now + Duration::microseconds(offset as i64)),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// 写入通知
pub(crate) async fn insert_notifications<C>(
    conn: &C,
    notifications: &[NewNotification],
    now: DateTime<FixedOffset>,
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    for item in notifications {
        notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(item.user_id),
            kind: Set(item.kind.clone()),
            title: Set(item.title.clone()),
            message: Set(item.message.clone()),
            link: Set(item.link.clone()),
            is_read: Set(false),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}
