// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::domain::models::activity::{NewActivityLog, NewNotification};
use crate::domain::models::time_log::TimeLog;
use crate::domain::models::work_item::{WorkItem, WorkItemType};

/// 创建日志：`TICKET_CREATED` / `TASK_CREATED`
pub fn work_item_created(item: &WorkItem, assignee_count: usize) -> NewActivityLog {
    let number_key = match item.item_type {
        WorkItemType::Ticket => "ticketNumber",
        WorkItemType::Task => "taskNumber",
    };
    let mut changes = Map::new();
    changes.insert(number_key.to_string(), json!(item.display_number()));
    changes.insert("title".to_string(), json!(item.title));
    changes.insert("priority".to_string(), json!(item.priority));
    changes.insert("status".to_string(), json!(item.status));
    changes.insert("assignmentMode".to_string(), json!(item.assignment_mode));
    changes.insert("teamId".to_string(), json!(item.team_id));
    changes.insert("assigneeCount".to_string(), json!(assignee_count));

    NewActivityLog {
        work_item_id: item.id,
        user_id: item.creator_id,
        action: item.item_type.action("CREATED"),
        changes: Value::Object(changes),
    }
}

/// 更新日志，没有可记录的变更时返回 `None`
pub fn work_item_updated(
    item: &WorkItem,
    actor_id: Uuid,
    changes: Map<String, Value>,
) -> Option<NewActivityLog> {
    if changes.is_empty() {
        return None;
    }
    Some(NewActivityLog {
        work_item_id: item.id,
        user_id: actor_id,
        action: item.item_type.action("UPDATED"),
        changes: Value::Object(changes),
    })
}

pub fn timer_started(log: &TimeLog) -> NewActivityLog {
    NewActivityLog {
        work_item_id: log.work_item_id,
        user_id: log.user_id,
        action: "TIMER_STARTED".to_string(),
        changes: json!({ "timeLogId": log.id }),
    }
}

pub fn timer_stopped(log: &TimeLog, duration_mins: i32) -> NewActivityLog {
    NewActivityLog {
        work_item_id: log.work_item_id,
        user_id: log.user_id,
        action: "TIMER_STOPPED".to_string(),
        changes: json!({ "timeLogId": log.id, "durationMins": duration_mins }),
    }
}

pub fn comment_added(
    work_item_id: Uuid,
    user_id: Uuid,
    comment_id: Uuid,
    is_internal: bool,
) -> NewActivityLog {
    NewActivityLog {
        work_item_id,
        user_id,
        action: "COMMENT_ADDED".to_string(),
        changes: json!({ "commentId": comment_id, "isInternal": is_internal }),
    }
}

/// 通知创建者有新的公开评论
pub fn comment_notification(item: &WorkItem, commenter_name: &str) -> NewNotification {
    let noun = item.item_type.noun();
    NewNotification {
        user_id: item.creator_id,
        kind: "COMMENT_ADDED".to_string(),
        title: format!("New comment on your {}", noun),
        message: format!("{} added a comment to your {}", commenter_name, noun),
        link: Some(item.link()),
    }
}
