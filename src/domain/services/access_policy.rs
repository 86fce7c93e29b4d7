// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use uuid::Uuid;

use crate::domain::models::user::{Actor, Role};
use crate::domain::models::work_item::WorkItem;

/// 列表查询的可见范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// 不做限制
    All,
    /// 与调用者相关的工作项：创建者、受理人（兼容字段或受理人表），
    /// 以及可选的团队条件
    Related {
        user_id: Uuid,
        team_id: Option<Uuid>,
        /// 为真时团队条件只匹配 `assignment_mode = "team"` 的工作项
        team_mode_only: bool,
    },
}

/// 计算列表可见范围
///
/// # 参数
///
/// * `actor` - 调用者
/// * `mine` - 管理者是否只看与自己相关的工作项
///
/// # 返回值
///
/// 返回可见范围，普通用户永远不会获得团队范围
pub fn list_scope(actor: &Actor, mine: bool) -> ListScope {
    match actor.role {
        Role::Admin | Role::Manager if !mine => ListScope::All,
        Role::Admin | Role::Manager => ListScope::Related {
            user_id: actor.user_id,
            team_id: actor.team_id,
            team_mode_only: false,
        },
        Role::Agent => ListScope::Related {
            user_id: actor.user_id,
            team_id: actor.team_id,
            team_mode_only: true,
        },
        Role::User => ListScope::Related {
            user_id: actor.user_id,
            team_id: None,
            team_mode_only: false,
        },
    }
}

/// 调用者是否为创建者或受理人
pub fn is_related(actor: &Actor, item: &WorkItem, assignee_ids: &[Uuid]) -> bool {
    item.creator_id == actor.user_id
        || item.assignee_id == Some(actor.user_id)
        || assignee_ids.contains(&actor.user_id)
}

/// 单项读取与更新权限
///
/// 服务人员按角色放行，普通用户需要是创建者或受理人
pub fn can_access(actor: &Actor, item: &WorkItem, assignee_ids: &[Uuid]) -> bool {
    actor.role.is_staff() || is_related(actor, item, assignee_ids)
}

pub fn can_see_internal_comments(role: Role) -> bool {
    role.is_staff()
}

#[cfg(test)]
#[path = "access_policy_test.rs"]
mod tests;
