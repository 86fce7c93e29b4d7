// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use uuid::Uuid;

use crate::domain::models::user::{Actor, Role};
use crate::domain::models::work_item::{AssignmentMode, WorkItemType};
use crate::domain::services::assignment_service::dedup_preserving_order;

/// 默认路由目标团队，来自配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTargets {
    /// 普通用户提交的工单
    pub it_team_id: Option<Uuid>,
    /// 服务人员提交的工单
    pub lms_team_id: Option<Uuid>,
}

impl RoutingTargets {
    /// 按创建者角色选择默认团队，管理者与管理员不路由
    pub fn default_team_for(&self, role: Role) -> Option<Uuid> {
        match role {
            Role::User => self.it_team_id,
            Role::Agent => self.lms_team_id,
            Role::Manager | Role::Admin => None,
        }
    }
}

/// 创建时的初始分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialAssignment {
    Unassigned,
    Team(Uuid),
    /// 已去重，保留请求顺序
    Individuals(Vec<Uuid>),
}

/// 创建请求中的分配输入
#[derive(Debug, Clone, Default)]
pub struct AssignmentInput {
    pub mode: Option<AssignmentMode>,
    pub team_id: Option<Uuid>,
    pub assignee_ids: Vec<Uuid>,
    /// 工单的兼容单受理人字段
    pub assignee_id: Option<Uuid>,
}

/// 决定新工作项的初始分配
///
/// 显式模式优先；团队模式未指定团队时使用创建者所在团队；
/// 完全没有分配输入的工单按角色路由到配置的默认团队
pub fn initial_assignment(
    item_type: WorkItemType,
    input: AssignmentInput,
    actor: &Actor,
    routing: &RoutingTargets,
) -> InitialAssignment {
    let mut ids = dedup_preserving_order(input.assignee_ids);
    if ids.is_empty() {
        if let Some(single) = input.assignee_id {
            ids.push(single);
        }
    }

    match input.mode {
        Some(AssignmentMode::Individuals) if ids.is_empty() => InitialAssignment::Unassigned,
        Some(AssignmentMode::Individuals) => InitialAssignment::Individuals(ids),
        Some(AssignmentMode::Team) => input
            .team_id
            .or(actor.team_id)
            .map(InitialAssignment::Team)
            .unwrap_or(InitialAssignment::Unassigned),
        None if !ids.is_empty() => InitialAssignment::Individuals(ids),
        None => {
            let routed = match item_type {
                WorkItemType::Ticket => input
                    .team_id
                    .or_else(|| routing.default_team_for(actor.role)),
                WorkItemType::Task => input.team_id,
            };
            routed
                .map(InitialAssignment::Team)
                .unwrap_or(InitialAssignment::Unassigned)
        }
    }
}
