// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Value};
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::models::activity::{NewActivityLog, NewNotification};
use crate::domain::models::user::{Actor, Role, TeamSummary, UserSummary};
use crate::domain::models::work_item::{
    AssignmentMode, Assignee, DomainError, WorkItem, WorkItemStatus, WorkItemType,
};

/// 分配意图
///
/// 请求体中识别出的动作，引用的团队与用户尚未解析。
/// 识别顺序：认领 → 团队 → 个人列表 → 单个受理人。
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentIntent {
    Claim,
    /// `None` 表示移除团队分配
    Team(Option<Uuid>),
    Individuals(Vec<Uuid>),
    /// `None` 表示取消分配
    Single(Option<Uuid>),
}

impl AssignmentIntent {
    /// 从请求字段识别分配意图
    ///
    /// # 参数
    ///
    /// * `claim` - 认领标志
    /// * `mode` - 显式分配模式
    /// * `team_id` - 外层 `None` 表示字段缺失，`Some(None)` 表示显式置空
    /// * `assignee_ids` - 受理人列表
    /// * `assignee_id` - 单个受理人，语义同 `team_id`
    ///
    /// # 返回值
    ///
    /// 无可识别动作时返回 `None`
    pub fn from_fields(
        claim: bool,
        mode: Option<AssignmentMode>,
        team_id: Option<Option<Uuid>>,
        assignee_ids: Option<Vec<Uuid>>,
        assignee_id: Option<Option<Uuid>>,
    ) -> Option<Self> {
        if claim {
            return Some(AssignmentIntent::Claim);
        }
        if mode == Some(AssignmentMode::Team) || team_id.is_some() {
            return Some(AssignmentIntent::Team(team_id.flatten()));
        }
        if mode == Some(AssignmentMode::Individuals) || assignee_ids.is_some() {
            let ids = dedup_preserving_order(assignee_ids.unwrap_or_default());
            return Some(AssignmentIntent::Individuals(ids));
        }
        assignee_id.map(AssignmentIntent::Single)
    }
}

/// 已解析引用的分配动作
#[derive(Debug, Clone)]
pub enum AssignmentAction {
    Claim,
    Team(Option<TeamSummary>),
    Individuals(Vec<UserSummary>),
    Single(Option<UserSummary>),
}

impl AssignmentAction {
    /// 指标标签
    pub fn label(&self) -> &'static str {
        match self {
            AssignmentAction::Claim => "claim",
            AssignmentAction::Team(_) => "team",
            AssignmentAction::Individuals(_) => "individuals",
            AssignmentAction::Single(_) => "single",
        }
    }
}

/// 规划分配所需的当前状态
#[derive(Debug)]
pub struct AssignmentContext<'a> {
    pub item: &'a WorkItem,
    /// 按 `assigned_at` 升序
    pub assignees: &'a [Assignee],
    pub current_team: Option<&'a TeamSummary>,
    pub legacy_assignee: Option<&'a UserSummary>,
    pub actor: &'a Actor,
    pub actor_name: &'a str,
}

/// 受理人删除方式
#[derive(Debug, Clone, PartialEq)]
pub enum AssigneeRemoval {
    Nothing,
    All,
    Only(Vec<Uuid>),
}

/// 分配计划
///
/// 仓库在同一事务中原样执行：带版本校验的字段更新、受理人增删、
/// 活动日志与通知写入
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPlan {
    pub work_item_id: Uuid,
    pub expected_version: i32,
    pub actor_id: Uuid,
    pub remove: AssigneeRemoval,
    /// 按插入顺序排列
    pub add: Vec<Uuid>,
    pub assignment_mode: Option<AssignmentMode>,
    pub team_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub status: WorkItemStatus,
    pub activity_logs: Vec<NewActivityLog>,
    pub notifications: Vec<NewNotification>,
}

/// 校验调用者角色
///
/// 只依据是否为认领请求判断，在解析请求中的ID之前执行。
/// 认领需要 AGENT 及以上；其余请求（包括无法识别的请求）需要 MANAGER/ADMIN
pub fn authorize(claim: bool, role: Role, item_type: WorkItemType) -> Result<(), DomainError> {
    match claim {
        true if role.is_staff() => Ok(()),
        true => Err(DomainError::Forbidden(format!(
            "Only agents can claim {}s",
            item_type.noun()
        ))),
        false if role.is_manager_or_admin() => Ok(()),
        false => Err(DomainError::Forbidden(format!(
            "Only managers and admins can assign {}s",
            item_type.noun()
        ))),
    }
}

/// 生成分配计划
///
/// # 参数
///
/// * `ctx` - 工作项当前状态与调用者
/// * `action` - 已解析的分配动作
///
/// # 返回值
///
/// * `Ok(AssignmentPlan)` - 待执行的计划
/// * `Err(DomainError)` - 认领时调用者已是受理人
pub fn plan(
    ctx: &AssignmentContext<'_>,
    action: AssignmentAction,
) -> Result<AssignmentPlan, DomainError> {
    match action {
        AssignmentAction::Claim => plan_claim(ctx),
        AssignmentAction::Team(team) => Ok(plan_team(ctx, team)),
        AssignmentAction::Individuals(users) => Ok(plan_individuals(ctx, users)),
        AssignmentAction::Single(user) => Ok(plan_single(ctx, user)),
    }
}

fn base_plan(ctx: &AssignmentContext<'_>) -> AssignmentPlan {
    AssignmentPlan {
        work_item_id: ctx.item.id,
        expected_version: ctx.item.version,
        actor_id: ctx.actor.user_id,
        remove: AssigneeRemoval::Nothing,
        add: Vec::new(),
        assignment_mode: None,
        team_id: None,
        assignee_id: None,
        status: ctx.item.status,
        activity_logs: Vec::new(),
        notifications: Vec::new(),
    }
}

fn log(ctx: &AssignmentContext<'_>, action: String, changes: Value) -> NewActivityLog {
    NewActivityLog {
        work_item_id: ctx.item.id,
        user_id: ctx.actor.user_id,
        action,
        changes,
    }
}

fn plan_claim(ctx: &AssignmentContext<'_>) -> Result<AssignmentPlan, DomainError> {
    let item = ctx.item;
    if ctx.assignees.iter().any(|a| a.user_id == ctx.actor.user_id) {
        return Err(DomainError::BadRequest(format!(
            "You are already assigned to this {}",
            item.item_type.noun()
        )));
    }

    let mut ordered: Vec<Uuid> = ctx.assignees.iter().map(|a| a.user_id).collect();
    ordered.push(ctx.actor.user_id);

    let status = next_status(item.status, true);
    let status_change = if status != item.status {
        json!({ "from": item.status, "to": status })
    } else {
        Value::Null
    };

    let mut plan = base_plan(ctx);
    plan.add = vec![ctx.actor.user_id];
    plan.assignment_mode = Some(AssignmentMode::Individuals);
    plan.assignee_id = legacy_mirror(&ordered);
    plan.status = status;
    plan.activity_logs.push(log(
        ctx,
        item.item_type.action("CLAIMED"),
        json!({
            "assigneeAdded": ctx.actor_name,
            "status": status_change,
            "message": format!("{} claimed {}", ctx.actor_name, item.display_number()),
        }),
    ));
    Ok(plan)
}

fn plan_team(ctx: &AssignmentContext<'_>, team: Option<TeamSummary>) -> AssignmentPlan {
    let item = ctx.item;
    let removed: Vec<&str> = ctx.assignees.iter().map(|a| a.display_name()).collect();
    let assignees_removed = if removed.is_empty() {
        Value::Null
    } else {
        json!(removed)
    };
    let message = match &team {
        Some(team) => format!(
            "{} assigned {} to team {}",
            ctx.actor_name,
            item.display_number(),
            team.name
        ),
        None => format!(
            "{} removed team assignment from {}",
            ctx.actor_name,
            item.display_number()
        ),
    };

    let mut plan = base_plan(ctx);
    plan.remove = AssigneeRemoval::All;
    plan.assignment_mode = team.as_ref().map(|_| AssignmentMode::Team);
    plan.team_id = team.as_ref().map(|t| t.id);
    plan.activity_logs.push(log(
        ctx,
        item.item_type.action("ASSIGNED"),
        json!({
            "teamId": {
                "from": ctx.current_team.map(|t| t.name.as_str()),
                "to": team.as_ref().map(|t| t.name.as_str()),
            },
            "assigneesRemoved": assignees_removed,
            "message": message,
        }),
    ));
    plan
}

fn plan_individuals(ctx: &AssignmentContext<'_>, users: Vec<UserSummary>) -> AssignmentPlan {
    let item = ctx.item;
    let number = item.display_number();
    let requested: HashSet<Uuid> = users.iter().map(|u| u.id).collect();
    let current: HashSet<Uuid> = ctx.assignees.iter().map(|a| a.user_id).collect();

    let removed: Vec<&Assignee> = ctx
        .assignees
        .iter()
        .filter(|a| !requested.contains(&a.user_id))
        .collect();
    let added: Vec<&UserSummary> = users.iter().filter(|u| !current.contains(&u.id)).collect();

    // Kept rows retain their assigned_at, so new rows sort after them
    let ordered: Vec<Uuid> = ctx
        .assignees
        .iter()
        .filter(|a| requested.contains(&a.user_id))
        .map(|a| a.user_id)
        .chain(added.iter().map(|u| u.id))
        .collect();

    let mut plan = base_plan(ctx);
    plan.remove = AssigneeRemoval::Only(removed.iter().map(|a| a.user_id).collect());
    plan.add = added.iter().map(|u| u.id).collect();
    plan.assignment_mode = if ordered.is_empty() {
        None
    } else {
        Some(AssignmentMode::Individuals)
    };
    let requested_order: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    plan.assignee_id = legacy_mirror(&requested_order);
    plan.status = next_status(item.status, !ordered.is_empty());

    if let Some(team) = ctx.current_team {
        plan.activity_logs.push(log(
            ctx,
            item.item_type.action("ASSIGNED"),
            json!({
                "teamId": { "from": team.name, "to": Value::Null },
                "assigneesRemoved": Value::Null,
                "message": format!("{} removed team assignment from {}", ctx.actor_name, number),
            }),
        ));
    }
    for assignee in &removed {
        let name = assignee.display_name();
        plan.activity_logs.push(log(
            ctx,
            "ASSIGNEE_REMOVED".to_string(),
            json!({
                "assigneeRemoved": name,
                "message": format!("{} removed {} from {}", ctx.actor_name, name, number),
            }),
        ));
    }
    for user in &added {
        plan.activity_logs.push(log(
            ctx,
            "ASSIGNEE_ADDED".to_string(),
            json!({
                "assigneeAdded": user.name,
                "message": format!("{} assigned {} to {}", ctx.actor_name, user.name, number),
            }),
        ));
        if user.id != ctx.actor.user_id {
            plan.notifications.push(assignment_notification(item, user.id));
        }
    }
    if plan.activity_logs.is_empty() {
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        plan.activity_logs.push(log(
            ctx,
            item.item_type.action("ASSIGNED"),
            json!({
                "assignees": names,
                "message": format!("{} updated assignees of {}", ctx.actor_name, number),
            }),
        ));
    }
    plan
}

fn plan_single(ctx: &AssignmentContext<'_>, user: Option<UserSummary>) -> AssignmentPlan {
    let item = ctx.item;
    let message = match &user {
        Some(user) => format!(
            "{} assigned {} to {}",
            ctx.actor_name,
            item.display_number(),
            user.name
        ),
        None => format!("{} unassigned {}", ctx.actor_name, item.display_number()),
    };

    let mut changes = json!({
        "assigneeId": {
            "from": ctx.legacy_assignee.map(|u| u.name.as_str()),
            "to": user.as_ref().map(|u| u.name.as_str()),
        },
        "message": message,
    });
    if let Some(team) = ctx.current_team {
        changes["teamId"] = json!({ "from": team.name, "to": Value::Null });
    }

    let mut plan = base_plan(ctx);
    plan.remove = AssigneeRemoval::All;
    if let Some(user) = &user {
        plan.add = vec![user.id];
        plan.assignment_mode = Some(AssignmentMode::Individuals);
        plan.assignee_id = Some(user.id);
        if user.id != ctx.actor.user_id {
            plan.notifications.push(assignment_notification(item, user.id));
        }
    }
    plan.status = next_status(item.status, user.is_some());
    plan.activity_logs
        .push(log(ctx, item.item_type.action("ASSIGNED"), changes));
    plan
}

/// 有受理人时 OPEN 自动转为 IN_PROGRESS，其余状态不变
pub fn next_status(current: WorkItemStatus, has_assignees: bool) -> WorkItemStatus {
    if has_assignees && current == WorkItemStatus::Open {
        WorkItemStatus::InProgress
    } else {
        current
    }
}

/// 兼容字段 `assignee_id` 的派生值：列表中的第一个
///
/// 批量分配传入请求顺序，认领传入现有受理人加认领者
pub fn legacy_mirror(ordered_assignees: &[Uuid]) -> Option<Uuid> {
    ordered_assignees.first().copied()
}

/// 去重并保留首次出现的顺序
pub fn dedup_preserving_order(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// 新受理人通知
pub fn assignment_notification(item: &WorkItem, user_id: Uuid) -> NewNotification {
    NewNotification {
        user_id,
        kind: "TICKET_ASSIGNED".to_string(),
        title: format!("New {} Assigned", item.item_type.title_noun()),
        message: format!(
            "You have been assigned to {} {}: {}",
            item.item_type.noun(),
            item.display_number(),
            item.title
        ),
        link: Some(item.link()),
    }
}

#[cfg(test)]
#[path = "assignment_service_test.rs"]
mod tests;
