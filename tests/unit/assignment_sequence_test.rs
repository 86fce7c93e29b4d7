// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use uuid::Uuid;

use workdesk::domain::models::user::{Actor, Role, TeamSummary, UserSummary};
use workdesk::domain::models::work_item::{
    AssignmentMode, Assignee, Priority, WorkItem, WorkItemStatus, WorkItemType,
};
use workdesk::domain::services::assignment_service::{
    plan, AssigneeRemoval, AssignmentAction, AssignmentContext, AssignmentPlan,
};

/// 内存中的工作项状态，按仓库的方式执行分配计划
struct State {
    item: WorkItem,
    assignees: Vec<Assignee>,
    team: Option<TeamSummary>,
    users: Vec<UserSummary>,
    tick: i64,
}

impl State {
    fn new(users: Vec<UserSummary>) -> Self {
        let now = Utc::now().fixed_offset();
        Self {
            item: WorkItem {
                id: Uuid::new_v4(),
                item_type: WorkItemType::Task,
                ticket_number: None,
                task_number: Some("TASK-0001".to_string()),
                title: "Patch the servers".to_string(),
                description: "Monthly patch window".to_string(),
                status: WorkItemStatus::Open,
                priority: Priority::Medium,
                assignment_mode: None,
                team_id: None,
                assignee_id: None,
                creator_id: Uuid::new_v4(),
                category_id: None,
                project_id: None,
                due_date: None,
                estimated_hours: None,
                completed_at: None,
                version: 0,
                created_at: now,
                updated_at: now,
            },
            assignees: Vec::new(),
            team: None,
            users,
            tick: 0,
        }
    }

    fn run(&mut self, actor: &UserSummary, action: AssignmentAction) -> AssignmentPlan {
        let actor_ref = Actor {
            user_id: actor.id,
            role: actor.role,
            team_id: None,
        };
        let legacy = self
            .item
            .assignee_id
            .and_then(|id| self.users.iter().find(|u| u.id == id).cloned());
        let ctx = AssignmentContext {
            item: &self.item,
            assignees: &self.assignees,
            current_team: self.team.as_ref(),
            legacy_assignee: legacy.as_ref(),
            actor: &actor_ref,
            actor_name: &actor.name,
        };
        let plan = plan(&ctx, action.clone()).unwrap();
        self.apply(&plan, action);
        plan
    }

    fn apply(&mut self, plan: &AssignmentPlan, action: AssignmentAction) {
        match &plan.remove {
            AssigneeRemoval::Nothing => {}
            AssigneeRemoval::All => self.assignees.clear(),
            AssigneeRemoval::Only(ids) => self.assignees.retain(|a| !ids.contains(&a.user_id)),
        }
        for user_id in &plan.add {
            self.tick += 1;
            self.assignees.push(Assignee {
                user_id: *user_id,
                assigned_by: plan.actor_id,
                assigned_at: self.item.created_at + Duration::seconds(self.tick),
                user: self.users.iter().find(|u| u.id == *user_id).cloned(),
            });
        }
        self.item.assignment_mode = plan.assignment_mode;
        self.item.team_id = plan.team_id;
        self.item.assignee_id = plan.assignee_id;
        self.item.status = plan.status;
        self.item.version += 1;
        self.team = match action {
            AssignmentAction::Team(team) => team,
            _ => None,
        };
    }

    fn assert_exclusive(&self) {
        match self.item.assignment_mode {
            None => {
                assert!(self.item.team_id.is_none());
                assert!(self.assignees.is_empty());
                assert!(self.item.assignee_id.is_none());
            }
            Some(AssignmentMode::Team) => {
                assert!(self.item.team_id.is_some());
                assert!(self.assignees.is_empty());
                assert!(self.item.assignee_id.is_none());
            }
            Some(AssignmentMode::Individuals) => {
                assert!(self.item.team_id.is_none());
                assert!(!self.assignees.is_empty());
                let mirrored = self.item.assignee_id.expect("legacy assignee set");
                assert!(self.assignees.iter().any(|a| a.user_id == mirrored));
            }
        }
    }
}

fn user(name: &str, role: Role) -> UserSummary {
    UserSummary {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        avatar: None,
        role,
        team_id: None,
    }
}

#[test]
fn test_mutual_exclusivity_across_operation_sequences() {
    let admin = user("Ada", Role::Admin);
    let a = user("Alice", Role::Agent);
    let b = user("Bob", Role::Agent);
    let c = user("Carol", Role::Agent);
    let team = TeamSummary {
        id: Uuid::new_v4(),
        name: "Ops".to_string(),
        color: None,
    };
    let mut state = State::new(vec![admin.clone(), a.clone(), b.clone(), c.clone()]);

    let steps: Vec<(UserSummary, AssignmentAction)> = vec![
        (admin.clone(), AssignmentAction::Team(Some(team.clone()))),
        (a.clone(), AssignmentAction::Claim),
        (b.clone(), AssignmentAction::Claim),
        (admin.clone(), AssignmentAction::Individuals(vec![c.clone(), b.clone()])),
        (admin.clone(), AssignmentAction::Single(Some(a.clone()))),
        (admin.clone(), AssignmentAction::Team(Some(team.clone()))),
        (admin.clone(), AssignmentAction::Individuals(vec![])),
        (admin.clone(), AssignmentAction::Single(None)),
        (c.clone(), AssignmentAction::Claim),
        (admin.clone(), AssignmentAction::Team(None)),
    ];

    for (actor, action) in steps {
        let plan = state.run(&actor, action);
        assert!(!plan.activity_logs.is_empty());
        for log in &plan.activity_logs {
            assert_eq!(log.work_item_id, state.item.id);
            assert_eq!(log.user_id, actor.id);
        }
        for notification in &plan.notifications {
            assert_ne!(notification.user_id, actor.id);
        }
        state.assert_exclusive();
    }
}

#[test]
fn test_bulk_assignment_keeps_survivors_first_and_mirrors_request() {
    let admin = user("Ada", Role::Admin);
    let a = user("Alice", Role::Agent);
    let b = user("Bob", Role::Agent);
    let c = user("Carol", Role::Agent);
    let mut state = State::new(vec![admin.clone(), a.clone(), b.clone(), c.clone()]);

    state.run(&admin, AssignmentAction::Individuals(vec![a.clone(), b.clone()]));
    let plan = state.run(&admin, AssignmentAction::Individuals(vec![c.clone(), b.clone()]));

    assert_eq!(plan.remove, AssigneeRemoval::Only(vec![a.id]));
    assert_eq!(plan.add, vec![c.id]);
    let ordered: Vec<Uuid> = state.assignees.iter().map(|x| x.user_id).collect();
    assert_eq!(ordered, vec![b.id, c.id]);
    assert_eq!(state.item.assignee_id, Some(c.id));
    assert_eq!(state.item.status, WorkItemStatus::InProgress);
}
