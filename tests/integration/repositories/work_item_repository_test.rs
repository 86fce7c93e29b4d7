// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::{EntityTrait, ModelTrait};
use std::sync::Arc;
use uuid::Uuid;

use crate::integration::helpers::test_db;
use workdesk::domain::models::user::{Actor, Role};
use workdesk::domain::models::work_item::{Priority, WorkItemType};
use workdesk::domain::repositories::work_item_repository::{
    NewWorkItem, RepositoryError, WorkItemRepository,
};
use workdesk::domain::services::assignment_service::{
    self, AssignmentAction, AssignmentContext,
};
use workdesk::domain::services::team_routing::InitialAssignment;
use workdesk::infrastructure::database::entities::work_item_sequence;
use workdesk::infrastructure::repositories::work_item_repo_impl::WorkItemRepositoryImpl;

fn new_item(item_type: WorkItemType, creator_id: Uuid) -> NewWorkItem {
    NewWorkItem {
        item_type,
        title: "Replace the UPS battery".to_string(),
        description: "The UPS is beeping every minute".to_string(),
        priority: Priority::High,
        creator_id,
        category_id: None,
        project_id: None,
        due_date: None,
        estimated_hours: None,
        assignment: InitialAssignment::Unassigned,
        notify_user_ids: Vec::new(),
    }
}

#[tokio::test]
async fn test_missing_counter_row_is_seeded_from_existing_numbers() {
    let db = test_db().await;
    let repo = WorkItemRepositoryImpl::new(db.clone());
    let creator = Uuid::new_v4();

    for _ in 0..3 {
        repo.create(new_item(WorkItemType::Task, creator)).await.unwrap();
    }

    let row = work_item_sequence::Entity::find_by_id("TASK".to_string())
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    row.delete(db.as_ref()).await.unwrap();

    let item = repo.create(new_item(WorkItemType::Task, creator)).await.unwrap();
    assert_eq!(item.task_number.as_deref(), Some("TASK-0004"));

    let ticket = repo
        .create(new_item(WorkItemType::Ticket, creator))
        .await
        .unwrap();
    assert_eq!(ticket.ticket_number.as_deref(), Some("T-0001"));
}

#[tokio::test]
async fn test_stale_version_is_rejected() {
    let db = test_db().await;
    let repo = Arc::new(WorkItemRepositoryImpl::new(db));
    let creator = Uuid::new_v4();
    let item = repo
        .create(new_item(WorkItemType::Ticket, creator))
        .await
        .unwrap();

    let actor = Actor {
        user_id: Uuid::new_v4(),
        role: Role::Agent,
        team_id: None,
    };
    let ctx = AssignmentContext {
        item: &item,
        assignees: &[],
        current_team: None,
        legacy_assignee: None,
        actor: &actor,
        actor_name: "Alice",
    };
    let plan = assignment_service::plan(&ctx, AssignmentAction::Claim).unwrap();

    // Another writer bumps the version first
    repo.save_update(&item, item.version, None).await.unwrap();

    let result = repo.apply_assignment(&plan).await;
    assert!(matches!(result, Err(RepositoryError::Conflict)));
    assert!(repo.find_assignees(item.id).await.unwrap().is_empty());
    assert!(repo.recent_activity(item.id, 20).await.unwrap().len() == 1);

    let current = repo.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(current.version, item.version + 1);
    let stale = repo.save_update(&item, item.version, None).await;
    assert!(matches!(stale, Err(RepositoryError::Conflict)));
}
