// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 工作项迁移：工作项、编号序列与受理人
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(WorkItems::ItemType).string().not_null())
                    .col(ColumnDef::new(WorkItems::TicketNumber).string().null())
                    .col(ColumnDef::new(WorkItems::TaskNumber).string().null())
                    .col(ColumnDef::new(WorkItems::Title).string().not_null())
                    .col(ColumnDef::new(WorkItems::Description).text().not_null())
                    .col(ColumnDef::new(WorkItems::Status).string().not_null())
                    .col(ColumnDef::new(WorkItems::Priority).string().not_null())
                    .col(ColumnDef::new(WorkItems::AssignmentMode).string().null())
                    .col(ColumnDef::new(WorkItems::TeamId).uuid().null())
                    .col(ColumnDef::new(WorkItems::AssigneeId).uuid().null())
                    .col(ColumnDef::new(WorkItems::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(WorkItems::CategoryId).uuid().null())
                    .col(ColumnDef::new(WorkItems::ProjectId).uuid().null())
                    .col(
                        ColumnDef::new(WorkItems::DueDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(WorkItems::EstimatedHours).double().null())
                    .col(
                        ColumnDef::new(WorkItems::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WorkItems::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WorkItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WorkItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_items_ticket_number")
                    .table(WorkItems::Table)
                    .col(WorkItems::TicketNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_items_task_number")
                    .table(WorkItems::Table)
                    .col(WorkItems::TaskNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_items_type_created_at")
                    .table(WorkItems::Table)
                    .col(WorkItems::ItemType)
                    .col(WorkItems::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkItemSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkItemSequences::Kind)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkItemSequences::LastValue)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::insert()
                    .into_table(WorkItemSequences::Table)
                    .columns([WorkItemSequences::Kind, WorkItemSequences::LastValue])
                    .values_panic(["TICKET".into(), 0.into()])
                    .values_panic(["TASK".into(), 0.into()])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkItemAssignees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkItemAssignees::WorkItemId).uuid().not_null())
                    .col(ColumnDef::new(WorkItemAssignees::UserId).uuid().not_null())
                    .col(ColumnDef::new(WorkItemAssignees::AssignedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(WorkItemAssignees::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(WorkItemAssignees::WorkItemId)
                            .col(WorkItemAssignees::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_item_assignees_user_id")
                    .table(WorkItemAssignees::Table)
                    .col(WorkItemAssignees::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkItemAssignees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkItemSequences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkItems {
    Table,
    Id,
    ItemType,
    TicketNumber,
    TaskNumber,
    Title,
    Description,
    Status,
    Priority,
    AssignmentMode,
    TeamId,
    AssigneeId,
    CreatorId,
    CategoryId,
    ProjectId,
    DueDate,
    EstimatedHours,
    CompletedAt,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WorkItemSequences {
    Table,
    Kind,
    LastValue,
}

#[derive(DeriveIden)]
enum WorkItemAssignees {
    Table,
    WorkItemId,
    UserId,
    AssignedBy,
    AssignedAt,
}
