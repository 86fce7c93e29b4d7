// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

/// 计时记录迁移
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TimeLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TimeLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TimeLogs::WorkItemId).uuid().not_null())
                    .col(ColumnDef::new(TimeLogs::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(TimeLogs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimeLogs::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(TimeLogs::DurationMins).integer().null())
                    .col(
                        ColumnDef::new(TimeLogs::IsRunning)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(TimeLogs::Notes).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_logs_work_item_started_at")
                    .table(TimeLogs::Table)
                    .col(TimeLogs::WorkItemId)
                    .col(TimeLogs::StartedAt)
                    .to_owned(),
            )
            .await?;

        // At most one running timer per user
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_time_logs_one_running \
                 ON time_logs (user_id) WHERE is_running",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TimeLogs {
    Table,
    Id,
    WorkItemId,
    UserId,
    StartedAt,
    EndedAt,
    DurationMins,
    IsRunning,
    Notes,
}
