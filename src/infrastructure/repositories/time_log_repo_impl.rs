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

use crate::domain::models::time_log::TimeLog;
use crate::domain::repositories::time_log_repository::{StartedTimer, TimeLogRepository};
use crate::domain::repositories::work_item_repository::RepositoryError;
use crate::domain::services::audit;
use crate::infrastructure::database::entities::time_log as time_log_entity;
use crate::infrastructure::repositories::activity_writer::insert_activity_logs;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 计时仓库实现
#[derive(Clone)]
pub struct TimeLogRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TimeLogRepositoryImpl {
    /// 创建新的计时仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 停止一个运行中的计时
    ///
    /// 只有仍在运行的记录会被更新，返回停止后的记录
    async fn stop_running(
        txn: &DatabaseTransaction,
        log: TimeLog,
        notes: Option<String>,
        now: DateTime<FixedOffset>,
    ) -> Result<Option<TimeLog>, RepositoryError> {
        let duration = log.elapsed_minutes(now);
        let notes = notes.or_else(|| log.notes.clone());

        let updated = time_log_entity::Entity::update_many()
            .col_expr(time_log_entity::Column::IsRunning, Expr::value(false))
            .col_expr(time_log_entity::Column::EndedAt, Expr::value(Some(now)))
            .col_expr(
                time_log_entity::Column::DurationMins,
                Expr::value(Some(duration)),
            )
            .col_expr(time_log_entity::Column::Notes, Expr::value(notes.clone()))
            .filter(time_log_entity::Column::Id.eq(log.id))
            .filter(time_log_entity::Column::IsRunning.eq(true))
            .exec(txn)
            .await?;
        if updated.rows_affected == 0 {
            return Ok(None);
        }

        insert_activity_logs(txn, &[audit::timer_stopped(&log, duration)], now).await?;

        Ok(Some(TimeLog {
            ended_at: Some(now),
            duration_mins: Some(duration),
            is_running: false,
            notes,
            ..log
        }))
    }
}

impl From<time_log_entity::Model> for TimeLog {
    fn from(model: time_log_entity::Model) -> Self {
        Self {
            id: model.id,
            work_item_id: model.work_item_id,
            user_id: model.user_id,
            started_at: model.started_at,
            ended_at: model.ended_at,
            duration_mins: model.duration_mins,
            is_running: model.is_running,
            notes: model.notes,
        }
    }
}

impl From<TimeLog> for time_log_entity::ActiveModel {
    fn from(log: TimeLog) -> Self {
        Self {
            id: Set(log.id),
            work_item_id: Set(log.work_item_id),
            user_id: Set(log.user_id),
            started_at: Set(log.started_at),
            ended_at: Set(log.ended_at),
            duration_mins: Set(log.duration_mins),
            is_running: Set(log.is_running),
            notes: Set(log.notes),
        }
    }
}

#[async_trait]
impl TimeLogRepository for TimeLogRepositoryImpl {
    async fn start(
        &self,
        work_item_id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
        now: DateTime<FixedOffset>,
    ) -> Result<StartedTimer, RepositoryError> {
        let txn = self.db.begin().await?;

        let running = time_log_entity::Entity::find()
            .filter(time_log_entity::Column::UserId.eq(user_id))
            .filter(time_log_entity::Column::IsRunning.eq(true))
            .one(&txn)
            .await?;
        let stopped = match running {
            Some(model) => Self::stop_running(&txn, model.into(), None, now).await?,
            None => None,
        };

        let started = TimeLog {
            id: Uuid::new_v4(),
            work_item_id,
            user_id,
            started_at: now,
            ended_at: None,
            duration_mins: None,
            is_running: true,
            notes,
        };
        time_log_entity::ActiveModel::from(started.clone())
            .insert(&txn)
            .await?;
        insert_activity_logs(&txn, &[audit::timer_started(&started)], now).await?;

        txn.commit().await?;
        Ok(StartedTimer { started, stopped })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TimeLog>, RepositoryError> {
        let model = time_log_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn stop(
        &self,
        id: Uuid,
        notes: Option<String>,
        now: DateTime<FixedOffset>,
    ) -> Result<Option<TimeLog>, RepositoryError> {
        let txn = self.db.begin().await?;

        let log: TimeLog = time_log_entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into();
        if !log.is_running {
            return Ok(None);
        }

        let stopped = Self::stop_running(&txn, log, notes, now).await?;
        txn.commit().await?;
        Ok(stopped)
    }

    async fn find_running(&self, user_id: Uuid) -> Result<Option<TimeLog>, RepositoryError> {
        let model = time_log_entity::Entity::find()
            .filter(time_log_entity::Column::UserId.eq(user_id))
            .filter(time_log_entity::Column::IsRunning.eq(true))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn recent_for_work_item(
        &self,
        work_item_id: Uuid,
        limit: u64,
    ) -> Result<Vec<TimeLog>, RepositoryError> {
        let models = time_log_entity::Entity::find()
            .filter(time_log_entity::Column::WorkItemId.eq(work_item_id))
            .order_by_desc(time_log_entity::Column::StartedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
