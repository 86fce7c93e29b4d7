// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::time_log::TimeLog;
use crate::domain::repositories::work_item_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 启动计时的结果
#[derive(Debug, Clone)]
pub struct StartedTimer {
    pub started: TimeLog,
    /// 被自动停止的上一个计时
    pub stopped: Option<TimeLog>,
}

/// 计时仓库特质
#[async_trait]
pub trait TimeLogRepository: Send + Sync {
    /// 停止调用者正在运行的计时并启动新计时，同一事务内写入活动日志
    async fn start(
        &self,
        work_item_id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
        now: DateTime<FixedOffset>,
    ) -> Result<StartedTimer, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TimeLog>, RepositoryError>;
    /// 停止计时并写入活动日志，计时已停止时返回 `None`
    async fn stop(
        &self,
        id: Uuid,
        notes: Option<String>,
        now: DateTime<FixedOffset>,
    ) -> Result<Option<TimeLog>, RepositoryError>;
    async fn find_running(&self, user_id: Uuid) -> Result<Option<TimeLog>, RepositoryError>;
    /// 最近的计时记录，按开始时间倒序
    async fn recent_for_work_item(
        &self,
        work_item_id: Uuid,
        limit: u64,
    ) -> Result<Vec<TimeLog>, RepositoryError>;
}
