// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::application::dto::time_log_request::{StartTimerRequestDto, StopTimerRequestDto};
use crate::application::dto::work_item_response::TimeLogDto;
use crate::domain::models::user::Actor;
use crate::domain::models::work_item::DomainError;
use crate::domain::repositories::time_log_repository::TimeLogRepository;
use crate::domain::repositories::work_item_repository::{RepositoryError, WorkItemRepository};
use crate::infrastructure::metrics;

/// 计时用例
///
/// 每个用户同时最多一个运行中的计时器，开始新计时会先停止旧的
pub struct TimeTrackingUseCase<TR, WR> {
    time_logs: Arc<TR>,
    work_items: Arc<WR>,
}

impl<TR, WR> TimeTrackingUseCase<TR, WR>
where
    TR: TimeLogRepository + 'static,
    WR: WorkItemRepository + 'static,
{
    pub fn new(time_logs: Arc<TR>, work_items: Arc<WR>) -> Self {
        Self {
            time_logs,
            work_items,
        }
    }

    /// 开始计时
    ///
    /// # 参数
    ///
    /// * `actor` - 计时用户
    /// * `dto` - 工作项与备注
    ///
    /// # 返回值
    ///
    /// * `Ok(TimeLogDto)` - 新的运行中计时
    /// * `Err(DomainError::NotFound)` - 工作项不存在
    pub async fn start(
        &self,
        actor: &Actor,
        dto: StartTimerRequestDto,
    ) -> Result<TimeLogDto, DomainError> {
        dto.validate()?;
        if self.work_items.find_by_id(dto.work_item_id).await?.is_none() {
            return Err(DomainError::NotFound("Work item not found".to_string()));
        }

        let now = Utc::now().fixed_offset();
        let timer = self
            .time_logs
            .start(dto.work_item_id, actor.user_id, dto.notes, now)
            .await?;

        if let Some(stopped) = &timer.stopped {
            info!(
                "Stopped timer {} ({} min) for user {} before starting a new one",
                stopped.id,
                stopped.duration_mins.unwrap_or_default(),
                actor.user_id
            );
        }
        metrics::record_timer_started();
        Ok(timer.started.into())
    }

    /// 停止计时，只能停止自己的运行中计时
    pub async fn stop(
        &self,
        actor: &Actor,
        dto: StopTimerRequestDto,
    ) -> Result<TimeLogDto, DomainError> {
        dto.validate()?;
        let log = self
            .time_logs
            .find_by_id(dto.time_log_id)
            .await?
            .ok_or_else(not_found)?;
        if log.user_id != actor.user_id {
            return Err(DomainError::Forbidden(
                "You can only stop your own timers".to_string(),
            ));
        }
        if !log.is_running {
            return Err(already_stopped());
        }

        let stopped = match self
            .time_logs
            .stop(log.id, dto.notes, Utc::now().fixed_offset())
            .await
        {
            Ok(Some(stopped)) => stopped,
            Ok(None) => return Err(already_stopped()),
            Err(RepositoryError::NotFound) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        info!(
            "Timer {} stopped after {} min",
            stopped.id,
            stopped.duration_mins.unwrap_or_default()
        );
        Ok(stopped.into())
    }

    /// 调用者当前运行中的计时
    pub async fn active(&self, actor: &Actor) -> Result<Option<TimeLogDto>, DomainError> {
        Ok(self
            .time_logs
            .find_running(actor.user_id)
            .await?
            .map(Into::into))
    }
}

fn not_found() -> DomainError {
    DomainError::NotFound("Time log not found".to_string())
}

fn already_stopped() -> DomainError {
    DomainError::BadRequest("This timer is already stopped".to_string())
}
