// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;

use crate::{
    application::{
        dto::{
            time_log_request::{StartTimerRequestDto, StopTimerRequestDto},
            work_item_response::TimeLogDto,
        },
        use_cases::time_tracking_use_case::TimeTrackingUseCase,
    },
    domain::repositories::{
        time_log_repository::TimeLogRepository, work_item_repository::WorkItemRepository,
    },
    presentation::{
        errors::AppError,
        extractors::{current_user::CurrentUser, json_body::JsonBody},
    },
};

/// 开始计时，已有运行中的计时会被先停止
pub async fn start_timer<TR, WR>(
    Extension(time_logs): Extension<Arc<TR>>,
    Extension(work_items): Extension<Arc<WR>>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<StartTimerRequestDto>,
) -> Result<(StatusCode, Json<TimeLogDto>), AppError>
where
    TR: TimeLogRepository + 'static,
    WR: WorkItemRepository + 'static,
{
    let use_case = TimeTrackingUseCase::new(time_logs, work_items);
    let log = use_case.start(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// 停止计时
pub async fn stop_timer<TR, WR>(
    Extension(time_logs): Extension<Arc<TR>>,
    Extension(work_items): Extension<Arc<WR>>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<StopTimerRequestDto>,
) -> Result<Json<TimeLogDto>, AppError>
where
    TR: TimeLogRepository + 'static,
    WR: WorkItemRepository + 'static,
{
    let use_case = TimeTrackingUseCase::new(time_logs, work_items);
    Ok(Json(use_case.stop(&actor, payload).await?))
}

/// 当前运行中的计时，没有时返回 `null`
pub async fn active_timer<TR, WR>(
    Extension(time_logs): Extension<Arc<TR>>,
    Extension(work_items): Extension<Arc<WR>>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Option<TimeLogDto>>, AppError>
where
    TR: TimeLogRepository + 'static,
    WR: WorkItemRepository + 'static,
{
    let use_case = TimeTrackingUseCase::new(time_logs, work_items);
    Ok(Json(use_case.active(&actor).await?))
}
