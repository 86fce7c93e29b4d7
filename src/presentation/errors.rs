// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::domain::models::work_item::DomainError;
use crate::domain::repositories::work_item_repository::RepositoryError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const CONFLICT_MESSAGE: &str =
    "This item was modified by another request. Please reload and try again.";

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status_and_body(&self) -> (StatusCode, String, Option<Value>) {
        if let Some(domain) = self.0.downcast_ref::<DomainError>() {
            return match domain {
                DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
                DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
                DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
                DomainError::Validation(details) => (
                    StatusCode::BAD_REQUEST,
                    "Validation failed".to_string(),
                    Some(details.clone()),
                ),
                DomainError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
                DomainError::Repository(err) => repository_status(err),
            };
        }
        match self.0.downcast_ref::<RepositoryError>() {
            Some(err) => repository_status(err),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
                None,
            ),
        }
    }
}

fn repository_status(err: &RepositoryError) -> (StatusCode, String, Option<Value>) {
    match err {
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string(), None),
        RepositoryError::Conflict => (StatusCode::CONFLICT, CONFLICT_MESSAGE.to_string(), None),
        RepositoryError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR_MESSAGE.to_string(),
            None,
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.0);
        }

        let body = match details {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
