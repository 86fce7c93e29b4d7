// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::models::work_item::DomainError;
use crate::presentation::errors::AppError;

/// JSON 请求体
///
/// 解析失败时以 400 校验错误返回，错误信息放在 `details.body`
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(DomainError::Validation(json!({
                "body": [rejection.body_text()]
            }))
            .into()),
        }
    }
}
