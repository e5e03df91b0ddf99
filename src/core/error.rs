//! HTTP 层错误类型与状态码映射
//!
//! 每个处理函数返回 `Result<_, ApiError>`，由 `IntoResponse` 统一转换为状态码与 JSON 体：
//! 校验 / 领域错误回显消息（400）；持久化错误只记录日志，对外返回通用消息（500）；
//! 网关错误原样透传消息（500，`detail` 字段）；静态页缺失为 404。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm::GatewayError;
use crate::operations::DomainError;
use crate::storage::StorageError;

pub const INVALID_OPERATION: &str = "Invalid operation";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";
pub const STATIC_FILE_NOT_FOUND: &str = "Static file not found.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Persistence(#[from] StorageError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Static file not found.")]
    AssetNotFound,
}

impl ApiError {
    pub fn invalid_operation() -> Self {
        ApiError::Validation(INVALID_OPERATION.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Domain(_) => StatusCode::BAD_REQUEST,
            ApiError::Persistence(_) | ApiError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::AssetNotFound => StatusCode::NOT_FOUND,
        }
    }

    /// 对外的 JSON 体
    pub fn body(&self) -> serde_json::Value {
        match self {
            ApiError::Validation(msg) => json!({ "error": msg }),
            ApiError::Domain(e) => json!({ "error": e.to_string() }),
            ApiError::Persistence(_) => json!({ "error": INTERNAL_SERVER_ERROR }),
            ApiError::Gateway(e) => json!({ "detail": e.to_string() }),
            ApiError::AssetNotFound => json!({ "detail": STATIC_FILE_NOT_FOUND }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Persistence(e) => tracing::error!("Persistence failure: {}", e),
            ApiError::Gateway(e) => tracing::error!("Groq gateway failure: {}", e),
            other => tracing::debug!("Request rejected: {}", other),
        }
        (self.status(), Json(self.body())).into_response()
    }
}
