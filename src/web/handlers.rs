//! 路由处理函数
//!
//! 各函数只做参数校验与分派，错误统一以 `ApiError` 返回。

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Html,
    Json,
};
use serde_json::{json, Value};

use super::dto::{
    CalculateQuery, CalculateResponse, GroqAskRequest, GroqAskResponse, GroqCalculateRequest,
    GroqCalculateResponse,
};
use super::AppState;
use crate::core::ApiError;
use crate::operations::Operation;
use crate::storage::{CalculationRecord, NewCalculation};

/// 自然语言提问时调用的上游函数名
pub const ASK_FUNCTION: &str = "natural_language_query";

/// 取上游响应中的某个键，缺失时为 null
fn field(response: &Value, key: &str) -> Value {
    response.get(key).cloned().unwrap_or(Value::Null)
}

/// GET /：返回 static_dir 下的 index.html
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let path = state.config.server.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            Err(ApiError::AssetNotFound)
        }
    }
}

/// POST /?operation=&num1=&num2=
///
/// 顺序：解析运算名 -> 计算 -> 写库 -> 响应。校验或计算失败时不会触达存储。
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CalculateQuery>, QueryRejection>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::Validation(e.body_text()))?;

    let operation: Operation = params
        .operation
        .parse()
        .map_err(|_| ApiError::invalid_operation())?;
    let calculation = NewCalculation::compute(operation, params.num1, params.num2)?;

    let record = state.store.create(calculation).await?;
    tracing::info!(
        id = record.id,
        operation = %record.operation,
        "{} {} {} = {}",
        record.num1,
        record.operation,
        record.num2,
        record.result
    );

    Ok(Json(CalculateResponse {
        result: record.result,
        id: record.id,
    }))
}

/// GET /calculations
pub async fn list_calculations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CalculationRecord>>, ApiError> {
    let records = state.store.list().await?;
    Ok(Json(records))
}

/// POST /groq-calculate：把运算交给上游，不写库
pub async fn groq_calculate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GroqCalculateRequest>, JsonRejection>,
) -> Result<Json<GroqCalculateResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    let response = state
        .gateway
        .invoke(&req.operation, json!({ "a": req.a, "b": req.b }))
        .await?;

    Ok(Json(GroqCalculateResponse {
        result: field(&response, "result"),
        operation: req.operation,
    }))
}

/// POST /groq-ask：自然语言提问
pub async fn groq_ask(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GroqAskRequest>, JsonRejection>,
) -> Result<Json<GroqAskResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    let response = state
        .gateway
        .invoke(ASK_FUNCTION, json!({ "question": req.question }))
        .await?;

    Ok(Json(GroqAskResponse {
        response: field(&response, "response"),
        question: req.question,
    }))
}
