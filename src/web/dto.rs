//! 请求 / 响应体

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// POST / 的查询参数；operation 在处理函数中解析为 `Operation`
#[derive(Debug, Deserialize)]
pub struct CalculateQuery {
    pub operation: String,
    pub num1: f64,
    pub num2: f64,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub result: f64,
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GroqCalculateRequest {
    pub operation: String,
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Serialize)]
pub struct GroqCalculateResponse {
    pub operation: String,
    /// 上游响应中的 result 字段，缺失时为 null
    pub result: Value,
}

#[derive(Debug, Deserialize)]
pub struct GroqAskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct GroqAskResponse {
    pub question: String,
    pub response: Value,
}
