//! LLM 网关抽象
//!
//! 路由层只依赖 `GatewayClient`：真实实现为 Groq HTTP 客户端，测试用 Mock。

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// 上游调用失败：非 200 状态、传输失败（含超时）或响应不是 JSON
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("upstream returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid JSON response: {0}")]
    Decode(String),
}

/// 网关客户端：按函数名与输入参数调用上游，返回原样 JSON
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn invoke(&self, function_name: &str, inputs: Value) -> Result<Value, GatewayError>;
}
