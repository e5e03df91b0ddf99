//! Mock 网关客户端（用于测试，无需 API）
//!
//! 按顺序返回预置结果，并记录每次调用的函数名与输入。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::{GatewayClient, GatewayError};

/// Mock 客户端：预置响应队列 + 调用记录
#[derive(Debug, Default)]
pub struct MockGatewayClient {
    responses: Mutex<VecDeque<Result<Value, GatewayError>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockGatewayClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个预置结果
    pub fn push(&self, response: Result<Value, GatewayError>) -> &Self {
        if let Ok(mut q) = self.responses.lock() {
            q.push_back(response);
        }
        self
    }

    pub fn with_response(response: Result<Value, GatewayError>) -> Self {
        let mock = Self::new();
        mock.push(response);
        mock
    }

    /// 已发生的调用：(function_name, inputs)
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GatewayClient for MockGatewayClient {
    async fn invoke(&self, function_name: &str, inputs: Value) -> Result<Value, GatewayError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((function_name.to_string(), inputs));
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| Err(GatewayError::Transport("no scripted response".to_string())))
    }
}
