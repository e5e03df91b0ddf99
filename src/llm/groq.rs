//! Groq API 客户端
//!
//! 直接透传：POST `{function, inputs}` 到固定端点，带 Bearer token。
//! 无重试、无响应结构校验；仅以请求超时兜底，超时按传输错误处理。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::config::GroqSection;
use crate::llm::{GatewayClient, GatewayError};

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    function: &'a str,
    inputs: Value,
}

/// Groq 客户端：持有 reqwest Client、端点与 token
pub struct GroqClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GroqClient {
    /// api_key 缺失时不报错，发出的请求会被上游以 401 拒绝
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.unwrap_or_default(),
        })
    }

    pub fn from_config(cfg: &GroqSection) -> Result<Self, reqwest::Error> {
        Self::new(cfg.endpoint.clone(), cfg.api_key.clone(), cfg.timeout())
    }
}

fn transport_error(endpoint: &str, e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Transport(format!("request to {} timed out", endpoint))
    } else {
        GatewayError::Transport(e.to_string())
    }
}

#[async_trait]
impl GatewayClient for GroqClient {
    async fn invoke(&self, function_name: &str, inputs: Value) -> Result<Value, GatewayError> {
        let payload = InvokeRequest {
            function: function_name,
            inputs,
        };

        tracing::debug!(function = function_name, endpoint = %self.endpoint, "calling Groq");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(&self.endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&self.endpoint, e))?;

        if status != StatusCode::OK {
            tracing::warn!(function = function_name, status = status.as_u16(), "Groq call rejected");
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CHAT_PATH: &str = "/openai/v1/chat/completions";

    fn client_for(server: &MockServer, timeout: Duration) -> GroqClient {
        GroqClient::new(
            format!("{}{}", server.uri(), CHAT_PATH),
            Some("TEST_API_KEY".to_string()),
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(header("authorization", "Bearer TEST_API_KEY"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "function": "test_function",
                "inputs": {"key": "value"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let result = client
            .invoke("test_function", json!({"key": "value"}))
            .await
            .unwrap();
        assert_eq!(result, json!({"result": "success"}));
    }

    #[tokio::test]
    async fn test_invoke_non_200_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .invoke("test_function", json!({"key": "value"}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Http {
                status: 400,
                body: "Bad Request".to_string()
            }
        );
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn test_invoke_created_is_not_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"result": 1})))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.invoke("f", json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Http { status: 201, .. }));
    }

    #[tokio::test]
    async fn test_invoke_connection_refused() {
        // 绑定后立即释放，得到一个无人监听的端口
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}{}", listener.local_addr().unwrap(), CHAT_PATH);
        drop(listener);

        let client = GroqClient::new(endpoint, None, Duration::from_secs(5)).unwrap();
        let err = client.invoke("f", json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_invoke_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": 1}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(200));
        let err = client.invoke("f", json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(ref msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_invoke_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.invoke("f", json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_rejected_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API Key"))
            .expect(1)
            .mount(&server)
            .await;

        let client = GroqClient::new(
            format!("{}{}", server.uri(), CHAT_PATH),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let err = client.invoke("f", json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Http { status: 401, .. }));
    }
}
