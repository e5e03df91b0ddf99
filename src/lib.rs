//! Calculator - 四则运算 Web 服务
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: HTTP 错误映射、优雅关闭
//! - **llm**: Groq 网关客户端抽象与实现（Groq / Mock）
//! - **observability**: tracing 日志（控制台 + 文件）
//! - **operations**: 四则运算与 `Operation` 枚举
//! - **storage**: 计算记录持久化（SQLite）
//! - **web**: axum 路由与处理函数

pub mod config;
pub mod core;
pub mod llm;
pub mod observability;
pub mod operations;
pub mod storage;
pub mod web;

pub use config::{load_config, AppConfig};
pub use operations::{DomainError, Operation};
pub use web::{create_router, AppState};
