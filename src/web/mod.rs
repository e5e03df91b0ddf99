//! HTTP 服务层
//!
//! 路由：
//! - `GET /`               计算器页面（static_dir/index.html）
//! - `POST /`              四则运算并写库
//! - `GET /calculations`   全部计算记录
//! - `POST /groq-calculate` 经 Groq 计算
//! - `POST /groq-ask`      经 Groq 自然语言提问
//! - `GET /static/*`       静态资源

pub mod dto;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::AppConfig;
use crate::llm::GatewayClient;
use crate::storage::CalculationStore;

/// 服务状态：启动时构建，之后只读
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn CalculationStore>,
    pub gateway: Arc<dyn GatewayClient>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn CalculationStore>,
        gateway: Arc<dyn GatewayClient>,
    ) -> Self {
        Self {
            config,
            store,
            gateway,
        }
    }
}

/// 创建路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/", get(handlers::index).post(handlers::calculate))
        .route("/calculations", get(handlers::list_calculations))
        .route("/groq-calculate", post(handlers::groq_calculate))
        .route("/groq-ask", post(handlers::groq_ask))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
