//! Calculator Web 服务
//!
//! 启动: cargo run
//! 浏览器访问 http://127.0.0.1:8000
//!
//! 环境变量:
//! - API_KEY: Groq API Bearer token（启动时不校验）
//! - DATABASE_URL: 数据库连接串（默认 sqlite:calculator.db?mode=rwc）
//! - LOG_FILE_PATH: 日志文件路径（可选）
//! - CALC__*: 覆盖 config/default.toml 中的任意键

use std::sync::Arc;

use anyhow::Context;
use calculator::config::load_config;
use calculator::core::{ShutdownCoordinator, ShutdownManager, StoreCleanup};
use calculator::llm::GroqClient;
use calculator::observability;
use calculator::storage::SqliteCalculationStore;
use calculator::web::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = load_config(None).context("Failed to load configuration")?;
    let _log_guard = observability::init(&cfg.log).context("Failed to initialize logging")?;

    tracing::info!("Application startup...");

    let store = SqliteCalculationStore::connect(&cfg.database.url, cfg.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", cfg.database.url))?;

    let gateway = GroqClient::from_config(&cfg.groq).context("Failed to build Groq client")?;
    if cfg.groq.api_key.is_none() {
        tracing::warn!("API_KEY is not set; Groq routes will be rejected upstream");
    }

    let addr = cfg.server.socket_addr().context("Invalid server address")?;
    let cfg = Arc::new(cfg);
    let state = Arc::new(AppState::new(
        cfg.clone(),
        Arc::new(store.clone()),
        Arc::new(gateway),
    ));
    let app = create_router(state);

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.install_signal_handlers();

    let mut coordinator = ShutdownCoordinator::new();
    coordinator.register(StoreCleanup::new(store));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    let signal = Arc::clone(&shutdown);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { signal.wait_for_shutdown().await })
        .await;

    if let Err(e) = &served {
        tracing::error!("Server error: {}", e);
    }

    coordinator.run_cleanup().await;

    served.context("Server terminated with error")
}
