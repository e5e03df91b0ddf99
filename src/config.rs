//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `CALC__*` 覆盖（双下划线表示嵌套，如 `CALC__SERVER__PORT=9000`），
//! 最后套用部署沿用的扁平变量 `API_KEY`、`DATABASE_URL`、`LOG_FILE_PATH`。
//! 进程启动时构建一次，之后只读，经 `Arc` 传给 HTTP 层与 Groq 客户端。

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub groq: GroqSection,
    pub log: LogSection,
}

/// [server] 段：监听地址与静态文件目录
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// index.html 与 /static 资源所在目录
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerSection {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// [database] 段
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite:calculator.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// [groq] 段：Bearer token、端点与请求超时
#[derive(Debug, Clone, Deserialize)]
pub struct GroqSection {
    /// 启动时不校验；缺失时首次调用会被上游拒绝
    pub api_key: Option<String>,
    #[serde(default = "default_groq_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_groq_timeout")]
    pub timeout_secs: u64,
}

fn default_groq_endpoint() -> String {
    DEFAULT_GROQ_ENDPOINT.to_string()
}

fn default_groq_timeout() -> u64 {
    30
}

impl Default for GroqSection {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_groq_endpoint(),
            timeout_secs: default_groq_timeout(),
        }
    }
}

impl GroqSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// [log] 段：日志级别与可选的日志文件
#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// 扁平环境变量 -> 配置键
const FLAT_ENV_OVERRIDES: [(&str, &str); 3] = [
    ("API_KEY", "groq.api_key"),
    ("DATABASE_URL", "database.url"),
    ("LOG_FILE_PATH", "log.file"),
];

/// 从 config 目录加载配置，环境变量 CALC__* 与扁平变量可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 叠加环境变量 CALC__*（双下划线表示嵌套键）
/// 4. 最后套用 API_KEY / DATABASE_URL / LOG_FILE_PATH
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    load_config_with(config_path, |key| std::env::var(key).ok())
}

/// 同 `load_config`，扁平变量由 `lookup` 提供（测试时可注入）
pub fn load_config_with<F>(
    config_path: Option<PathBuf>,
    lookup: F,
) -> Result<AppConfig, config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("CALC")
            .separator("__")
            .try_parsing(true),
    );

    for (var, key) in FLAT_ENV_OVERRIDES {
        if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
            builder = builder.set_override(key, value)?;
        }
    }

    let c = builder.build()?;
    c.try_deserialize()
}
