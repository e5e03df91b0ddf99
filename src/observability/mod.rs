//! 可观测性：tracing 订阅器初始化
//!
//! 控制台输出 + 可选日志文件（`log.file` / `LOG_FILE_PATH`）。级别默认取配置，`RUST_LOG` 优先。

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogSection;

/// 构建过滤器：RUST_LOG 存在时使用它，否则用配置中的级别
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// 日志文件所在目录与文件名；无父目录时写到当前目录
fn split_log_path(path: &Path) -> (&Path, &std::ffi::OsStr) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("calculator.log"));
    (dir, file)
}

/// 初始化全局订阅器
///
/// 返回的 guard 必须在 main 中持有到进程结束，否则文件日志可能丢失尾部。
pub fn init(cfg: &LogSection) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &cfg.file {
        Some(path) => {
            let (dir, file) = split_log_path(path);
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(build_filter(&cfg.level))
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    if let Some(path) = &cfg.file {
        tracing::info!("Logging to file {}", path.display());
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_split_log_path() {
        let path = PathBuf::from("/var/log/calc/app.log");
        let (dir, file) = split_log_path(&path);
        assert_eq!(dir, Path::new("/var/log/calc"));
        assert_eq!(file, "app.log");

        let bare = PathBuf::from("app.log");
        let (dir, file) = split_log_path(&bare);
        assert_eq!(dir, Path::new("."));
        assert_eq!(file, "app.log");
    }
}
