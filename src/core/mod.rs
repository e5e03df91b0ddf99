//! 核心层：HTTP 错误映射与优雅关闭

pub mod error;
pub mod shutdown;

pub use error::ApiError;
pub use shutdown::{ShutdownCleanup, ShutdownCoordinator, ShutdownManager, StoreCleanup};
