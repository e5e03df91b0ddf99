//! 计算记录持久化
//!
//! `CalculationStore` 抽象存储后端；`SqliteCalculationStore` 为基于 sqlx 的实现。
//! 记录只追加，不更新、不删除。

mod model;
mod sqlite;

pub use model::{CalculationRecord, NewCalculation};
pub use sqlite::SqliteCalculationStore;

use async_trait::async_trait;
use thiserror::Error;

/// 存储层错误：写入被拒、连接失败或读到无法识别的行
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// 计算记录存储（可用于抽象不同的存储后端）
#[async_trait]
pub trait CalculationStore: Send + Sync {
    /// 插入一条记录，返回带自增 id 的完整记录
    async fn create(&self, calculation: NewCalculation) -> Result<CalculationRecord, StorageError>;

    /// 全部记录，按 id 升序
    async fn list(&self) -> Result<Vec<CalculationRecord>, StorageError>;
}
