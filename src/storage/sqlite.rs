//! 异步 SQLite 持久化（sqlx）
//!
//! 每次 create / list 从连接池取出一个连接，调用结束（成功或失败）时随 guard 归还。

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{CalculationRecord, CalculationStore, NewCalculation, StorageError};
use crate::operations::Operation;

/// SQLite 计算记录存储
#[derive(Clone)]
pub struct SqliteCalculationStore {
    pool: SqlitePool,
}

impl SqliteCalculationStore {
    /// 连接数据库并建表
    ///
    /// `sqlite::memory:` 每个连接是独立的库，此时 max_connections 应为 1。
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    /// 初始化数据库表，可重复执行
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS calculations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                operation TEXT NOT NULL,
                num1 REAL NOT NULL,
                num2 REAL NOT NULL,
                result REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<CalculationRecord, StorageError> {
    let id: i64 = row.try_get("id")?;
    let operation: String = row.try_get("operation")?;
    let operation = operation
        .parse::<Operation>()
        .map_err(|e| StorageError::Corrupt {
            id,
            reason: e.to_string(),
        })?;

    Ok(CalculationRecord {
        id,
        operation,
        num1: row.try_get("num1")?,
        num2: row.try_get("num2")?,
        result: row.try_get("result")?,
    })
}

#[async_trait::async_trait]
impl CalculationStore for SqliteCalculationStore {
    async fn create(&self, calculation: NewCalculation) -> Result<CalculationRecord, StorageError> {
        let mut conn = self.pool.acquire().await?;

        let done = sqlx::query(
            "INSERT INTO calculations (operation, num1, num2, result) VALUES (?, ?, ?, ?)",
        )
        .bind(calculation.operation().as_str())
        .bind(calculation.num1())
        .bind(calculation.num2())
        .bind(calculation.result())
        .execute(&mut *conn)
        .await?;

        Ok(calculation.into_record(done.last_insert_rowid()))
    }

    async fn list(&self) -> Result<Vec<CalculationRecord>, StorageError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(
            "SELECT id, operation, num1, num2, result FROM calculations ORDER BY id ASC",
        )
        .fetch_all(&mut *conn)
        .await?;

        rows.iter().map(record_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_store(dir: &TempDir) -> SqliteCalculationStore {
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        SqliteCalculationStore::connect(&url, 2).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir).await;

        let first = store
            .create(NewCalculation::compute(Operation::Add, 1.0, 2.0).unwrap())
            .await
            .unwrap();
        let second = store
            .create(NewCalculation::compute(Operation::Divide, 9.0, 3.0).unwrap())
            .await
            .unwrap();

        assert_eq!(first.result, 3.0);
        assert!(second.id > first.id);

        let all = store.list().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir).await;
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_schema_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir).await;
        store
            .create(NewCalculation::compute(Operation::Subtract, 5.0, 3.0).unwrap())
            .await
            .unwrap();

        store.init_schema().await.unwrap();
        store.init_schema().await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_records_survive_reconnect() {
        let dir = TempDir::new().unwrap();
        {
            let store = temp_store(&dir).await;
            store
                .create(NewCalculation::compute(Operation::Multiply, 2.0, 8.0).unwrap())
                .await
                .unwrap();
            store.close().await;
        }

        let store = temp_store(&dir).await;
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].operation, Operation::Multiply);
        assert_eq!(all[0].result, 16.0);
    }

    #[tokio::test]
    async fn test_closed_pool_surfaces_error() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir).await;
        store.close().await;

        let err = store
            .create(NewCalculation::compute(Operation::Add, 1.0, 1.0).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Database(_)));
    }

    #[tokio::test]
    async fn test_unknown_operation_row_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir).await;
        sqlx::query(
            "INSERT INTO calculations (operation, num1, num2, result) VALUES ('modulo', 1, 2, 1)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { reason, .. } if reason.contains("modulo")));
    }
}
