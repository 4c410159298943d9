// ==========================================
// 设备维护排程系统 - 导入批次仓储
// ==========================================
// 存储: import_batch 表（每次完成的导入追加一行,只增不改）
// ==========================================

use crate::domain::import::ImportBatch;
use crate::domain::types::RecordType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct ImportBatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImportBatchRepository {
    /// 创建新的仓储实例（自动建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加批次记录
    pub fn insert(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, record_type, source_name, total_rows, added_rows,
                updated_rows, skipped_rows, errors_json, imported_at, elapsed_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                batch.batch_id,
                batch.record_type.as_str(),
                batch.source_name,
                batch.total_rows,
                batch.added_rows,
                batch.updated_rows,
                batch.skipped_rows,
                batch.errors_json,
                batch.imported_at.to_rfc3339(),
                batch.elapsed_ms,
            ],
        )?;
        Ok(())
    }

    /// 最近的批次（按导入时间倒序）
    ///
    /// # 参数
    /// - limit: 最多返回条数
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, record_type, source_name, total_rows, added_rows,
                   updated_rows, skipped_rows, errors_json, imported_at, elapsed_ms
            FROM import_batch
            ORDER BY imported_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        type RawBatch = (String, String, Option<String>, i64, i64, i64, i64, String, String, i64);
        let rows: Vec<RawBatch> = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(
                |(batch_id, record_type, source_name, total, added, updated, skipped, errors_json, imported_at, elapsed_ms)|
                 -> RepositoryResult<ImportBatch> {
                    let record_type: RecordType = record_type.parse().map_err(|msg| {
                        RepositoryError::FieldValueError {
                            field: "record_type".to_string(),
                            message: msg,
                        }
                    })?;
                    let imported_at = DateTime::parse_from_rfc3339(&imported_at)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|e| RepositoryError::FieldValueError {
                            field: "imported_at".to_string(),
                            message: e.to_string(),
                        })?;

                    Ok(ImportBatch {
                        batch_id,
                        record_type,
                        source_name,
                        total_rows: total,
                        added_rows: added,
                        updated_rows: updated,
                        skipped_rows: skipped,
                        errors_json,
                        imported_at,
                        elapsed_ms,
                    })
                },
            )
            .collect()
    }
}
