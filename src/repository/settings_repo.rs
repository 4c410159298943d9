// ==========================================
// 设备维护排程系统 - 配置存储 Repository
// ==========================================
// 存储: config_kv 表 (scope_id='global', 每个顶层键一行, value 为 JSON 文本)
// 契约: load_settings() -> 映射; save_settings(映射) 整体写入(单事务)
// 红线: 不做校验,校验在 SettingsManager 中完成后才会调用 save
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tracing::debug;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// SettingsRepository Trait
// ==========================================
pub trait SettingsRepository: Send + Sync {
    /// 读取已持久化的配置映射（未持久化时为空映射）
    fn load_settings(&self) -> RepositoryResult<Map<String, Value>>;

    /// 整体保存配置映射（映射中不存在的键会被移除）
    fn save_settings(&self, settings: &Map<String, Value>) -> RepositoryResult<()>;
}

// ==========================================
// SqliteSettingsRepository
// ==========================================
pub struct SqliteSettingsRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSettingsRepository {
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
}

impl SettingsRepository for SqliteSettingsRepository {
    fn load_settings(&self) -> RepositoryResult<Map<String, Value>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut map = Map::new();
        for (key, raw) in rows {
            let value: Value = serde_json::from_str(&raw)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    fn save_settings(&self, settings: &Map<String, Value>) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM config_kv WHERE scope_id = ?1", params![GLOBAL_SCOPE])?;
        for (key, value) in settings {
            let raw = serde_json::to_string(value)?;
            tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                params![GLOBAL_SCOPE, key, raw],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(keys = settings.len(), "配置已写入 config_kv");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup_repo() -> SqliteSettingsRepository {
        let conn = Connection::open_in_memory().expect("打开内存数据库失败");
        crate::db::init_schema(&conn).expect("建表失败");
        SqliteSettingsRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_load_empty() {
        let repo = setup_repo();
        assert!(repo.load_settings().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_json_types() {
        let repo = setup_repo();
        let mut map = Map::new();
        map.insert("use_daily_send_time".to_string(), json!(true));
        map.insert("email_reminder_interval_minutes".to_string(), json!(30));
        map.insert("reminder_timing".to_string(), json!({"60_days_before": false}));
        repo.save_settings(&map).unwrap();

        assert_eq!(repo.load_settings().unwrap(), map);
    }

    #[test]
    fn test_save_replaces_whole_mapping() {
        let repo = setup_repo();
        let mut first = Map::new();
        first.insert("a".to_string(), json!(1));
        first.insert("b".to_string(), json!(2));
        repo.save_settings(&first).unwrap();

        let mut second = Map::new();
        second.insert("a".to_string(), json!(3));
        repo.save_settings(&second).unwrap();

        assert_eq!(repo.load_settings().unwrap(), second);
    }
}
