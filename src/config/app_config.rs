// ==========================================
// 设备维护排程系统 - 进程级配置
// ==========================================
// 数据库路径: 环境变量 EQUIPMENT_MAINTENANCE_DB_PATH 优先,
//             否则 用户数据目录/equipment-maintenance/equipment_maintenance.db,
//             再否则 ./equipment_maintenance.db
// 日志过滤: RUST_LOG(默认 info)
// ==========================================

use std::path::PathBuf;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "EQUIPMENT_MAINTENANCE_DB_PATH";

const APP_DIR_NAME: &str = "equipment-maintenance";
const DB_FILE_NAME: &str = "equipment_maintenance.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: String,
    pub log_filter: String,
}

impl AppConfig {
    /// 从环境变量构建
    pub fn from_env() -> Self {
        Self {
            db_path: get_default_db_path(),
            log_filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// 指定数据库路径(测试/嵌入场景)
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            log_filter: "info".to_string(),
        }
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);
    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = data_dir.join(APP_DIR_NAME);
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&app_dir).is_ok() {
            path = app_dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
