// ==========================================
// 设备维护排程系统 - API 层
// ==========================================
// 职责: 组装共享连接上的仓储/服务,对外提供统一入口
// 边界层(HTTP/CLI 等)只持有 MaintenanceContext,按 ErrorKind 映射错误
// ==========================================

pub mod error;

use crate::config::{AppConfig, PermissionTable, SettingsManager};
use crate::domain::import::DueItem;
use crate::domain::settings::Settings;
use crate::domain::types::RecordType;
use crate::engine::EquipmentService;
use crate::importer::{EquipmentExporter, EquipmentImporter};
use crate::repository::{
    ImportBatchRepository, RepositoryError, SqliteEquipmentRepository, SqliteSettingsRepository,
};
use rusqlite::Connection;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tracing::info;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ErrorKind};

/// 应用上下文
///
/// 所有仓储共享同一个 SQLite 连接
pub struct MaintenanceContext {
    /// 数据库路径
    pub db_path: String,

    /// 设备记录服务
    pub equipment: Arc<EquipmentService<SqliteEquipmentRepository>>,

    /// 配置管理
    pub settings: SettingsManager<SqliteSettingsRepository>,

    /// 批量导入
    pub importer: EquipmentImporter<SqliteEquipmentRepository>,

    /// CSV 导出
    pub exporter: EquipmentExporter<SqliteEquipmentRepository>,

    /// 导入批次审计
    pub import_batches: Arc<ImportBatchRepository>,

    settings_repo: Arc<SqliteSettingsRepository>,
    permissions: Mutex<PermissionTable>,
}

impl MaintenanceContext {
    /// 按进程配置打开数据库并初始化上下文
    pub fn open(config: &AppConfig) -> ApiResult<Self> {
        info!(db_path = %config.db_path, "初始化应用上下文");
        let conn = crate::db::open_sqlite_connection(&config.db_path)
            .map_err(RepositoryError::from)?;
        Self::from_connection(config.db_path.clone(), conn)
    }

    /// 内存数据库上下文(测试/嵌入场景)
    pub fn open_in_memory() -> ApiResult<Self> {
        let conn = Connection::open_in_memory().map_err(RepositoryError::from)?;
        crate::db::configure_sqlite_connection(&conn).map_err(RepositoryError::from)?;
        Self::from_connection(":memory:".to_string(), conn)
    }

    fn from_connection(db_path: String, conn: Connection) -> ApiResult<Self> {
        crate::db::init_schema(&conn).map_err(RepositoryError::from)?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let equipment_repo = Arc::new(SqliteEquipmentRepository::from_connection(conn.clone()));
        let settings_repo = Arc::new(SqliteSettingsRepository::from_connection(conn.clone()));
        let import_batches = Arc::new(ImportBatchRepository::from_connection(conn));

        // ==========================================
        // 初始化服务层
        // ==========================================
        let equipment = Arc::new(EquipmentService::new(equipment_repo));
        let settings = SettingsManager::new(settings_repo.clone());
        let importer =
            EquipmentImporter::new(equipment.clone()).with_batch_repo(import_batches.clone());
        let exporter = EquipmentExporter::new(equipment.clone());
        let permissions = PermissionTable::load(settings_repo.as_ref())?;

        info!(roles = permissions.role_count(), "应用上下文初始化完成");
        Ok(Self {
            db_path,
            equipment,
            settings,
            importer,
            exporter,
            import_batches,
            settings_repo,
            permissions: Mutex::new(permissions),
        })
    }

    /// 部分更新配置,成功后刷新角色权限表
    pub fn update_settings(&self, patch: &Map<String, Value>) -> ApiResult<Settings> {
        let settings = self.settings.update(patch)?;
        self.reload_permissions()?;
        Ok(settings)
    }

    /// 重新读取角色权限表
    pub fn reload_permissions(&self) -> ApiResult<()> {
        let mut table = self
            .permissions
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        table.reload(self.settings_repo.as_ref())?;
        Ok(())
    }

    /// 角色是否拥有权限(角色名不区分大小写)
    pub fn has_permission(&self, role: &str, permission: &str) -> ApiResult<bool> {
        let table = self
            .permissions
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(table.has_permission(role, permission))
    }

    /// 按当前提醒配置选出两类记录的待提醒项
    pub fn due_reminders(&self) -> ApiResult<Vec<DueItem>> {
        let settings = self.settings.load()?;
        let mut items = Vec::new();
        for record_type in [RecordType::Ppm, RecordType::Ocm] {
            items.extend(
                self.equipment
                    .due_reminders(record_type, &settings.reminder_timing)?,
            );
        }
        items.sort_by_key(|item| item.days_until_due);
        Ok(items)
    }
}
