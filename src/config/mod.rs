// ==========================================
// 设备维护排程系统 - 配置层
// ==========================================
// 职责: 进程级配置、排程配置(合并/校验/保存)、角色权限表
// 存储: config_kv 表
// ==========================================

pub mod app_config;
pub mod error;
pub mod permissions;
pub mod settings_manager;
pub mod settings_validator;

// 重导出核心配置组件
pub use app_config::{get_default_db_path, AppConfig};
pub use error::{SettingsError, SettingsResult};
pub use permissions::PermissionTable;
pub use settings_manager::SettingsManager;
pub use settings_validator::SettingsValidator;
