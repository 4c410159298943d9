// ==========================================
// 设备维护排程系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod equipment_repo;
pub mod equipment_repo_impl;
pub mod error;
pub mod import_batch_repo;
pub mod settings_repo;

// 重导出核心仓储
pub use equipment_repo::EquipmentRepository;
pub use equipment_repo_impl::SqliteEquipmentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use import_batch_repo::ImportBatchRepository;
pub use settings_repo::{SettingsRepository, SqliteSettingsRepository};
