// ==========================================
// 设备维护排程系统 - 核心库
// ==========================================
// 范围: PPM(季度预防性维护) / OCM(年度校准维护) 记录管理
// 技术栈: Rust + SQLite
// 职责: 排程派生、状态派生、配置校验、批量导入对账、CSV 导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入导出层 - 表格数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 统一入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MaintenanceStatus, Quarter, RecordType, ReminderWindow};

// 领域实体
pub use domain::{
    EquipmentDraft, EquipmentRecord, ImportSummary, OcmDraft, OcmRecord, PpmDraft, PpmRecord,
    Settings,
};

// 引擎
pub use engine::{EquipmentService, EquipmentValidator, QuarterScheduler, StatusEngine};

// 导入导出
pub use importer::{EquipmentExporter, EquipmentImporter};

// API
pub use api::{ApiError, ApiResult, ErrorKind, MaintenanceContext};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备维护排程系统";
