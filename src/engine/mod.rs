// ==========================================
// 设备维护排程系统 - 引擎层
// ==========================================
// 职责: 实现业务规则(季度排程/状态派生/记录校验/身份守卫),不拼 SQL
// 红线: Engine 不拼 SQL, 校验失败必须给出字段名与原因
// ==========================================

pub mod equipment_service;
pub mod error;
pub mod quarter_schedule;
pub mod status;
pub mod validation;

// 重导出核心引擎
pub use equipment_service::EquipmentService;
pub use error::{EquipmentError, EquipmentResult};
pub use quarter_schedule::QuarterScheduler;
pub use status::StatusEngine;
pub use validation::EquipmentValidator;
