// ==========================================
// 设备维护排程系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、日期规则
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod columns;
pub mod dates;
pub mod equipment;
pub mod import;
pub mod settings;
pub mod types;

// 重导出核心类型
pub use equipment::{
    BaseDraft, Checkpoint, CheckpointDraft, DraftDetail, EquipmentBase, EquipmentDraft,
    EquipmentRecord, OcmDraft, OcmRecord, PpmDraft, PpmRecord,
};
pub use import::{BulkDeleteSummary, DueItem, ImportBatch, ImportSummary, RowOutcome};
pub use settings::{ReminderTiming, Settings};
pub use types::{MaintenanceStatus, Quarter, RecordType, ReminderWindow};
