// ==========================================
// 设备维护排程系统 - 导入/批量操作结果模型
// ==========================================
// RowOutcome: 单行结果(成功带记录 / 失败带原因)
// ImportSummary: 汇总(新增/更新/跳过 + 有序错误列表)
// ImportBatch: 导入批次审计记录
// ==========================================

use crate::domain::equipment::EquipmentRecord;
use crate::domain::types::{Quarter, RecordType, ReminderWindow};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RowOutcome - 单行对账结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowOutcome {
    Added { row_number: usize, record: EquipmentRecord },
    Updated { row_number: usize, record: EquipmentRecord },
    Failed { row_number: usize, reason: String },
}

impl RowOutcome {
    pub fn row_number(&self) -> usize {
        match self {
            RowOutcome::Added { row_number, .. }
            | RowOutcome::Updated { row_number, .. }
            | RowOutcome::Failed { row_number, .. } => *row_number,
        }
    }
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
// skipped/errors 非零视为部分成功,而非整体失败
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub total_rows: usize,
    pub added_count: usize,
    pub updated_count: usize,
    pub skipped_count: usize,
    pub errors: Vec<String>, // "Row {n}: {reason}",按输入顺序
    pub elapsed_ms: u64,
}

impl ImportSummary {
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            ..Self::default()
        }
    }

    /// 累加一行结果
    pub fn record(&mut self, outcome: &RowOutcome) {
        self.total_rows += 1;
        match outcome {
            RowOutcome::Added { .. } => self.added_count += 1,
            RowOutcome::Updated { .. } => self.updated_count += 1,
            RowOutcome::Failed { row_number, reason } => {
                self.skipped_count += 1;
                self.errors.push(format!("Row {}: {}", row_number, reason));
            }
        }
    }

    pub fn is_partial(&self) -> bool {
        self.skipped_count > 0
    }
}

// ==========================================
// BulkDeleteSummary - 批量删除结果
// ==========================================
// 非事务: 逐个删除,部分完成按计数报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteSummary {
    pub deleted_count: usize,
    pub not_found: usize,
    pub not_found_serials: Vec<String>,
}

// ==========================================
// ImportBatch - 导入批次审计
// ==========================================
// 对齐: import_batch 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,            // 批次 ID(UUID)
    pub record_type: RecordType,     // 导入的记录类型
    pub source_name: Option<String>, // 源文件名/流名称
    pub total_rows: i64,
    pub added_rows: i64,
    pub updated_rows: i64,
    pub skipped_rows: i64,
    pub errors_json: String,         // 行错误列表 JSON
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

// ==========================================
// DueItem - 到期维护项(提醒选择用)
// ==========================================
// PPM: 每个未完成的检查点一项; OCM: 每条记录一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueItem {
    pub record_type: RecordType,
    pub serial: String,
    pub equipment: String,
    pub department: String,
    pub quarter: Option<Quarter>,
    pub due_date: NaiveDate,
    pub engineer: Option<String>,
    pub days_until_due: i64,
    pub window: Option<ReminderWindow>,
}
