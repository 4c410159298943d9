// ==========================================
// 设备维护排程系统 - 设备领域模型
// ==========================================
// 记录: EquipmentBase + PPM(四季度检查点) / OCM(单一下次维护日期)
// 草稿: 表单/导入行的原始输入,经校验后才成为记录
// 红线: serial 在同一记录类型内唯一; seq_no 创建后不可变
// ==========================================

use crate::domain::types::{MaintenanceStatus, Quarter, RecordType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// EquipmentBase - 设备公共字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentBase {
    // ===== 标识 =====
    pub seq_no: i64,    // 创建顺序号(不可变)
    pub serial: String, // 序列号(类型内唯一键)

    // ===== 设备信息 =====
    pub equipment: String,         // 设备名称
    pub name: Option<String>,      // 显示名称(可选)
    pub model: String,             // 型号
    pub manufacturer: String,      // 生产厂家
    pub department: String,        // 所属科室
    pub log_number: String,        // 登记号

    // ===== 日期 =====
    pub installation_date: Option<NaiveDate>, // 安装日期
    pub warranty_end: Option<NaiveDate>,      // 保修截止

    // ===== 派生状态 =====
    pub status: MaintenanceStatus,
}

// ==========================================
// Checkpoint - PPM 季度检查点
// ==========================================
// 记录了工程师即视为已完成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub quarter: Quarter,
    pub engineer: Option<String>,
    pub target_date: NaiveDate,
}

impl Checkpoint {
    pub fn is_satisfied(&self) -> bool {
        self.engineer
            .as_deref()
            .map(|e| !e.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpmRecord {
    pub base: EquipmentBase,
    pub checkpoints: [Checkpoint; 4], // 按 I..IV 排列
}

impl PpmRecord {
    pub fn checkpoint(&self, quarter: Quarter) -> &Checkpoint {
        &self.checkpoints[quarter.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcmRecord {
    pub base: EquipmentBase,
    pub service_date: Option<NaiveDate>, // 上次维护日期
    pub next_maintenance: NaiveDate,     // 下次维护日期
    pub engineer: String,                // 负责工程师
    pub linked_ppm: Option<String>,      // 关联 PPM 记录(序列号)
}

// ==========================================
// EquipmentRecord - 记录统一视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record_type", rename_all = "lowercase")]
pub enum EquipmentRecord {
    Ppm(PpmRecord),
    Ocm(OcmRecord),
}

impl EquipmentRecord {
    pub fn record_type(&self) -> RecordType {
        match self {
            EquipmentRecord::Ppm(_) => RecordType::Ppm,
            EquipmentRecord::Ocm(_) => RecordType::Ocm,
        }
    }

    pub fn base(&self) -> &EquipmentBase {
        match self {
            EquipmentRecord::Ppm(r) => &r.base,
            EquipmentRecord::Ocm(r) => &r.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut EquipmentBase {
        match self {
            EquipmentRecord::Ppm(r) => &mut r.base,
            EquipmentRecord::Ocm(r) => &mut r.base,
        }
    }

    pub fn serial(&self) -> &str {
        &self.base().serial
    }

    pub fn seq_no(&self) -> i64 {
        self.base().seq_no
    }

    pub fn status(&self) -> MaintenanceStatus {
        self.base().status
    }

    pub fn as_ppm(&self) -> Option<&PpmRecord> {
        match self {
            EquipmentRecord::Ppm(r) => Some(r),
            EquipmentRecord::Ocm(_) => None,
        }
    }

    pub fn as_ocm(&self) -> Option<&OcmRecord> {
        match self {
            EquipmentRecord::Ocm(r) => Some(r),
            EquipmentRecord::Ppm(_) => None,
        }
    }
}

// ==========================================
// 草稿 (Draft) - 未校验的原始输入
// ==========================================
// 所有字段保持字符串形态,由 EquipmentValidator 统一解析
// seq_no 不在草稿中: 创建时分配,更新时保留
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseDraft {
    pub equipment: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub manufacturer: Option<String>,
    pub department: Option<String>,
    pub log_number: Option<String>,
    pub installation_date: Option<String>,
    pub warranty_end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointDraft {
    pub engineer: Option<String>,
    pub target_date: Option<String>, // 缺省时由安装日期派生
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PpmDraft {
    pub base: BaseDraft,
    pub checkpoints: [CheckpointDraft; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcmDraft {
    pub base: BaseDraft,
    pub service_date: Option<String>,
    pub next_maintenance: Option<String>, // 缺省时 = service_date + 12 个月
    pub engineer: Option<String>,
    pub linked_ppm: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record_type", rename_all = "lowercase")]
pub enum DraftDetail {
    Ppm(PpmDraft),
    Ocm(OcmDraft),
}

/// 创建/更新入参
///
/// pinned_status 仅供受信任的内部调用方(如状态刷新)使用;
/// 为 None 时状态由日期重新派生。导入路径永远不设置该字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDraft {
    pub detail: DraftDetail,
    #[serde(default)]
    pub pinned_status: Option<MaintenanceStatus>,
}

impl EquipmentDraft {
    pub fn ppm(draft: PpmDraft) -> Self {
        Self {
            detail: DraftDetail::Ppm(draft),
            pinned_status: None,
        }
    }

    pub fn ocm(draft: OcmDraft) -> Self {
        Self {
            detail: DraftDetail::Ocm(draft),
            pinned_status: None,
        }
    }

    pub fn with_pinned_status(mut self, status: MaintenanceStatus) -> Self {
        self.pinned_status = Some(status);
        self
    }

    pub fn record_type(&self) -> RecordType {
        match &self.detail {
            DraftDetail::Ppm(_) => RecordType::Ppm,
            DraftDetail::Ocm(_) => RecordType::Ocm,
        }
    }

    pub fn base(&self) -> &BaseDraft {
        match &self.detail {
            DraftDetail::Ppm(d) => &d.base,
            DraftDetail::Ocm(d) => &d.base,
        }
    }

    /// 草稿中的序列号(去空白)
    pub fn serial(&self) -> Option<&str> {
        self.base()
            .serial
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
