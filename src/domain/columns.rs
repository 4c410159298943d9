// ==========================================
// 设备维护排程系统 - 表格列词汇表
// ==========================================
// 导入映射与导出列顺序共用同一词汇表,保证导出文件可直接回导
// 校验错误中的字段名也使用列名,便于用户定位
// ==========================================

use crate::domain::types::{Quarter, RecordType};

// ===== 公共列 =====
pub const COL_NO: &str = "NO";
pub const COL_EQUIPMENT: &str = "EQUIPMENT";
pub const COL_NAME: &str = "Name";
pub const COL_MODEL: &str = "MODEL";
pub const COL_SERIAL: &str = "SERIAL";
pub const COL_MANUFACTURER: &str = "MANUFACTURER";
pub const COL_DEPARTMENT: &str = "Department";
pub const COL_LOG_NUMBER: &str = "LOG_Number";
pub const COL_INSTALLATION_DATE: &str = "Installation_Date";
pub const COL_WARRANTY_END: &str = "Warranty_End";
pub const COL_STATUS: &str = "Status";

// ===== PPM 检查点列 =====
pub const COL_PPM_Q_I_ENGINEER: &str = "PPM_Q_I_engineer";
pub const COL_PPM_Q_I_DATE: &str = "PPM_Q_I_date";
pub const COL_PPM_Q_II_ENGINEER: &str = "PPM_Q_II_engineer";
pub const COL_PPM_Q_II_DATE: &str = "PPM_Q_II_date";
pub const COL_PPM_Q_III_ENGINEER: &str = "PPM_Q_III_engineer";
pub const COL_PPM_Q_III_DATE: &str = "PPM_Q_III_date";
pub const COL_PPM_Q_IV_ENGINEER: &str = "PPM_Q_IV_engineer";
pub const COL_PPM_Q_IV_DATE: &str = "PPM_Q_IV_date";

// ===== OCM 列 =====
pub const COL_SERVICE_DATE: &str = "Service_Date";
pub const COL_NEXT_MAINTENANCE: &str = "Next_Maintenance";
pub const COL_ENGINEER: &str = "ENGINEER";
pub const COL_PPM_LINK: &str = "PPM";

/// PPM 导出列顺序
pub const PPM_COLUMNS: &[&str] = &[
    COL_NO,
    COL_EQUIPMENT,
    COL_NAME,
    COL_MODEL,
    COL_SERIAL,
    COL_MANUFACTURER,
    COL_DEPARTMENT,
    COL_LOG_NUMBER,
    COL_INSTALLATION_DATE,
    COL_WARRANTY_END,
    COL_PPM_Q_I_ENGINEER,
    COL_PPM_Q_I_DATE,
    COL_PPM_Q_II_ENGINEER,
    COL_PPM_Q_II_DATE,
    COL_PPM_Q_III_ENGINEER,
    COL_PPM_Q_III_DATE,
    COL_PPM_Q_IV_ENGINEER,
    COL_PPM_Q_IV_DATE,
    COL_STATUS,
];

/// OCM 导出列顺序
pub const OCM_COLUMNS: &[&str] = &[
    COL_NO,
    COL_EQUIPMENT,
    COL_NAME,
    COL_MODEL,
    COL_SERIAL,
    COL_MANUFACTURER,
    COL_DEPARTMENT,
    COL_LOG_NUMBER,
    COL_INSTALLATION_DATE,
    COL_WARRANTY_END,
    COL_SERVICE_DATE,
    COL_NEXT_MAINTENANCE,
    COL_ENGINEER,
    COL_PPM_LINK,
    COL_STATUS,
];

pub fn columns_for(record_type: RecordType) -> &'static [&'static str] {
    match record_type {
        RecordType::Ppm => PPM_COLUMNS,
        RecordType::Ocm => OCM_COLUMNS,
    }
}

/// 检查点工程师列
pub fn quarter_engineer_column(quarter: Quarter) -> &'static str {
    match quarter {
        Quarter::I => COL_PPM_Q_I_ENGINEER,
        Quarter::II => COL_PPM_Q_II_ENGINEER,
        Quarter::III => COL_PPM_Q_III_ENGINEER,
        Quarter::IV => COL_PPM_Q_IV_ENGINEER,
    }
}

/// 检查点日期列
pub fn quarter_date_column(quarter: Quarter) -> &'static str {
    match quarter {
        Quarter::I => COL_PPM_Q_I_DATE,
        Quarter::II => COL_PPM_Q_II_DATE,
        Quarter::III => COL_PPM_Q_III_DATE,
        Quarter::IV => COL_PPM_Q_IV_DATE,
    }
}
