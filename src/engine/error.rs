// ==========================================
// 设备维护排程系统 - 引擎层错误类型
// ==========================================
// 创建/更新/删除路径立即返回给调用方,不吞错
// ==========================================

use crate::api::error::ErrorKind;
use crate::domain::types::RecordType;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 设备记录操作错误
#[derive(Error, Debug)]
pub enum EquipmentError {
    // ===== 输入校验 =====
    #[error("字段校验失败 ({field}): {message}")]
    Validation { field: String, message: String },

    // ===== 唯一性 =====
    #[error("序列号重复: {record_type} 已存在 SERIAL={serial}")]
    DuplicateKey {
        record_type: RecordType,
        serial: String,
    },

    #[error("记录未找到: {record_type} SERIAL={serial}")]
    NotFound {
        record_type: RecordType,
        serial: String,
    },

    // ===== 存储 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EquipmentError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EquipmentError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EquipmentError::Validation { .. } => ErrorKind::Validation,
            EquipmentError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            EquipmentError::NotFound { .. } => ErrorKind::NotFound,
            EquipmentError::Repository(_) => ErrorKind::Storage,
        }
    }
}

/// Result 类型别名
pub type EquipmentResult<T> = Result<T, EquipmentError>;
