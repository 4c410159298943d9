// ==========================================
// 设备维护排程系统 - 边界错误类型
// ==========================================
// 职责: 统一各层错误,并给出显式错误种类 ErrorKind
// 边界层(HTTP 等)只按 ErrorKind 映射响应,核心保持与传输无关
// ==========================================

use crate::config::error::SettingsError;
use crate::engine::error::EquipmentError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ==========================================
// ErrorKind - 错误种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,            // 字段缺失/格式错误
    DuplicateKey,          // 创建时序列号冲突
    NotFound,              // 更新时序列号不存在
    ConfigurationConflict, // 互斥配置同真/同假
    ConfigurationRange,    // 数值越界
    ConfigurationType,     // 类型错误
    ImportRead,            // 导入流读取失败(整体中止)
    Storage,               // 存储协作方失败
}

impl ErrorKind {
    /// 是否为调用方输入问题(边界层通常映射为客户端错误)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::Storage)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "VALIDATION"),
            ErrorKind::DuplicateKey => write!(f, "DUPLICATE_KEY"),
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::ConfigurationConflict => write!(f, "CONFIGURATION_CONFLICT"),
            ErrorKind::ConfigurationRange => write!(f, "CONFIGURATION_RANGE"),
            ErrorKind::ConfigurationType => write!(f, "CONFIGURATION_TYPE"),
            ErrorKind::ImportRead => write!(f, "IMPORT_READ"),
            ErrorKind::Storage => write!(f, "STORAGE"),
        }
    }
}

// ==========================================
// ApiError - 统一错误
// ==========================================
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Equipment(#[from] EquipmentError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Equipment(e) => e.kind(),
            ApiError::Settings(e) => e.kind(),
            ApiError::Import(e) => e.kind(),
            ApiError::Repository(_) => ErrorKind::Storage,
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
