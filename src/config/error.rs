// ==========================================
// 设备维护排程系统 - 配置层错误类型
// ==========================================
// 任一错误都发生在持久化之前: 已保存的配置保持不变
// ==========================================

use crate::api::error::ErrorKind;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 配置校验/保存错误
#[derive(Error, Debug)]
pub enum SettingsError {
    // ===== 校验错误 =====
    #[error("配置冲突: {message}")]
    ConfigurationConflict { message: String },

    #[error("配置值越界 ({field}): {message}")]
    ConfigurationRange { field: String, message: String },

    #[error("配置类型错误 ({field}): 期望 {expected}")]
    ConfigurationType { field: String, expected: String },

    // ===== 存储错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SettingsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SettingsError::ConfigurationConflict { .. } => ErrorKind::ConfigurationConflict,
            SettingsError::ConfigurationRange { .. } => ErrorKind::ConfigurationRange,
            SettingsError::ConfigurationType { .. } => ErrorKind::ConfigurationType,
            SettingsError::Repository(_) => ErrorKind::Storage,
        }
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Repository(RepositoryError::SerializationError(err.to_string()))
    }
}

/// Result 类型别名
pub type SettingsResult<T> = Result<T, SettingsError>;
