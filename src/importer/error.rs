// ==========================================
// 设备维护排程系统 - 导入模块错误类型
// ==========================================
// 只描述整体中止的致命错误(文件/流读取失败)
// 单行问题不在此处: 以 RowOutcome::Failed 收集进汇总结果
// 工具: thiserror 派生宏
// ==========================================

use crate::api::error::ErrorKind;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("表头缺失: 输入中没有表头行")]
    MissingHeader,

    // ===== 导出错误 =====
    #[error("导出写入失败: {0}")]
    ExportWriteError(String),
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::ExportWriteError(_) => ErrorKind::Storage,
            _ => ErrorKind::ImportRead,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            ImportError::FileReadError(err.to_string())
        } else {
            ImportError::CsvParseError(err.to_string())
        }
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
