// ==========================================
// 设备维护排程系统 - 导入管道接口
// ==========================================
// 管道: 文件/流解析(FileParser) → 列映射(FieldMapper) → 校验与对账(EquipmentImporter)
// ==========================================

use crate::domain::equipment::EquipmentDraft;
use crate::domain::types::RecordType;
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawRow / RawTable - 解析产物
// ==========================================

/// 单个数据行
///
/// row_number 为 1 基数据行号(不含表头)
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize,
    /// Ok: 列名 → 单元格文本; Err: 该行无法读取的原因(行级错误)
    pub cells: Result<HashMap<String, String>, String>,
}

/// 解析后的整张表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    /// 解析文件为原始表
    ///
    /// # 返回
    /// - Err: 文件不存在/格式不支持/读取失败(整体中止)
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 只做列名 → 草稿字段的搬运,不做解析与校验
pub trait FieldMapper: Send + Sync {
    fn record_type(&self) -> RecordType;

    /// 把一行单元格映射为草稿(缺失列映射为 None)
    fn map_row(&self, cells: &HashMap<String, String>) -> EquipmentDraft;
}
