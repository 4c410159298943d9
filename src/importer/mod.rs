// ==========================================
// 设备维护排程系统 - 导入导出层
// ==========================================
// 职责: 表格数据批量导入(对账) + CSV 导出
// 支持: CSV(文件/字节流), Excel(.xlsx/.xls)
// ==========================================

// 模块声明
pub mod equipment_importer;
pub mod error;
pub mod exporter;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use equipment_importer::EquipmentImporter;
pub use error::{ImportError, ImportResult};
pub use exporter::EquipmentExporter;
pub use field_mapper::{mapper_for, OcmFieldMapper, PpmFieldMapper};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{FieldMapper, FileParser, RawRow, RawTable};
