// ==========================================
// 设备维护排程系统 - 导出格式化器
// ==========================================
// 输出: CSV,列顺序与导入词汇表一致(导出文件可直接回导)
// 格式: 日期 DD/MM/YYYY; 空值 N/A; NO 为 seq_no; Status 为派生状态
// 顺序: 按 seq_no 升序
// ==========================================

use crate::domain::columns::columns_for;
use crate::domain::dates::{format_date, format_optional_date, EMPTY_PLACEHOLDER};
use crate::domain::equipment::{EquipmentBase, EquipmentRecord};
use crate::domain::types::RecordType;
use crate::engine::equipment_service::EquipmentService;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::equipment_repo::EquipmentRepository;
use csv::Writer;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

fn text_or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

fn optional_text(value: Option<&str>) -> String {
    value.map(text_or_placeholder)
        .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string())
}

fn base_cells(base: &EquipmentBase) -> Vec<String> {
    vec![
        base.seq_no.to_string(),
        text_or_placeholder(&base.equipment),
        optional_text(base.name.as_deref()),
        text_or_placeholder(&base.model),
        text_or_placeholder(&base.serial),
        text_or_placeholder(&base.manufacturer),
        text_or_placeholder(&base.department),
        text_or_placeholder(&base.log_number),
        format_optional_date(base.installation_date),
        format_optional_date(base.warranty_end),
    ]
}

/// 把一条记录展开为与 columns_for 对齐的单元格
pub fn record_to_row(record: &EquipmentRecord) -> Vec<String> {
    let mut cells = base_cells(record.base());
    match record {
        EquipmentRecord::Ppm(ppm) => {
            for checkpoint in &ppm.checkpoints {
                cells.push(optional_text(checkpoint.engineer.as_deref()));
                cells.push(format_date(checkpoint.target_date));
            }
        }
        EquipmentRecord::Ocm(ocm) => {
            cells.push(format_optional_date(ocm.service_date));
            cells.push(format_date(ocm.next_maintenance));
            cells.push(text_or_placeholder(&ocm.engineer));
            cells.push(optional_text(ocm.linked_ppm.as_deref()));
        }
    }
    cells.push(record.status().to_string());
    cells
}

// ==========================================
// EquipmentExporter
// ==========================================
pub struct EquipmentExporter<R>
where
    R: EquipmentRepository,
{
    service: Arc<EquipmentService<R>>,
}

impl<R> EquipmentExporter<R>
where
    R: EquipmentRepository,
{
    pub fn new(service: Arc<EquipmentService<R>>) -> Self {
        Self { service }
    }

    /// 写出某类型全部记录
    ///
    /// # 返回
    /// - Ok(n): 写出的数据行数(不含表头)
    pub fn write_csv<W: Write>(&self, record_type: RecordType, writer: W) -> ImportResult<usize> {
        let records = self
            .service
            .get_all_entries(record_type)
            .map_err(|e| ImportError::ExportWriteError(e.to_string()))?;

        let mut csv_writer = Writer::from_writer(writer);
        csv_writer
            .write_record(columns_for(record_type))
            .map_err(|e| ImportError::ExportWriteError(e.to_string()))?;

        for record in &records {
            csv_writer
                .write_record(record_to_row(record))
                .map_err(|e| ImportError::ExportWriteError(e.to_string()))?;
        }
        csv_writer
            .flush()
            .map_err(|e| ImportError::ExportWriteError(e.to_string()))?;

        info!(record_type = %record_type, rows = records.len(), "导出完成");
        Ok(records.len())
    }

    /// 导出为 CSV 文本
    pub fn export_csv(&self, record_type: RecordType) -> ImportResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(record_type, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| ImportError::ExportWriteError(e.to_string()))
    }
}
