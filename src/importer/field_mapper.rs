// ==========================================
// 设备维护排程系统 - 字段映射器实现
// ==========================================
// 职责: 源列 → 草稿字段(只搬运,不解析日期,不校验)
// 列名: 以导出列为准,兼容旧模板别名
// 忽略: NO(由系统分配) / Status(由日期重新派生)
// ==========================================

use crate::domain::columns::*;
use crate::domain::dates::normalize_text;
use crate::domain::equipment::{BaseDraft, EquipmentDraft, OcmDraft, PpmDraft};
use crate::domain::types::{Quarter, RecordType};
use crate::importer::importer_trait::FieldMapper;
use std::collections::HashMap;

/// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
///
/// 空白与 N/A 视为缺失
fn get_string(row: &HashMap<String, String>, key: &str) -> Option<String> {
    let aliases: Vec<String> = match key {
        COL_MODEL => vec![key.to_string(), "Model".to_string()],
        COL_SERIAL => vec![
            key.to_string(),
            "Serial".to_string(),
            "Serial Number".to_string(),
        ],
        COL_MANUFACTURER => vec![key.to_string(), "Manufacturer".to_string()],
        COL_DEPARTMENT => vec![key.to_string(), "DEPARTMENT".to_string()],
        COL_LOG_NUMBER => vec![
            key.to_string(),
            "Log Number".to_string(),
            "LOG_NO".to_string(),
        ],
        COL_INSTALLATION_DATE => vec![key.to_string(), "Installation Date".to_string()],
        COL_WARRANTY_END => vec![key.to_string(), "Warranty End".to_string()],
        COL_SERVICE_DATE => vec![key.to_string(), "Service Date".to_string()],
        COL_NEXT_MAINTENANCE => vec![key.to_string(), "Next Maintenance".to_string()],
        COL_ENGINEER => vec![key.to_string(), "Engineer".to_string()],
        // 旧模板的检查点列使用点号: PPM_Q_I.date
        _ if key.starts_with("PPM_Q_") => {
            let dotted = key.replacen("_engineer", ".engineer", 1).replacen("_date", ".date", 1);
            vec![key.to_string(), dotted]
        }
        _ => vec![key.to_string()],
    };

    // 尝试所有可能的列名
    aliases
        .iter()
        .find_map(|alias| row.get(alias.as_str()).and_then(|v| normalize_text(Some(v.as_str()))))
}

fn map_base(row: &HashMap<String, String>) -> BaseDraft {
    BaseDraft {
        equipment: get_string(row, COL_EQUIPMENT),
        name: get_string(row, COL_NAME),
        model: get_string(row, COL_MODEL),
        serial: get_string(row, COL_SERIAL),
        manufacturer: get_string(row, COL_MANUFACTURER),
        department: get_string(row, COL_DEPARTMENT),
        log_number: get_string(row, COL_LOG_NUMBER),
        installation_date: get_string(row, COL_INSTALLATION_DATE),
        warranty_end: get_string(row, COL_WARRANTY_END),
    }
}

// ==========================================
// PPM 映射器
// ==========================================
pub struct PpmFieldMapper;

impl FieldMapper for PpmFieldMapper {
    fn record_type(&self) -> RecordType {
        RecordType::Ppm
    }

    fn map_row(&self, cells: &HashMap<String, String>) -> EquipmentDraft {
        let mut draft = PpmDraft {
            base: map_base(cells),
            ..PpmDraft::default()
        };
        for quarter in Quarter::ALL {
            let checkpoint = &mut draft.checkpoints[quarter.index()];
            checkpoint.engineer = get_string(cells, quarter_engineer_column(quarter));
            checkpoint.target_date = get_string(cells, quarter_date_column(quarter));
        }
        EquipmentDraft::ppm(draft)
    }
}

// ==========================================
// OCM 映射器
// ==========================================
pub struct OcmFieldMapper;

impl FieldMapper for OcmFieldMapper {
    fn record_type(&self) -> RecordType {
        RecordType::Ocm
    }

    fn map_row(&self, cells: &HashMap<String, String>) -> EquipmentDraft {
        EquipmentDraft::ocm(OcmDraft {
            base: map_base(cells),
            service_date: get_string(cells, COL_SERVICE_DATE),
            next_maintenance: get_string(cells, COL_NEXT_MAINTENANCE),
            engineer: get_string(cells, COL_ENGINEER),
            linked_ppm: get_string(cells, COL_PPM_LINK),
        })
    }
}

/// 按记录类型选择映射器
pub fn mapper_for(record_type: RecordType) -> Box<dyn FieldMapper> {
    match record_type {
        RecordType::Ppm => Box::new(PpmFieldMapper),
        RecordType::Ocm => Box::new(OcmFieldMapper),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::DraftDetail;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_ppm_mapper_export_columns() {
        let cells = row(&[
            ("NO", "7"),
            ("EQUIPMENT", "Ventilator"),
            ("SERIAL", "SN-1"),
            ("Installation_Date", "15/01/2024"),
            ("PPM_Q_II_engineer", "Ahmed"),
            ("PPM_Q_II_date", "15/04/2024"),
            ("Status", "Maintained"),
        ]);

        let draft = PpmFieldMapper.map_row(&cells);
        assert!(draft.pinned_status.is_none());
        let DraftDetail::Ppm(ppm) = draft.detail else {
            panic!("应为 PPM 草稿");
        };
        assert_eq!(ppm.base.equipment.as_deref(), Some("Ventilator"));
        assert_eq!(ppm.base.installation_date.as_deref(), Some("15/01/2024"));
        assert_eq!(ppm.checkpoints[1].engineer.as_deref(), Some("Ahmed"));
        assert_eq!(ppm.checkpoints[1].target_date.as_deref(), Some("15/04/2024"));
        assert!(ppm.checkpoints[0].engineer.is_none());
    }

    #[test]
    fn test_ppm_mapper_dotted_quarter_aliases() {
        let cells = row(&[
            ("SERIAL", "SN-1"),
            ("PPM_Q_I.engineer", "Sara"),
            ("PPM_Q_I.date", "2024-04-15"),
        ]);

        let draft = PpmFieldMapper.map_row(&cells);
        let DraftDetail::Ppm(ppm) = draft.detail else {
            panic!("应为 PPM 草稿");
        };
        assert_eq!(ppm.checkpoints[0].engineer.as_deref(), Some("Sara"));
        assert_eq!(ppm.checkpoints[0].target_date.as_deref(), Some("2024-04-15"));
    }

    #[test]
    fn test_ocm_mapper_aliases_and_na() {
        let cells = row(&[
            ("Serial Number", "OC-9"),
            ("Model", "X1"),
            ("Service Date", "01/02/2024"),
            ("Next Maintenance", "N/A"),
            ("Engineer", "Omar"),
        ]);

        let draft = mapper_for(RecordType::Ocm).map_row(&cells);
        assert_eq!(draft.serial(), Some("OC-9"));
        let DraftDetail::Ocm(ocm) = draft.detail else {
            panic!("应为 OCM 草稿");
        };
        assert_eq!(ocm.base.model.as_deref(), Some("X1"));
        assert_eq!(ocm.service_date.as_deref(), Some("01/02/2024"));
        assert!(ocm.next_maintenance.is_none());
        assert_eq!(ocm.engineer.as_deref(), Some("Omar"));
    }

    #[test]
    fn test_mapper_for_record_type() {
        assert_eq!(mapper_for(RecordType::Ppm).record_type(), RecordType::Ppm);
        assert_eq!(mapper_for(RecordType::Ocm).record_type(), RecordType::Ocm);
    }
}
