// ==========================================
// 设备维护排程系统 - 记录校验器
// ==========================================
// 职责: 草稿 → 类型化记录(创建/更新/导入共用同一套规则)
// 规则:
//   - 必填: EQUIPMENT / MODEL / SERIAL / MANUFACTURER / Department / LOG_Number
//   - 日期: DD/MM/YYYY 或 YYYY-MM-DD,空值/N/A 视为缺省
//   - PPM: 缺省的检查点日期由安装日期派生; 需要派生但安装日期缺失 → 校验失败
//   - OCM: ENGINEER 必填; Next_Maintenance 缺省时 = Service_Date + 12 个月,
//          两者皆缺 → 校验失败
// 输出: 记录状态已由 StatusEngine 派生
// ==========================================

use crate::domain::columns::{
    quarter_date_column, COL_DEPARTMENT, COL_ENGINEER, COL_EQUIPMENT, COL_INSTALLATION_DATE,
    COL_LOG_NUMBER, COL_MANUFACTURER, COL_MODEL, COL_NEXT_MAINTENANCE, COL_SERIAL,
    COL_SERVICE_DATE, COL_WARRANTY_END,
};
use crate::domain::dates::{normalize_text, parse_flexible_date};
use crate::domain::equipment::{
    BaseDraft, Checkpoint, DraftDetail, EquipmentBase, EquipmentDraft, EquipmentRecord, OcmDraft,
    OcmRecord, PpmDraft, PpmRecord,
};
use crate::domain::types::{MaintenanceStatus, Quarter};
use crate::engine::error::{EquipmentError, EquipmentResult};
use crate::engine::quarter_schedule::QuarterScheduler;
use crate::engine::status::StatusEngine;
use chrono::NaiveDate;

/// OCM 下次维护默认周期(月)
pub const OCM_DEFAULT_CYCLE_MONTHS: u32 = 12;

// ==========================================
// EquipmentValidator
// ==========================================
pub struct EquipmentValidator;

impl EquipmentValidator {
    /// 校验草稿并构建记录
    ///
    /// # 参数
    /// - draft: 原始输入
    /// - seq_no: 分配(创建)或保留(更新)的顺序号
    /// - today: 状态派生基准日
    ///
    /// # 返回
    /// - Ok(record): status 为派生值(不考虑 pinned_status)
    /// - Err(EquipmentError::Validation): 字段名 + 原因
    pub fn build(
        draft: &EquipmentDraft,
        seq_no: i64,
        today: NaiveDate,
    ) -> EquipmentResult<EquipmentRecord> {
        let mut record = match &draft.detail {
            DraftDetail::Ppm(ppm) => EquipmentRecord::Ppm(Self::build_ppm(ppm, seq_no)?),
            DraftDetail::Ocm(ocm) => EquipmentRecord::Ocm(Self::build_ocm(ocm, seq_no)?),
        };

        record.base_mut().status = StatusEngine::derive(&record, today);
        Ok(record)
    }

    fn build_ppm(draft: &PpmDraft, seq_no: i64) -> EquipmentResult<PpmRecord> {
        let base = Self::build_base(&draft.base, seq_no)?;

        let mut checkpoints = Vec::with_capacity(4);
        for quarter in Quarter::ALL {
            let cp_draft = &draft.checkpoints[quarter.index()];
            let column = quarter_date_column(quarter);

            let target_date = match Self::optional_date(cp_draft.target_date.as_deref(), column)? {
                Some(date) => date,
                None => Self::derive_checkpoint_date(base.installation_date, quarter)?,
            };

            checkpoints.push(Checkpoint {
                quarter,
                engineer: normalize_text(cp_draft.engineer.as_deref()),
                target_date,
            });
        }

        let checkpoints: [Checkpoint; 4] = checkpoints
            .try_into()
            .map_err(|_| EquipmentError::validation("checkpoints", "检查点数量必须为 4"))?;

        Ok(PpmRecord { base, checkpoints })
    }

    fn derive_checkpoint_date(
        installation_date: Option<NaiveDate>,
        quarter: Quarter,
    ) -> EquipmentResult<NaiveDate> {
        let install = installation_date.ok_or_else(|| {
            EquipmentError::validation(
                COL_INSTALLATION_DATE,
                format!("缺少安装日期，无法派生 {} 检查点日期", quarter),
            )
        })?;

        QuarterScheduler::target_date(install, quarter).ok_or_else(|| {
            EquipmentError::validation(COL_INSTALLATION_DATE, "安装日期超出可计算范围")
        })
    }

    fn build_ocm(draft: &OcmDraft, seq_no: i64) -> EquipmentResult<OcmRecord> {
        let base = Self::build_base(&draft.base, seq_no)?;
        let engineer = Self::required_text(draft.engineer.as_deref(), COL_ENGINEER)?;
        let service_date = Self::optional_date(draft.service_date.as_deref(), COL_SERVICE_DATE)?;

        let next_maintenance =
            match Self::optional_date(draft.next_maintenance.as_deref(), COL_NEXT_MAINTENANCE)? {
                Some(date) => date,
                None => {
                    let service = service_date.ok_or_else(|| {
                        EquipmentError::validation(
                            COL_NEXT_MAINTENANCE,
                            "必填字段为空(且缺少 Service_Date 无法推算)",
                        )
                    })?;
                    QuarterScheduler::add_months(service, OCM_DEFAULT_CYCLE_MONTHS).ok_or_else(
                        || EquipmentError::validation(COL_SERVICE_DATE, "服务日期超出可计算范围"),
                    )?
                }
            };

        Ok(OcmRecord {
            base,
            service_date,
            next_maintenance,
            engineer,
            linked_ppm: normalize_text(draft.linked_ppm.as_deref()),
        })
    }

    fn build_base(draft: &BaseDraft, seq_no: i64) -> EquipmentResult<EquipmentBase> {
        Ok(EquipmentBase {
            seq_no,
            serial: Self::required_text(draft.serial.as_deref(), COL_SERIAL)?,
            equipment: Self::required_text(draft.equipment.as_deref(), COL_EQUIPMENT)?,
            name: normalize_text(draft.name.as_deref()),
            model: Self::required_text(draft.model.as_deref(), COL_MODEL)?,
            manufacturer: Self::required_text(draft.manufacturer.as_deref(), COL_MANUFACTURER)?,
            department: Self::required_text(draft.department.as_deref(), COL_DEPARTMENT)?,
            log_number: Self::required_text(draft.log_number.as_deref(), COL_LOG_NUMBER)?,
            installation_date: Self::optional_date(
                draft.installation_date.as_deref(),
                COL_INSTALLATION_DATE,
            )?,
            warranty_end: Self::optional_date(draft.warranty_end.as_deref(), COL_WARRANTY_END)?,
            // 占位,由 build() 统一派生
            status: MaintenanceStatus::Upcoming,
        })
    }

    fn required_text(value: Option<&str>, field: &str) -> EquipmentResult<String> {
        normalize_text(value).ok_or_else(|| EquipmentError::validation(field, "必填字段为空"))
    }

    fn optional_date(value: Option<&str>, field: &str) -> EquipmentResult<Option<NaiveDate>> {
        match value {
            None => Ok(None),
            Some(raw) => {
                parse_flexible_date(raw).map_err(|msg| EquipmentError::validation(field, msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::CheckpointDraft;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn base_draft(serial: &str) -> BaseDraft {
        BaseDraft {
            equipment: Some("Infusion Pump".to_string()),
            name: None,
            model: Some("P-100".to_string()),
            serial: Some(serial.to_string()),
            manufacturer: Some("Baxter".to_string()),
            department: Some("ER".to_string()),
            log_number: Some("LOG-7".to_string()),
            installation_date: Some("01/01/2024".to_string()),
            warranty_end: Some("N/A".to_string()),
        }
    }

    fn field_of(err: EquipmentError) -> String {
        match err {
            EquipmentError::Validation { field, .. } => field,
            other => panic!("期望校验错误，实际: {:?}", other),
        }
    }

    #[test]
    fn test_ppm_dates_derived_from_installation() {
        let draft = EquipmentDraft::ppm(PpmDraft {
            base: base_draft("SN-1"),
            checkpoints: Default::default(),
        });

        let record = EquipmentValidator::build(&draft, 1, d(2024, 2, 1)).unwrap();
        let ppm = record.as_ppm().unwrap();
        assert_eq!(ppm.checkpoint(Quarter::I).target_date, d(2024, 4, 1));
        assert_eq!(ppm.checkpoint(Quarter::IV).target_date, d(2025, 1, 1));
        assert_eq!(ppm.base.warranty_end, None);
        assert_eq!(ppm.base.status, MaintenanceStatus::Upcoming);
    }

    #[test]
    fn test_ppm_explicit_checkpoint_date_overrides() {
        let mut checkpoints: [CheckpointDraft; 4] = Default::default();
        checkpoints[1].target_date = Some("2024-08-15".to_string());
        checkpoints[1].engineer = Some(" Sara ".to_string());

        let draft = EquipmentDraft::ppm(PpmDraft {
            base: base_draft("SN-2"),
            checkpoints,
        });
        let record = EquipmentValidator::build(&draft, 1, d(2024, 2, 1)).unwrap();
        let cp = record.as_ppm().unwrap().checkpoint(Quarter::II).clone();
        assert_eq!(cp.target_date, d(2024, 8, 15));
        assert_eq!(cp.engineer.as_deref(), Some("Sara"));
    }

    #[test]
    fn test_ppm_missing_installation_date_fails() {
        let mut base = base_draft("SN-3");
        base.installation_date = None;
        let draft = EquipmentDraft::ppm(PpmDraft {
            base,
            checkpoints: Default::default(),
        });

        let err = EquipmentValidator::build(&draft, 1, d(2024, 2, 1)).unwrap_err();
        assert_eq!(field_of(err), COL_INSTALLATION_DATE);
    }

    #[test]
    fn test_ppm_all_dates_supplied_without_installation() {
        let mut base = base_draft("SN-4");
        base.installation_date = None;
        let checkpoints = ["01/03/2024", "01/06/2024", "01/09/2024", "01/12/2024"].map(|s| {
            CheckpointDraft {
                engineer: None,
                target_date: Some(s.to_string()),
            }
        });
        let draft = EquipmentDraft::ppm(PpmDraft { base, checkpoints });

        let record = EquipmentValidator::build(&draft, 1, d(2024, 2, 1)).unwrap();
        assert_eq!(record.as_ppm().unwrap().checkpoint(Quarter::IV).target_date, d(2024, 12, 1));
    }

    #[test]
    fn test_missing_serial_names_field() {
        let mut base = base_draft("");
        base.serial = Some("  ".to_string());
        let draft = EquipmentDraft::ppm(PpmDraft {
            base,
            checkpoints: Default::default(),
        });

        let err = EquipmentValidator::build(&draft, 1, d(2024, 2, 1)).unwrap_err();
        assert_eq!(field_of(err), COL_SERIAL);
    }

    #[test]
    fn test_invalid_date_names_field() {
        let mut base = base_draft("SN-5");
        base.warranty_end = Some("2024/13/01".to_string());
        let draft = EquipmentDraft::ppm(PpmDraft {
            base,
            checkpoints: Default::default(),
        });

        let err = EquipmentValidator::build(&draft, 1, d(2024, 2, 1)).unwrap_err();
        assert_eq!(field_of(err), COL_WARRANTY_END);
    }

    #[test]
    fn test_ocm_next_maintenance_defaults_to_one_year() {
        let draft = EquipmentDraft::ocm(OcmDraft {
            base: base_draft("OC-1"),
            service_date: Some("15/03/2024".to_string()),
            next_maintenance: None,
            engineer: Some("Omar".to_string()),
            linked_ppm: Some("N/A".to_string()),
        });

        let record = EquipmentValidator::build(&draft, 3, d(2024, 4, 1)).unwrap();
        let ocm = record.as_ocm().unwrap();
        assert_eq!(ocm.next_maintenance, d(2025, 3, 15));
        assert_eq!(ocm.linked_ppm, None);
        assert_eq!(ocm.base.seq_no, 3);
    }

    #[test]
    fn test_ocm_requires_engineer_and_due_date() {
        let no_engineer = EquipmentDraft::ocm(OcmDraft {
            base: base_draft("OC-2"),
            service_date: None,
            next_maintenance: Some("01/01/2025".to_string()),
            engineer: None,
            linked_ppm: None,
        });
        let err = EquipmentValidator::build(&no_engineer, 1, d(2024, 4, 1)).unwrap_err();
        assert_eq!(field_of(err), COL_ENGINEER);

        let no_dates = EquipmentDraft::ocm(OcmDraft {
            base: base_draft("OC-3"),
            service_date: None,
            next_maintenance: None,
            engineer: Some("Omar".to_string()),
            linked_ppm: None,
        });
        let err = EquipmentValidator::build(&no_dates, 1, d(2024, 4, 1)).unwrap_err();
        assert_eq!(field_of(err), COL_NEXT_MAINTENANCE);
    }
}
