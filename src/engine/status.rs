// ==========================================
// 设备维护排程系统 - 状态引擎
// ==========================================
// 职责: 由日期与检查点完成情况派生记录状态
// 输出: Upcoming / Overdue / Maintained
// 红线: 状态只是日期的函数,不读取记录上已存储的状态
// ==========================================
// PPM 检查点:
//   已记录工程师 → Maintained
//   未记录且目标日期 < today → Overdue
//   其余 → Upcoming(提醒窗口内仍为 Upcoming)
// PPM 整体: 取四个检查点中最严重的状态
// OCM:
//   service_date >= next_maintenance → Maintained
//   next_maintenance < today → Overdue
//   其余 → Upcoming
// ==========================================

use crate::domain::equipment::{Checkpoint, EquipmentRecord, OcmRecord, PpmRecord};
use crate::domain::settings::ReminderTiming;
use crate::domain::types::{MaintenanceStatus, ReminderWindow};
use chrono::NaiveDate;

// ==========================================
// StatusEngine
// ==========================================
pub struct StatusEngine;

impl StatusEngine {
    /// 派生记录状态(主入口)
    ///
    /// # 参数
    /// - record: 设备记录(其 status 字段被忽略)
    /// - today: 当前日期
    pub fn derive(record: &EquipmentRecord, today: NaiveDate) -> MaintenanceStatus {
        match record {
            EquipmentRecord::Ppm(ppm) => Self::ppm_status(ppm, today),
            EquipmentRecord::Ocm(ocm) => Self::ocm_status(ocm, today),
        }
    }

    /// 单个检查点状态
    pub fn checkpoint_status(checkpoint: &Checkpoint, today: NaiveDate) -> MaintenanceStatus {
        if checkpoint.is_satisfied() {
            MaintenanceStatus::Maintained
        } else if checkpoint.target_date < today {
            MaintenanceStatus::Overdue
        } else {
            MaintenanceStatus::Upcoming
        }
    }

    /// PPM 整体状态: Overdue > Upcoming > Maintained
    pub fn ppm_status(record: &PpmRecord, today: NaiveDate) -> MaintenanceStatus {
        record
            .checkpoints
            .iter()
            .map(|cp| Self::checkpoint_status(cp, today))
            .max_by_key(|s| s.severity())
            .unwrap_or(MaintenanceStatus::Upcoming)
    }

    /// OCM 状态
    pub fn ocm_status(record: &OcmRecord, today: NaiveDate) -> MaintenanceStatus {
        if let Some(service_date) = record.service_date {
            if service_date >= record.next_maintenance {
                return MaintenanceStatus::Maintained;
            }
        }

        if record.next_maintenance < today {
            MaintenanceStatus::Overdue
        } else {
            MaintenanceStatus::Upcoming
        }
    }

    /// 距到期天数(负数表示已逾期)
    pub fn days_until(due_date: NaiveDate, today: NaiveDate) -> i64 {
        (due_date - today).num_days()
    }

    /// 判定提醒窗口
    ///
    /// # 返回
    /// - Some(window): 落入的最紧的已启用窗口
    /// - None: 已逾期,或未落入任何已启用窗口
    pub fn reminder_window(days_until: i64, timing: &ReminderTiming) -> Option<ReminderWindow> {
        if days_until < 0 {
            return None;
        }

        ReminderWindow::ALL
            .iter()
            .copied()
            .filter(|w| Self::window_enabled(*w, timing))
            .find(|w| days_until <= w.days())
    }

    fn window_enabled(window: ReminderWindow, timing: &ReminderTiming) -> bool {
        match window {
            ReminderWindow::OneDay => timing.one_day_before,
            ReminderWindow::FourteenDays => timing.fourteen_days_before,
            ReminderWindow::SixtyDays => timing.sixty_days_before,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::EquipmentBase;
    use crate::domain::types::Quarter;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn base() -> EquipmentBase {
        EquipmentBase {
            seq_no: 1,
            serial: "SN-1".to_string(),
            equipment: "Ventilator".to_string(),
            name: None,
            model: "V60".to_string(),
            manufacturer: "Philips".to_string(),
            department: "ICU".to_string(),
            log_number: "L-1".to_string(),
            installation_date: Some(d(2024, 1, 1)),
            warranty_end: None,
            // 故意写入错误状态,验证引擎不读取它
            status: MaintenanceStatus::Maintained,
        }
    }

    fn ppm(engineers: [Option<&str>; 4], dates: [NaiveDate; 4]) -> PpmRecord {
        let checkpoints = [0usize, 1, 2, 3].map(|i| Checkpoint {
            quarter: Quarter::ALL[i],
            engineer: engineers[i].map(str::to_string),
            target_date: dates[i],
        });
        PpmRecord {
            base: base(),
            checkpoints,
        }
    }

    fn ocm(service: Option<NaiveDate>, next: NaiveDate) -> OcmRecord {
        OcmRecord {
            base: base(),
            service_date: service,
            next_maintenance: next,
            engineer: "Omar".to_string(),
            linked_ppm: None,
        }
    }

    const DATES: [(i32, u32, u32); 4] = [(2024, 4, 1), (2024, 7, 1), (2024, 10, 1), (2025, 1, 1)];

    fn dates() -> [NaiveDate; 4] {
        DATES.map(|(y, m, day)| d(y, m, day))
    }

    #[test]
    fn test_ppm_past_unserviced_checkpoint_is_overdue() {
        let record = ppm([Some("A"), None, None, None], dates());
        assert_eq!(StatusEngine::ppm_status(&record, d(2024, 8, 1)), MaintenanceStatus::Overdue);
    }

    #[test]
    fn test_ppm_future_only_is_upcoming() {
        let record = ppm([Some("A"), Some("B"), None, None], dates());
        assert_eq!(StatusEngine::ppm_status(&record, d(2024, 8, 1)), MaintenanceStatus::Upcoming);
    }

    #[test]
    fn test_ppm_all_satisfied_is_maintained() {
        let record = ppm([Some("A"), Some("B"), Some("C"), Some("D")], dates());
        assert_eq!(StatusEngine::ppm_status(&record, d(2026, 1, 1)), MaintenanceStatus::Maintained);
    }

    #[test]
    fn test_ppm_due_today_is_upcoming() {
        let record = ppm([None, None, None, None], dates());
        assert_eq!(StatusEngine::ppm_status(&record, d(2024, 4, 1)), MaintenanceStatus::Upcoming);
        assert_eq!(StatusEngine::ppm_status(&record, d(2024, 4, 2)), MaintenanceStatus::Overdue);
    }

    #[test]
    fn test_ocm_status_transitions() {
        let next = d(2024, 6, 1);
        assert_eq!(StatusEngine::ocm_status(&ocm(None, next), d(2024, 5, 1)), MaintenanceStatus::Upcoming);
        assert_eq!(StatusEngine::ocm_status(&ocm(None, next), d(2024, 6, 2)), MaintenanceStatus::Overdue);
        assert_eq!(
            StatusEngine::ocm_status(&ocm(Some(d(2024, 6, 1)), next), d(2024, 7, 1)),
            MaintenanceStatus::Maintained
        );
        // 早于到期日的服务日期不代表本周期已完成
        assert_eq!(
            StatusEngine::ocm_status(&ocm(Some(d(2023, 6, 1)), next), d(2024, 7, 1)),
            MaintenanceStatus::Overdue
        );
    }

    #[test]
    fn test_derive_ignores_stored_status() {
        let record = EquipmentRecord::Ocm(ocm(None, d(2024, 6, 1)));
        assert_eq!(record.status(), MaintenanceStatus::Maintained);
        assert_eq!(StatusEngine::derive(&record, d(2024, 7, 1)), MaintenanceStatus::Overdue);
    }

    #[test]
    fn test_reminder_window_picks_tightest_enabled() {
        let all = ReminderTiming::default();
        assert_eq!(StatusEngine::reminder_window(0, &all), Some(ReminderWindow::OneDay));
        assert_eq!(StatusEngine::reminder_window(10, &all), Some(ReminderWindow::FourteenDays));
        assert_eq!(StatusEngine::reminder_window(60, &all), Some(ReminderWindow::SixtyDays));
        assert_eq!(StatusEngine::reminder_window(61, &all), None);
        assert_eq!(StatusEngine::reminder_window(-1, &all), None);

        let no_short = ReminderTiming {
            one_day_before: false,
            fourteen_days_before: false,
            sixty_days_before: true,
        };
        assert_eq!(StatusEngine::reminder_window(1, &no_short), Some(ReminderWindow::SixtyDays));
    }
}
