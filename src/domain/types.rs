// ==========================================
// 设备维护排程系统 - 领域类型定义
// ==========================================
// 记录类型 / 维护状态 / 季度检查点 / 提醒窗口
// 序列化格式与导入导出列值保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 记录类型 (Record Type)
// ==========================================
// 二值判别: ppm = 计划性维护(四个季度检查点), ocm = 按需维护(单一下次维护日期)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Ppm,
    Ocm,
}

impl RecordType {
    /// 数据库/边界层使用的小写标识
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Ppm => "ppm",
            RecordType::Ocm => "ocm",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Ppm => write!(f, "PPM"),
            RecordType::Ocm => write!(f, "OCM"),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ppm" => Ok(RecordType::Ppm),
            "ocm" => Ok(RecordType::Ocm),
            other => Err(format!("未知的记录类型: {}", other)),
        }
    }
}

// ==========================================
// 维护状态 (Maintenance Status)
// ==========================================
// 状态始终由日期与检查点完成情况派生,不单独作为权威数据
// 严重程度: Overdue > Upcoming > Maintained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceStatus {
    Upcoming,   // 未到期(含提醒窗口内)
    Overdue,    // 已逾期
    Maintained, // 已完成维护
}

impl MaintenanceStatus {
    /// 严重程度排序值(越大越严重)
    pub fn severity(&self) -> u8 {
        match self {
            MaintenanceStatus::Maintained => 0,
            MaintenanceStatus::Upcoming => 1,
            MaintenanceStatus::Overdue => 2,
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceStatus::Upcoming => write!(f, "Upcoming"),
            MaintenanceStatus::Overdue => write!(f, "Overdue"),
            MaintenanceStatus::Maintained => write!(f, "Maintained"),
        }
    }
}

impl FromStr for MaintenanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(MaintenanceStatus::Upcoming),
            "overdue" => Ok(MaintenanceStatus::Overdue),
            "maintained" => Ok(MaintenanceStatus::Maintained),
            other => Err(format!("未知的维护状态: {}", other)),
        }
    }
}

// ==========================================
// 季度检查点 (Quarter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quarter {
    I,
    II,
    III,
    IV,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::I, Quarter::II, Quarter::III, Quarter::IV];

    /// 距安装日期的月份偏移
    pub fn month_offset(&self) -> u32 {
        match self {
            Quarter::I => 3,
            Quarter::II => 6,
            Quarter::III => 9,
            Quarter::IV => 12,
        }
    }

    /// 0 基下标
    pub fn index(&self) -> usize {
        match self {
            Quarter::I => 0,
            Quarter::II => 1,
            Quarter::III => 2,
            Quarter::IV => 3,
        }
    }

    pub fn roman(&self) -> &'static str {
        match self {
            Quarter::I => "I",
            Quarter::II => "II",
            Quarter::III => "III",
            Quarter::IV => "IV",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.roman())
    }
}

// ==========================================
// 提醒窗口 (Reminder Window)
// ==========================================
// 60/14/1 天三档,仍属于 Upcoming,不引入独立的 "Due" 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderWindow {
    OneDay,
    FourteenDays,
    SixtyDays,
}

impl ReminderWindow {
    /// 从紧到松
    pub const ALL: [ReminderWindow; 3] = [
        ReminderWindow::OneDay,
        ReminderWindow::FourteenDays,
        ReminderWindow::SixtyDays,
    ];

    pub fn days(&self) -> i64 {
        match self {
            ReminderWindow::OneDay => 1,
            ReminderWindow::FourteenDays => 14,
            ReminderWindow::SixtyDays => 60,
        }
    }
}

impl fmt::Display for ReminderWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderWindow::OneDay => write!(f, "1_DAY"),
            ReminderWindow::FourteenDays => write!(f, "14_DAYS"),
            ReminderWindow::SixtyDays => write!(f, "60_DAYS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_from_str() {
        assert_eq!("PPM".parse::<RecordType>().unwrap(), RecordType::Ppm);
        assert_eq!(" ocm ".parse::<RecordType>().unwrap(), RecordType::Ocm);
        assert!("xyz".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_status_severity_order() {
        assert!(MaintenanceStatus::Overdue.severity() > MaintenanceStatus::Upcoming.severity());
        assert!(MaintenanceStatus::Upcoming.severity() > MaintenanceStatus::Maintained.severity());
    }

    #[test]
    fn test_quarter_offsets() {
        let offsets: Vec<u32> = Quarter::ALL.iter().map(|q| q.month_offset()).collect();
        assert_eq!(offsets, vec![3, 6, 9, 12]);
    }
}
