// ==========================================
// 设备维护排程系统 - 季度排程生成器
// ==========================================
// 职责: 由安装日期派生 PPM 四个检查点目标日期
// 规则: 相对安装日期直接偏移 +3/+6/+9/+12 个月(不链式累加)
// 月末: 目标月份不存在该日时取当月最后一天
//       例: 01-31 + 3 个月 = 04-30; 11-30 + 3 个月 = 02-28/29
// ==========================================

use crate::domain::types::Quarter;
use chrono::{Months, NaiveDate};

// ==========================================
// QuarterScheduler
// ==========================================
pub struct QuarterScheduler;

impl QuarterScheduler {
    /// 单个检查点目标日期
    ///
    /// # 返回
    /// - None: 日期溢出(超出 chrono 可表示范围)
    pub fn target_date(installation_date: NaiveDate, quarter: Quarter) -> Option<NaiveDate> {
        installation_date.checked_add_months(Months::new(quarter.month_offset()))
    }

    /// 四个检查点目标日期(I..IV)
    pub fn schedule(installation_date: NaiveDate) -> Option<[NaiveDate; 4]> {
        Some([
            Self::target_date(installation_date, Quarter::I)?,
            Self::target_date(installation_date, Quarter::II)?,
            Self::target_date(installation_date, Quarter::III)?,
            Self::target_date(installation_date, Quarter::IV)?,
        ])
    }

    /// 在给定日期上加 N 个月(OCM 下次维护默认值使用)
    pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
        date.checked_add_months(Months::new(months))
    }
}
