// ==========================================
// 设备维护排程系统 - 日期解析与格式化
// ==========================================
// 输入: DD/MM/YYYY(首选) 或 YYYY-MM-DD
// 空值: "" / "N/A"(大小写不敏感) 视为缺省
// 输出: DD/MM/YYYY
// ==========================================

use chrono::NaiveDate;

/// 展示/导出日期格式
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// 兼容的 ISO 日期格式
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// 导出时空值占位
pub const EMPTY_PLACEHOLDER: &str = "N/A";

/// 判断原始值是否为空(空串或 N/A)
pub fn is_blank(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(EMPTY_PLACEHOLDER)
}

/// 规范化可选文本: 去空白,空值返回 None
pub fn normalize_text(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !is_blank(s)).map(|s| s.trim().to_string())
}

/// 解析日期
///
/// # 返回
/// - Ok(None): 空值
/// - Ok(Some(date)): 解析成功
/// - Err(msg): 无法识别的日期格式
pub fn parse_flexible_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    if is_blank(raw) {
        return Ok(None);
    }

    let trimmed = raw.trim();
    for fmt in [DISPLAY_DATE_FORMAT, ISO_DATE_FORMAT] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(Some(date));
        }
    }

    Err(format!("无法解析日期 '{}'，期望 DD/MM/YYYY 或 YYYY-MM-DD", trimmed))
}

/// 格式化日期为 DD/MM/YYYY
pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// 格式化可选日期,缺省输出 N/A
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date)
        .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string())
}
