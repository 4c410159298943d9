// ==========================================
// 设备维护排程系统 - 排程配置模型
// ==========================================
// 红线: use_daily_send_time 与 use_legacy_interval 恰有一个为 true
// 未知键原样保留(extra)
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ===== 配置键 =====
pub const KEY_EMAIL_NOTIFICATIONS_ENABLED: &str = "email_notifications_enabled";
pub const KEY_RECIPIENT_EMAIL: &str = "recipient_email";
pub const KEY_CC_EMAILS: &str = "cc_emails";
pub const KEY_USE_DAILY_SEND_TIME: &str = "use_daily_send_time";
pub const KEY_USE_LEGACY_INTERVAL: &str = "use_legacy_interval";
pub const KEY_EMAIL_SEND_TIME: &str = "email_send_time";
pub const KEY_EMAIL_REMINDER_INTERVAL_MINUTES: &str = "email_reminder_interval_minutes";
pub const KEY_ENABLE_AUTOMATIC_REMINDERS: &str = "enable_automatic_reminders";
pub const KEY_SCHEDULER_INTERVAL_HOURS: &str = "scheduler_interval_hours";
pub const KEY_PUSH_NOTIFICATIONS_ENABLED: &str = "push_notifications_enabled";
pub const KEY_PUSH_NOTIFICATION_INTERVAL_MINUTES: &str = "push_notification_interval_minutes";
pub const KEY_REMINDER_TIMING: &str = "reminder_timing";
pub const KEY_ROLES: &str = "roles";

// reminder_timing 子键
pub const TIMING_60_DAYS: &str = "60_days_before";
pub const TIMING_14_DAYS: &str = "14_days_before";
pub const TIMING_1_DAY: &str = "1_day_before";

/// 布尔字段
pub const BOOL_FIELDS: &[&str] = &[
    KEY_EMAIL_NOTIFICATIONS_ENABLED,
    KEY_USE_DAILY_SEND_TIME,
    KEY_USE_LEGACY_INTERVAL,
    KEY_ENABLE_AUTOMATIC_REMINDERS,
    KEY_PUSH_NOTIFICATIONS_ENABLED,
];

/// 间隔字段(正整数)
pub const INTERVAL_FIELDS: &[&str] = &[
    KEY_EMAIL_REMINDER_INTERVAL_MINUTES,
    KEY_SCHEDULER_INTERVAL_HOURS,
    KEY_PUSH_NOTIFICATION_INTERVAL_MINUTES,
];

/// 字符串字段
pub const STRING_FIELDS: &[&str] = &[KEY_RECIPIENT_EMAIL, KEY_CC_EMAILS, KEY_EMAIL_SEND_TIME];

// ==========================================
// ReminderTiming - 60/14/1 天提醒开关
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTiming {
    #[serde(rename = "60_days_before", default = "default_true")]
    pub sixty_days_before: bool,
    #[serde(rename = "14_days_before", default = "default_true")]
    pub fourteen_days_before: bool,
    #[serde(rename = "1_day_before", default = "default_true")]
    pub one_day_before: bool,
}

impl Default for ReminderTiming {
    fn default() -> Self {
        Self {
            sixty_days_before: true,
            fourteen_days_before: true,
            one_day_before: true,
        }
    }
}

fn default_true() -> bool {
    true
}

// ==========================================
// Settings - 排程配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // ===== 邮件 =====
    pub email_notifications_enabled: bool,
    pub recipient_email: String,
    pub cc_emails: String, // 逗号分隔

    // ===== 发送方式(二选一) =====
    pub use_daily_send_time: bool,
    pub use_legacy_interval: bool,
    pub email_send_time: String, // HH:MM
    pub email_reminder_interval_minutes: i64,

    // ===== 调度 =====
    pub enable_automatic_reminders: bool,
    pub scheduler_interval_hours: i64,

    // ===== 推送 =====
    pub push_notifications_enabled: bool,
    pub push_notification_interval_minutes: i64,

    // ===== 提醒窗口 =====
    pub reminder_timing: ReminderTiming,

    // ===== 其他键(如 roles) =====
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            email_notifications_enabled: true,
            recipient_email: String::new(),
            cc_emails: String::new(),
            use_daily_send_time: true,
            use_legacy_interval: false,
            email_send_time: "07:00".to_string(),
            email_reminder_interval_minutes: 60,
            enable_automatic_reminders: true,
            scheduler_interval_hours: 24,
            push_notifications_enabled: false,
            push_notification_interval_minutes: 60,
            reminder_timing: ReminderTiming::default(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// 默认配置的 JSON 映射形态(作为合并基线)
    pub fn defaults_map() -> Map<String, Value> {
        match serde_json::to_value(Settings::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// 序列化为映射(持久化格式)
    pub fn to_map(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// 抄送列表(逗号分隔,去空白)
    pub fn cc_list(&self) -> Vec<String> {
        self.cc_emails
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let s = Settings::default();
        assert!(s.use_daily_send_time ^ s.use_legacy_interval);
        assert_eq!(s.email_reminder_interval_minutes, 60);
        assert_eq!(s.email_send_time, "07:00");
    }

    #[test]
    fn test_defaults_map_has_nested_timing() {
        let map = Settings::defaults_map();
        let timing = map.get(KEY_REMINDER_TIMING).and_then(|v| v.as_object()).unwrap();
        assert_eq!(timing.get(TIMING_60_DAYS), Some(&Value::Bool(true)));
        assert!(map.get("extra").is_none());
    }

    #[test]
    fn test_extra_keys_roundtrip() {
        let mut map = Settings::defaults_map();
        map.insert("custom_flag".to_string(), Value::String("x".to_string()));
        let s: Settings = serde_json::from_value(Value::Object(map)).unwrap();
        assert_eq!(s.extra.get("custom_flag"), Some(&Value::String("x".to_string())));
        assert!(s.to_map().unwrap().contains_key("custom_flag"));
    }

    #[test]
    fn test_cc_list_split() {
        let s = Settings {
            cc_emails: " a@x.org, ,b@x.org ".to_string(),
            ..Settings::default()
        };
        assert_eq!(s.cc_list(), vec!["a@x.org".to_string(), "b@x.org".to_string()]);
    }
}
