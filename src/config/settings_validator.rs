// ==========================================
// 设备维护排程系统 - 配置校验器
// ==========================================
// 流程: 当前配置 + 部分更新 → 合并 → 校验合并结果 → Settings
// 规则(按顺序):
//   1. 布尔字段必须为 JSON 布尔 → 否则 ConfigurationType
//   2. 字符串字段必须为 JSON 字符串 → 否则 ConfigurationType
//   3. roles 必须为 {"<Role>": {"permissions": [字符串..]}} → 否则 ConfigurationType
//   4. 间隔字段必须为整数 → 否则 ConfigurationType; <= 0 → ConfigurationRange
//   5. email_send_time 必须为 HH:MM → 否则 ConfigurationRange
//   6. use_daily_send_time 与 use_legacy_interval 恰有一个为 true → 否则 ConfigurationConflict
// 合并: 只覆盖补丁中出现的键; reminder_timing 按子键合并;
//       兼容平铺键 reminder_timing_60_days / _14_days / _1_day
// ==========================================

use crate::config::error::{SettingsError, SettingsResult};
use crate::config::permissions::PermissionTable;
use crate::domain::settings::{
    Settings, BOOL_FIELDS, INTERVAL_FIELDS, KEY_EMAIL_SEND_TIME, KEY_REMINDER_TIMING,
    KEY_USE_DAILY_SEND_TIME, KEY_USE_LEGACY_INTERVAL, STRING_FIELDS, TIMING_14_DAYS,
    TIMING_1_DAY, TIMING_60_DAYS,
};
use chrono::NaiveTime;
use serde_json::{Map, Value};

/// 平铺的提醒窗口键 → reminder_timing 子键
const FLAT_TIMING_KEYS: &[(&str, &str)] = &[
    ("reminder_timing_60_days", TIMING_60_DAYS),
    ("reminder_timing_14_days", TIMING_14_DAYS),
    ("reminder_timing_1_day", TIMING_1_DAY),
];

const TIMING_SUBKEYS: &[&str] = &[TIMING_60_DAYS, TIMING_14_DAYS, TIMING_1_DAY];

// ==========================================
// SettingsValidator
// ==========================================
pub struct SettingsValidator;

impl SettingsValidator {
    /// 合并 + 校验(纯函数,不做持久化)
    ///
    /// # 参数
    /// - current: 当前已生效配置(默认值 + 已持久化值)
    /// - patch: 部分更新
    ///
    /// # 返回
    /// - Ok(Settings): 完整合并后的配置,未出现在补丁中的键保持不变
    pub fn merge_and_validate(
        current: &Map<String, Value>,
        patch: &Map<String, Value>,
    ) -> SettingsResult<Settings> {
        let merged = Self::merge(current, patch);
        Self::validate(&merged)?;
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// 合并部分更新
    pub fn merge(current: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = current.clone();
        let mut timing_patch = Map::new();

        for (key, value) in patch {
            if let Some((_, subkey)) = FLAT_TIMING_KEYS.iter().find(|(flat, _)| *flat == key.as_str()) {
                timing_patch.insert(subkey.to_string(), value.clone());
                continue;
            }

            match (key.as_str(), value) {
                (KEY_REMINDER_TIMING, Value::Object(sub)) => {
                    timing_patch.extend(sub.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                _ => {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        if !timing_patch.is_empty() {
            let mut timing = match merged.remove(KEY_REMINDER_TIMING) {
                Some(Value::Object(existing)) => existing,
                _ => Map::new(),
            };
            timing.extend(timing_patch);
            merged.insert(KEY_REMINDER_TIMING.to_string(), Value::Object(timing));
        }

        merged
    }

    /// 校验合并后的完整配置
    pub fn validate(merged: &Map<String, Value>) -> SettingsResult<()> {
        // ===== 1. 布尔字段 =====
        for field in BOOL_FIELDS {
            if let Some(value) = merged.get(*field) {
                if !value.is_boolean() {
                    return Err(Self::type_error(field, "boolean"));
                }
            }
        }
        if let Some(timing) = merged.get(KEY_REMINDER_TIMING) {
            let timing = timing
                .as_object()
                .ok_or_else(|| Self::type_error(KEY_REMINDER_TIMING, "object"))?;
            for subkey in TIMING_SUBKEYS {
                if let Some(value) = timing.get(*subkey) {
                    if !value.is_boolean() {
                        return Err(Self::type_error(
                            &format!("{}.{}", KEY_REMINDER_TIMING, subkey),
                            "boolean",
                        ));
                    }
                }
            }
        }

        // ===== 2. 字符串字段 =====
        for field in STRING_FIELDS {
            if let Some(value) = merged.get(*field) {
                if !value.is_string() {
                    return Err(Self::type_error(field, "string"));
                }
            }
        }

        // ===== 3. 角色权限表结构 =====
        PermissionTable::from_settings_map(merged)?;

        // ===== 4. 间隔字段 =====
        for field in INTERVAL_FIELDS {
            if let Some(value) = merged.get(*field) {
                let n = value
                    .as_i64()
                    .ok_or_else(|| Self::type_error(field, "integer"))?;
                if n <= 0 {
                    return Err(SettingsError::ConfigurationRange {
                        field: field.to_string(),
                        message: format!("必须为正整数，实际 {}", n),
                    });
                }
            }
        }

        // ===== 5. 每日发送时间 =====
        if let Some(raw) = merged.get(KEY_EMAIL_SEND_TIME).and_then(Value::as_str) {
            if NaiveTime::parse_from_str(raw.trim(), "%H:%M").is_err() {
                return Err(SettingsError::ConfigurationRange {
                    field: KEY_EMAIL_SEND_TIME.to_string(),
                    message: format!("期望 HH:MM，实际 '{}'", raw),
                });
            }
        }

        // ===== 6. 发送方式互斥 =====
        let daily = Self::flag(merged, KEY_USE_DAILY_SEND_TIME);
        let legacy = Self::flag(merged, KEY_USE_LEGACY_INTERVAL);
        if daily == legacy {
            return Err(SettingsError::ConfigurationConflict {
                message: format!(
                    "{} 与 {} 必须恰有一个为 true（当前 {} / {}）",
                    KEY_USE_DAILY_SEND_TIME, KEY_USE_LEGACY_INTERVAL, daily, legacy
                ),
            });
        }

        Ok(())
    }

    fn flag(map: &Map<String, Value>, key: &str) -> bool {
        map.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    fn type_error(field: &str, expected: &str) -> SettingsError {
        SettingsError::ConfigurationType {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }
}
