// ==========================================
// 设备维护排程系统 - 排程配置管理器
// ==========================================
// 职责: 配置加载(默认值 + 已持久化值)、部分更新、保存
// 存储: SettingsRepository (config_kv 表)
// 红线: 先校验合并结果,校验通过后才调用一次 save_settings
// ==========================================

use crate::config::error::SettingsResult;
use crate::config::settings_validator::SettingsValidator;
use crate::domain::settings::Settings;
use crate::repository::settings_repo::SettingsRepository;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// SettingsManager
// ==========================================
pub struct SettingsManager<S>
where
    S: SettingsRepository,
{
    repo: Arc<S>,
}

impl<S> SettingsManager<S>
where
    S: SettingsRepository,
{
    pub fn new(repo: Arc<S>) -> Self {
        Self { repo }
    }

    /// 当前生效配置的映射形态(默认值叠加已持久化值)
    pub fn current_map(&self) -> SettingsResult<Map<String, Value>> {
        let stored = self.repo.load_settings()?;
        Ok(SettingsValidator::merge(&Settings::defaults_map(), &stored))
    }

    /// 读取当前生效配置
    pub fn load(&self) -> SettingsResult<Settings> {
        Ok(serde_json::from_value(Value::Object(self.current_map()?))?)
    }

    /// 部分更新配置
    ///
    /// # 参数
    /// - patch: 部分更新(只覆盖出现的键)
    ///
    /// # 返回
    /// - Ok(Settings): 合并并校验通过、已持久化的完整配置
    /// - Err(Configuration*): 校验失败,已持久化配置保持不变
    pub fn update(&self, patch: &Map<String, Value>) -> SettingsResult<Settings> {
        let current = self.current_map()?;

        let settings = match SettingsValidator::merge_and_validate(&current, patch) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, keys = ?patch.keys().collect::<Vec<_>>(), "配置更新被拒绝");
                return Err(e);
            }
        };

        self.repo.save_settings(&settings.to_map()?)?;
        info!(keys = patch.len(), "配置已更新");
        Ok(settings)
    }
}
