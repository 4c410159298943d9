// ==========================================
// 设备维护排程系统 - 角色权限表
// ==========================================
// 来源: 配置中的 roles 键 {"<Role>": {"permissions": [..]}}
// 生命周期: 显式 load / reload,由调用方持有并传递(无全局缓存)
// 角色名大小写不敏感
// ==========================================

use crate::config::error::{SettingsError, SettingsResult};
use crate::domain::settings::KEY_ROLES;
use crate::repository::settings_repo::SettingsRepository;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionTable {
    roles: HashMap<String, HashSet<String>>,
}

impl PermissionTable {
    /// 从配置存储加载
    pub fn load(repo: &dyn SettingsRepository) -> SettingsResult<Self> {
        let settings = repo.load_settings()?;
        let table = Self::from_settings_map(&settings)?;
        info!(roles = table.roles.len(), "权限表已加载");
        Ok(table)
    }

    /// 重新加载(替换当前内容)
    pub fn reload(&mut self, repo: &dyn SettingsRepository) -> SettingsResult<()> {
        *self = Self::load(repo)?;
        Ok(())
    }

    /// 从配置映射构建
    pub fn from_settings_map(settings: &Map<String, Value>) -> SettingsResult<Self> {
        let roles_value = match settings.get(KEY_ROLES) {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(v) => v,
        };

        let roles_obj = roles_value
            .as_object()
            .ok_or_else(|| Self::type_error(KEY_ROLES, "object"))?;

        let mut roles = HashMap::new();
        for (role, entry) in roles_obj {
            let field = format!("{}.{}.permissions", KEY_ROLES, role);
            let perms = match entry.get("permissions") {
                None | Some(Value::Null) => HashSet::new(),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| Self::type_error(&field, "string array"))
                    })
                    .collect::<SettingsResult<HashSet<_>>>()?,
                Some(_) => return Err(Self::type_error(&field, "string array")),
            };
            roles.insert(role.to_lowercase(), perms);
        }

        Ok(Self { roles })
    }

    /// 角色拥有的权限(未知角色为空集)
    pub fn permissions_for(&self, role: &str) -> HashSet<String> {
        self.roles
            .get(&role.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        self.roles
            .get(&role.to_lowercase())
            .map(|perms| perms.contains(permission))
            .unwrap_or(false)
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    fn type_error(field: &str, expected: &str) -> SettingsError {
        SettingsError::ConfigurationType {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }
}
