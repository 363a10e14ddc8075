// ==========================================
// MES 视图引擎 - 钩子工厂
// ==========================================
// 职责: (bean, method) → 可调用引用 的显式注册表
// 约束: 启动期注册；解析期只读查找，未注册键直接失败
// ==========================================

use crate::domain::hook::{HookDefinition, HookFn};
use crate::view::error::{ViewParseError, ViewParseResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct HookFactory {
    hooks: HashMap<(String, String), HookFn>,
}

impl HookFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册钩子（同键重复注册以后者为准）
    pub fn register<F>(&mut self, bean: &str, method: &str, hook: F) -> &mut Self
    where
        F: Fn(&mut Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let key = (bean.to_string(), method.to_string());
        if self.hooks.insert(key, Arc::new(hook)).is_some() {
            tracing::warn!(bean, method, "钩子重复注册，已覆盖");
        }
        self
    }

    /// 查找钩子
    ///
    /// # 错误
    /// - 未注册 → UnregisteredHook
    pub fn get_hook(&self, bean: &str, method: &str) -> ViewParseResult<HookDefinition> {
        self.hooks
            .get(&(bean.to_string(), method.to_string()))
            .map(|hook| HookDefinition::new(bean, method, Arc::clone(hook)))
            .ok_or_else(|| ViewParseError::UnregisteredHook {
                bean: bean.to_string(),
                method: method.to_string(),
            })
    }

    pub fn contains(&self, bean: &str, method: &str) -> bool {
        self.hooks.contains_key(&(bean.to_string(), method.to_string()))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
