// ==========================================
// MES 视图引擎 - 钩子定义
// ==========================================
// 职责: (bean, method) 标识 + 已解析的可调用引用
// 说明: 钩子在启动期注册到 HookFactory，解析时按键查找（不使用反射）
// ==========================================

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 钩子可调用对象
///
/// 参数为视图运行期状态（JSON），钩子可读写
pub type HookFn = Arc<dyn Fn(&mut Value) -> anyhow::Result<()> + Send + Sync>;

/// 钩子定义
#[derive(Clone, Serialize)]
pub struct HookDefinition {
    bean: String,
    method: String,
    #[serde(skip)]
    callable: HookFn,
}

impl HookDefinition {
    pub fn new(bean: impl Into<String>, method: impl Into<String>, callable: HookFn) -> Self {
        Self {
            bean: bean.into(),
            method: method.into(),
            callable,
        }
    }

    pub fn bean(&self) -> &str {
        &self.bean
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn callable(&self) -> &HookFn {
        &self.callable
    }

    /// 调用钩子
    pub fn call(&self, state: &mut Value) -> anyhow::Result<()> {
        (self.callable)(state)
            .with_context(|| format!("钩子执行失败: {}#{}", self.bean, self.method))
    }
}

impl fmt::Debug for HookDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDefinition")
            .field("bean", &self.bean)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// 组件自定义事件
///
/// 来自组件内 <listener event=".." bean=".." method=".."/>
#[derive(Debug, Clone, Serialize)]
pub struct ComponentCustomEvent {
    event: Option<String>,
    hook: HookDefinition,
}

impl ComponentCustomEvent {
    pub fn new(event: Option<String>, hook: HookDefinition) -> Self {
        Self { event, hook }
    }

    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    pub fn bean(&self) -> &str {
        self.hook.bean()
    }

    pub fn method(&self) -> &str {
        self.hook.method()
    }

    pub fn hook(&self) -> &HookDefinition {
        &self.hook
    }
}
