// ==========================================
// MES 视图引擎 - 领域基础类型
// ==========================================
// 职责: 组件句柄、视图标识、组件选项
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// 组件句柄 (Component Handle)
// ==========================================
// 组件树采用 arena 存储，子组件以句柄回指父组件（不持有所有权）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub usize);

impl ComponentId {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ==========================================
// 视图标识 (View Key)
// ==========================================
// 视图名在所属插件内唯一
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewKey {
    pub plugin_identifier: String,
    pub view_name: String,
}

impl ViewKey {
    pub fn new(plugin_identifier: impl Into<String>, view_name: impl Into<String>) -> Self {
        Self {
            plugin_identifier: plugin_identifier.into(),
            view_name: view_name.into(),
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.plugin_identifier, self.view_name)
    }
}

// ==========================================
// 组件选项 (Component Option)
// ==========================================
// 来自 <option> 节点：type 为类型标识，attributes 为该节点全部属性（含 type）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentOption {
    pub option_type: Option<String>,
    pub attributes: HashMap<String, String>,
}

impl ComponentOption {
    pub fn new(option_type: Option<String>, attributes: HashMap<String, String>) -> Self {
        Self {
            option_type,
            attributes,
        }
    }

    pub fn option_type(&self) -> Option<&str> {
        self.option_type.as_deref()
    }

    pub fn is_type(&self, option_type: &str) -> bool {
        self.option_type() == Some(option_type)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// 读取 value 属性（单值选项的惯用写法）
    pub fn value(&self) -> Option<&str> {
        self.get("value")
    }
}
