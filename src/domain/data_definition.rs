// ==========================================
// MES 视图引擎 - 数据模型定义
// ==========================================
// 职责: 视图可绑定的数据模型描述 + 按 (plugin, model) 查找的服务接口
// 说明: 模型本身由持久化层提供，这里只保留视图装配所需的最小信息
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// 数据模型定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDefinition {
    pub plugin_identifier: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl DataDefinition {
    pub fn new(plugin_identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            plugin_identifier: plugin_identifier.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

// ==========================================
// DataDefinitionService Trait
// ==========================================
pub trait DataDefinitionService: Send + Sync {
    /// 按 (插件标识, 模型名) 查找数据模型
    fn get(&self, plugin_identifier: &str, model_name: &str) -> Option<DataDefinition>;
}

/// 内存数据模型服务
#[derive(Debug, Default)]
pub struct InMemoryDataDefinitionService {
    definitions: RwLock<HashMap<(String, String), DataDefinition>>,
}

impl InMemoryDataDefinitionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, definition: DataDefinition) {
        let key = (definition.plugin_identifier.clone(), definition.name.clone());
        match self.definitions.write() {
            Ok(mut definitions) => {
                definitions.insert(key, definition);
            }
            Err(e) => tracing::error!("数据模型注册失败，锁获取失败: {}", e),
        }
    }
}

impl DataDefinitionService for InMemoryDataDefinitionService {
    fn get(&self, plugin_identifier: &str, model_name: &str) -> Option<DataDefinition> {
        let definitions = self.definitions.read().ok()?;
        definitions
            .get(&(plugin_identifier.to_string(), model_name.to_string()))
            .cloned()
    }
}
