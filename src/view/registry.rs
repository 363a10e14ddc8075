// ==========================================
// MES 视图引擎 - 视图注册表
// ==========================================
// 职责: 已装配视图的注册（内存）与持久化（SQLite，可选）
// 约束: 按文档整体提交——先持久化整批视图，成功后再写入内存注册表
// ==========================================

use crate::domain::types::ViewKey;
use crate::domain::view::ViewDefinition;
use crate::repository::ViewDefinitionRepository;
use crate::view::error::{ViewParseError, ViewParseResult};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

// ==========================================
// ViewDefinitionService Trait
// ==========================================
pub trait ViewDefinitionService: Send + Sync {
    /// 注册一个文档解析出的全部视图（整体成功或整体失败）
    fn register_all(&self, views: Vec<ViewDefinition>, load_batch_id: &str) -> ViewParseResult<Vec<ViewKey>>;

    fn get(&self, plugin_identifier: &str, view_name: &str) -> Option<Arc<ViewDefinition>>;

    /// 全部视图（按插件、视图名排序）
    fn list(&self) -> Vec<Arc<ViewDefinition>>;

    /// 可从菜单访问的视图
    fn list_menu_accessible(&self) -> Vec<Arc<ViewDefinition>> {
        self.list()
            .into_iter()
            .filter(|view| view.is_menu_accessible())
            .collect()
    }
}

/// 默认视图注册表：内存索引 + 可选 SQLite 持久化
pub struct DefaultViewDefinitionService {
    views: RwLock<BTreeMap<ViewKey, Arc<ViewDefinition>>>,
    repository: Option<ViewDefinitionRepository>,
}

impl DefaultViewDefinitionService {
    /// 仅内存注册
    pub fn in_memory() -> Self {
        Self {
            views: RwLock::new(BTreeMap::new()),
            repository: None,
        }
    }

    /// 内存注册 + 持久化
    pub fn with_repository(repository: ViewDefinitionRepository) -> Self {
        Self {
            views: RwLock::new(BTreeMap::new()),
            repository: Some(repository),
        }
    }

    pub fn repository(&self) -> Option<&ViewDefinitionRepository> {
        self.repository.as_ref()
    }

    pub fn len(&self) -> usize {
        self.views.read().map(|views| views.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ViewDefinitionService for DefaultViewDefinitionService {
    fn register_all(&self, views: Vec<ViewDefinition>, load_batch_id: &str) -> ViewParseResult<Vec<ViewKey>> {
        if let Some(uninitialized) = views.iter().find(|view| !view.is_initialized()) {
            return Err(ViewParseError::Registration(format!(
                "视图 {} 尚未初始化",
                uninitialized.key()
            )));
        }

        if let Some(repository) = &self.repository {
            let saved = repository.save_all(&views, load_batch_id)?;
            tracing::debug!(saved, load_batch_id, "视图定义已持久化");
        }

        let mut registry = self
            .views
            .write()
            .map_err(|e| ViewParseError::Registration(format!("锁获取失败: {}", e)))?;

        let mut keys = Vec::with_capacity(views.len());
        for view in views {
            let key = view.key().clone();
            if registry.insert(key.clone(), Arc::new(view)).is_some() {
                tracing::info!(view = %key, "视图定义已替换");
            }
            keys.push(key);
        }
        Ok(keys)
    }

    fn get(&self, plugin_identifier: &str, view_name: &str) -> Option<Arc<ViewDefinition>> {
        let views = self.views.read().ok()?;
        views
            .get(&ViewKey::new(plugin_identifier, view_name))
            .cloned()
    }

    fn list(&self) -> Vec<Arc<ViewDefinition>> {
        self.views
            .read()
            .map(|views| views.values().cloned().collect())
            .unwrap_or_default()
    }
}
