// ==========================================
// MES 视图引擎 - 视图定义
// ==========================================
// 职责: 命名视图（插件内唯一）+ 组件树 + 三类生命周期钩子
// 生命周期: 解析期构建并初始化，注册后只读
// ==========================================

use crate::domain::component::ComponentPattern;
use crate::domain::component_tree::ComponentTree;
use crate::domain::data_definition::DataDefinition;
use crate::domain::hook::HookDefinition;
use crate::domain::types::{ComponentId, ViewKey};
use crate::view::error::{ViewParseError, ViewParseResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// 路径中引用其他组件的前缀: #{reference}.field
const REFERENCE_PREFIX: &str = "#{";

#[derive(Debug, Clone, Serialize)]
pub struct ViewDefinition {
    key: ViewKey,
    data_definition: Option<DataDefinition>,
    menu_accessible: bool,
    components: ComponentTree,
    root: Option<ComponentId>,
    pre_initialize_hooks: Vec<HookDefinition>,
    post_initialize_hooks: Vec<HookDefinition>,
    pre_render_hooks: Vec<HookDefinition>,
    #[serde(skip)]
    references: BTreeMap<String, ComponentId>,
    #[serde(skip)]
    paths: BTreeMap<String, ComponentId>,
    #[serde(skip)]
    initialized: bool,
}

impl ViewDefinition {
    pub fn new(key: ViewKey, data_definition: Option<DataDefinition>, menu_accessible: bool) -> Self {
        Self {
            key,
            data_definition,
            menu_accessible,
            components: ComponentTree::new(),
            root: None,
            pre_initialize_hooks: Vec::new(),
            post_initialize_hooks: Vec::new(),
            pre_render_hooks: Vec::new(),
            references: BTreeMap::new(),
            paths: BTreeMap::new(),
            initialized: false,
        }
    }

    // ===== 装配 =====

    pub fn add_pre_initialize_hook(&mut self, hook: HookDefinition) {
        self.pre_initialize_hooks.push(hook);
    }

    pub fn add_post_initialize_hook(&mut self, hook: HookDefinition) {
        self.post_initialize_hooks.push(hook);
    }

    pub fn add_pre_render_hook(&mut self, hook: HookDefinition) {
        self.pre_render_hooks.push(hook);
    }

    /// 挂接组件树与根组件
    pub fn set_component_tree(&mut self, components: ComponentTree, root: Option<ComponentId>) {
        self.components = components;
        self.root = root;
        self.initialized = false;
    }

    /// 初始化视图
    ///
    /// 1. 校验根组件存在
    /// 2. 计算组件路径（window.form.number）
    /// 3. 建立引用名索引（重复即失败）
    /// 4. 解析 field/source 中的 #{reference} 前缀
    pub fn initialize(&mut self) -> ViewParseResult<()> {
        let root = self.root.ok_or_else(|| ViewParseError::MissingRootComponent {
            view: self.key.to_string(),
        })?;

        self.assign_paths(root)?;
        self.collect_references()?;
        self.resolve_path_references()?;

        self.initialized = true;
        tracing::debug!(
            view = %self.key,
            components = self.components.len(),
            references = self.references.len(),
            "视图初始化完成"
        );
        Ok(())
    }

    fn assign_paths(&mut self, root: ComponentId) -> ViewParseResult<()> {
        self.paths.clear();
        for id in self.components.depth_first(root) {
            let component = self.components.get(id)?;
            let segment = component
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("component{}", component.index()));
            let path = match component.parent() {
                Some(parent) => format!("{}.{}", self.components.get(parent)?.path(), segment),
                None => segment,
            };
            // 显式名与 component<index> 或含 "." 的名称可能拼出同一路径
            if self.paths.insert(path.clone(), id).is_some() {
                return Err(ViewParseError::DuplicateComponentPath {
                    view: self.key.to_string(),
                    path,
                });
            }
            self.components.get_mut(id)?.set_path(path);
        }
        Ok(())
    }

    fn collect_references(&mut self) -> ViewParseResult<()> {
        self.references.clear();
        for component in self.components.iter() {
            if let Some(reference) = component.reference() {
                if self.references.insert(reference.to_string(), component.id()).is_some() {
                    return Err(ViewParseError::DuplicateReference {
                        view: self.key.to_string(),
                        reference: reference.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn resolve_path_references(&mut self) -> ViewParseResult<()> {
        let view = self.key.to_string();
        let references = &self.references;
        let lookup = |path: Option<&str>| -> ViewParseResult<Option<ComponentId>> {
            match path.and_then(parse_reference) {
                Some(reference) => references
                    .get(reference)
                    .copied()
                    .map(Some)
                    .ok_or_else(|| ViewParseError::UnknownReference {
                        view: view.clone(),
                        reference: reference.to_string(),
                    }),
                None => Ok(None),
            }
        };

        for component in self.components.iter_mut() {
            let field = lookup(component.field_path())?;
            let source = lookup(component.source_field_path())?;
            component.set_field_reference(field);
            component.set_source_reference(source);
        }
        Ok(())
    }

    // ===== 查询 =====

    pub fn key(&self) -> &ViewKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.view_name
    }

    pub fn plugin_identifier(&self) -> &str {
        &self.key.plugin_identifier
    }

    pub fn data_definition(&self) -> Option<&DataDefinition> {
        self.data_definition.as_ref()
    }

    pub fn is_menu_accessible(&self) -> bool {
        self.menu_accessible
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn components(&self) -> &ComponentTree {
        &self.components
    }

    pub fn component(&self, id: ComponentId) -> Option<&ComponentPattern> {
        self.components.get(id).ok()
    }

    pub fn root(&self) -> Option<&ComponentPattern> {
        self.root.and_then(|id| self.component(id))
    }

    /// 子组件列表
    pub fn children_of(&self, id: ComponentId) -> Vec<&ComponentPattern> {
        self.component(id)
            .map(|c| c.children().iter().filter_map(|child| self.component(*child)).collect())
            .unwrap_or_default()
    }

    pub fn component_by_reference(&self, reference: &str) -> Option<&ComponentPattern> {
        self.references.get(reference).and_then(|id| self.component(*id))
    }

    pub fn component_by_path(&self, path: &str) -> Option<&ComponentPattern> {
        self.paths.get(path).and_then(|id| self.component(*id))
    }

    pub fn pre_initialize_hooks(&self) -> &[HookDefinition] {
        &self.pre_initialize_hooks
    }

    pub fn post_initialize_hooks(&self) -> &[HookDefinition] {
        &self.post_initialize_hooks
    }

    pub fn pre_render_hooks(&self) -> &[HookDefinition] {
        &self.pre_render_hooks
    }

    // ===== 钩子执行（按声明顺序） =====

    pub fn run_pre_initialize_hooks(&self, state: &mut Value) -> anyhow::Result<()> {
        run_hooks(&self.pre_initialize_hooks, state)
    }

    pub fn run_post_initialize_hooks(&self, state: &mut Value) -> anyhow::Result<()> {
        run_hooks(&self.post_initialize_hooks, state)
    }

    pub fn run_pre_render_hooks(&self, state: &mut Value) -> anyhow::Result<()> {
        run_hooks(&self.pre_render_hooks, state)
    }
}

fn run_hooks(hooks: &[HookDefinition], state: &mut Value) -> anyhow::Result<()> {
    for hook in hooks {
        hook.call(state)?;
    }
    Ok(())
}

/// 提取 "#{ref}.rest" 中的 ref
fn parse_reference(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(REFERENCE_PREFIX)?;
    let end = rest.find('}')?;
    Some(&rest[..end])
}
