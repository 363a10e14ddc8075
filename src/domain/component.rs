// ==========================================
// MES 视图引擎 - 组件定义与组件实例
// ==========================================
// 职责: ComponentDefinition（节点配置记录）
//       ComponentPattern（带类型的已装配组件）
// 约束: 父组件以句柄回指，子组件所有权归组件树（arena）
// ==========================================

use crate::domain::hook::ComponentCustomEvent;
use crate::domain::types::{ComponentId, ComponentOption, ViewKey};
use crate::i18n::TranslationService;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

// ==========================================
// ComponentDefinition - 组件配置记录
// ==========================================
#[derive(Clone, Serialize)]
pub struct ComponentDefinition {
    pub name: Option<String>,
    pub field_path: Option<String>,
    pub source_field_path: Option<String>,
    /// 父组件句柄（根组件为 None）
    pub parent: Option<ComponentId>,
    /// 所属视图
    pub view: ViewKey,
    /// 引用名（同一视图内跨组件查找）
    pub reference: Option<String>,
    pub default_enabled: bool,
    pub default_visible: bool,
    pub has_description: bool,
    #[serde(skip)]
    pub translation_service: Arc<dyn TranslationService>,
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("field_path", &self.field_path)
            .field("source_field_path", &self.source_field_path)
            .field("parent", &self.parent)
            .field("view", &self.view)
            .field("reference", &self.reference)
            .field("default_enabled", &self.default_enabled)
            .field("default_visible", &self.default_visible)
            .field("has_description", &self.has_description)
            .finish_non_exhaustive()
    }
}

// ==========================================
// 组件类型专属数据
// ==========================================

/// 输入类字段的呈现方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    TextArea,
    CheckBox,
}

/// 下拉框可选值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectValue {
    pub key: String,
    pub label: Option<String>,
}

/// 组件变体（封闭集合）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentKind {
    Window { header: bool, fixed_height: bool },
    Container { form: bool },
    Field { input: InputKind },
    Select { values: Vec<SelectValue> },
}

impl ComponentKind {
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ComponentKind::Window { .. } | ComponentKind::Container { .. }
        )
    }
}

// ==========================================
// ComponentPattern - 已装配组件
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ComponentPattern {
    id: ComponentId,
    /// 文档深度优先顺序序号（每个视图从 1 开始）
    index: u32,
    type_name: String,
    definition: ComponentDefinition,
    kind: ComponentKind,
    options: Vec<ComponentOption>,
    custom_events: Vec<ComponentCustomEvent>,
    children: Vec<ComponentId>,
    path: String,
    field_reference: Option<ComponentId>,
    source_reference: Option<ComponentId>,
}

impl ComponentPattern {
    pub fn new(
        id: ComponentId,
        index: u32,
        type_name: impl Into<String>,
        definition: ComponentDefinition,
        kind: ComponentKind,
    ) -> Self {
        Self {
            id,
            index,
            type_name: type_name.into(),
            definition,
            kind,
            options: Vec::new(),
            custom_events: Vec::new(),
            children: Vec::new(),
            path: String::new(),
            field_reference: None,
            source_reference: None,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    pub fn name(&self) -> Option<&str> {
        self.definition.name.as_deref()
    }

    pub fn field_path(&self) -> Option<&str> {
        self.definition.field_path.as_deref()
    }

    pub fn source_field_path(&self) -> Option<&str> {
        self.definition.source_field_path.as_deref()
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.definition.parent
    }

    pub fn reference(&self) -> Option<&str> {
        self.definition.reference.as_deref()
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn options(&self) -> &[ComponentOption] {
        &self.options
    }

    pub fn custom_events(&self) -> &[ComponentCustomEvent] {
        &self.custom_events
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    /// 组件路径（如 window.form.number），视图初始化后可用
    pub fn path(&self) -> &str {
        &self.path
    }

    /// field 属性中 #{ref} 解析到的组件
    pub fn field_reference(&self) -> Option<ComponentId> {
        self.field_reference
    }

    /// source 属性中 #{ref} 解析到的组件
    pub fn source_reference(&self) -> Option<ComponentId> {
        self.source_reference
    }

    /// 组件标签
    ///
    /// 翻译键: <plugin>.<view>.<path>.label，缺失时回退为组件名
    pub fn label(&self, locale: &str) -> String {
        let key = format!(
            "{}.{}.{}.label",
            self.definition.view.plugin_identifier, self.definition.view.view_name, self.path
        );
        self.definition
            .translation_service
            .translate(&key, locale)
            .or_else(|| self.definition.name.clone())
            .unwrap_or_else(|| self.type_name.clone())
    }

    // ===== 装配期修改（仅组件树/视图初始化调用） =====

    pub(crate) fn set_kind(&mut self, kind: ComponentKind) {
        self.kind = kind;
    }

    pub(crate) fn set_options(&mut self, options: Vec<ComponentOption>) {
        self.options = options;
    }

    pub(crate) fn set_custom_events(&mut self, events: Vec<ComponentCustomEvent>) {
        self.custom_events = events;
    }

    pub(crate) fn push_child(&mut self, child: ComponentId) {
        self.children.push(child);
    }

    pub(crate) fn set_path(&mut self, path: String) {
        self.path = path;
    }

    pub(crate) fn set_field_reference(&mut self, id: Option<ComponentId>) {
        self.field_reference = id;
    }

    pub(crate) fn set_source_reference(&mut self, id: Option<ComponentId>) {
        self.source_reference = id;
    }
}
