// ==========================================
// MES 视图引擎 - 组件类型解析
// ==========================================
// 职责: 类型标识 → 组件变体 的注册表，以及内置变体的节点解析
// 内置: window / container / form / field / input / textarea / checkbox / select
// 扩展: ViewComponentsResolver::register(token, variant)
// ==========================================

use crate::domain::component::{ComponentKind, InputKind, SelectValue};
use crate::domain::hook::ComponentCustomEvent;
use crate::domain::types::{ComponentId, ComponentOption};
use crate::view::context::ParseContext;
use crate::view::error::{ViewParseError, ViewParseResult};
use crate::view::parser::ViewDefinitionParser;
use crate::xml::XmlNode;
use std::collections::HashMap;
use std::sync::Arc;

// ==========================================
// ComponentVariant Trait
// ==========================================
pub trait ComponentVariant: Send + Sync {
    /// 组件插入组件树时的初始变体数据
    fn initial_kind(&self) -> ComponentKind;

    /// 解析节点专属内容（子组件、选项、事件），返回最终变体数据
    fn parse(
        &self,
        node: &XmlNode,
        parser: &ViewDefinitionParser,
        ctx: &mut ParseContext,
        id: ComponentId,
    ) -> ViewParseResult<ComponentKind>;
}

// ==========================================
// ViewComponentsResolver - 类型注册表
// ==========================================
pub struct ViewComponentsResolver {
    variants: HashMap<String, Arc<dyn ComponentVariant>>,
}

impl ViewComponentsResolver {
    /// 空注册表
    pub fn empty() -> Self {
        Self {
            variants: HashMap::new(),
        }
    }

    /// 含全部内置变体的注册表
    pub fn with_defaults() -> Self {
        let mut resolver = Self::empty();
        resolver
            .register("window", WindowVariant)
            .register("container", ContainerVariant { form: false })
            .register("form", ContainerVariant { form: true })
            .register("field", FieldVariant { input: InputKind::Text })
            .register("input", FieldVariant { input: InputKind::Text })
            .register("textarea", FieldVariant { input: InputKind::TextArea })
            .register("checkbox", FieldVariant { input: InputKind::CheckBox })
            .register("select", SelectVariant);
        resolver
    }

    pub fn register<V>(&mut self, token: &str, variant: V) -> &mut Self
    where
        V: ComponentVariant + 'static,
    {
        self.variants.insert(token.to_string(), Arc::new(variant));
        self
    }

    /// 按类型标识查找变体
    ///
    /// # 错误
    /// - 未注册 → UnresolvedComponentType
    pub fn resolve(&self, token: &str) -> ViewParseResult<&dyn ComponentVariant> {
        self.variants
            .get(token)
            .map(|variant| variant.as_ref())
            .ok_or_else(|| ViewParseError::UnresolvedComponentType(token.to_string()))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.variants.contains_key(token)
    }

    /// 已注册的类型标识（排序）
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.variants.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}

impl Default for ViewComponentsResolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ==========================================
// 通用节点内容解析
// ==========================================
// component → 子组件（仅容器）
// option    → ComponentOption
// listener  → 自定义事件
fn parse_content(
    node: &XmlNode,
    parser: &ViewDefinitionParser,
    ctx: &mut ParseContext,
    id: ComponentId,
    accepts_children: bool,
) -> ViewParseResult<Vec<ComponentOption>> {
    let mut options = Vec::new();
    let mut events: Vec<ComponentCustomEvent> = Vec::new();

    for child in node.child_elements() {
        match child.name() {
            "component" => {
                if !accepts_children {
                    let current = ctx.tree().get(id)?;
                    return Err(ViewParseError::ChildrenNotSupported {
                        component: current.name().unwrap_or_default().to_string(),
                        component_type: current.type_name().to_string(),
                    });
                }
                parser.parse_child_component(child, ctx, id)?;
            }
            "option" => options.push(parser.parse_option(child)),
            "listener" => events.push(parser.parse_custom_event(child)?),
            other => tracing::debug!(element = other, "忽略未知的组件子元素"),
        }
    }

    let pattern = ctx.tree_mut().get_mut(id)?;
    pattern.set_options(options.clone());
    pattern.set_custom_events(events);
    Ok(options)
}

/// 读取布尔型选项: <option type="header" value="false"/>
fn boolean_option(options: &[ComponentOption], option_type: &str, default_value: bool) -> bool {
    options
        .iter()
        .rev()
        .find(|o| o.is_type(option_type))
        .and_then(ComponentOption::value)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(default_value)
}

// ==========================================
// 内置变体
// ==========================================

/// 窗口（唯一合法的根组件）
pub struct WindowVariant;

impl ComponentVariant for WindowVariant {
    fn initial_kind(&self) -> ComponentKind {
        ComponentKind::Window {
            header: true,
            fixed_height: false,
        }
    }

    fn parse(
        &self,
        node: &XmlNode,
        parser: &ViewDefinitionParser,
        ctx: &mut ParseContext,
        id: ComponentId,
    ) -> ViewParseResult<ComponentKind> {
        let options = parse_content(node, parser, ctx, id, true)?;
        Ok(ComponentKind::Window {
            header: boolean_option(&options, "header", true),
            fixed_height: boolean_option(&options, "fixedHeight", false),
        })
    }
}

/// 容器 / 表单
pub struct ContainerVariant {
    pub form: bool,
}

impl ComponentVariant for ContainerVariant {
    fn initial_kind(&self) -> ComponentKind {
        ComponentKind::Container { form: self.form }
    }

    fn parse(
        &self,
        node: &XmlNode,
        parser: &ViewDefinitionParser,
        ctx: &mut ParseContext,
        id: ComponentId,
    ) -> ViewParseResult<ComponentKind> {
        parse_content(node, parser, ctx, id, true)?;
        Ok(self.initial_kind())
    }
}

/// 输入字段
pub struct FieldVariant {
    pub input: InputKind,
}

impl ComponentVariant for FieldVariant {
    fn initial_kind(&self) -> ComponentKind {
        ComponentKind::Field { input: self.input }
    }

    fn parse(
        &self,
        node: &XmlNode,
        parser: &ViewDefinitionParser,
        ctx: &mut ParseContext,
        id: ComponentId,
    ) -> ViewParseResult<ComponentKind> {
        parse_content(node, parser, ctx, id, false)?;
        Ok(self.initial_kind())
    }
}

/// 下拉框
///
/// 可选值来自 <option type="value" key=".." label=".."/>，key 必填
pub struct SelectVariant;

impl ComponentVariant for SelectVariant {
    fn initial_kind(&self) -> ComponentKind {
        ComponentKind::Select { values: Vec::new() }
    }

    fn parse(
        &self,
        node: &XmlNode,
        parser: &ViewDefinitionParser,
        ctx: &mut ParseContext,
        id: ComponentId,
    ) -> ViewParseResult<ComponentKind> {
        let options = parse_content(node, parser, ctx, id, false)?;

        let values = options
            .iter()
            .filter(|o| o.is_type("value"))
            .map(|o| {
                let key = o.get("key").ok_or_else(|| ViewParseError::MissingAttribute {
                    element: "option".to_string(),
                    attribute: "key".to_string(),
                })?;
                Ok(SelectValue {
                    key: key.to_string(),
                    label: o.get("label").map(str::to_string),
                })
            })
            .collect::<ViewParseResult<Vec<_>>>()?;

        Ok(ComponentKind::Select { values })
    }
}
