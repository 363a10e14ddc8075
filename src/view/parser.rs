// ==========================================
// MES 视图引擎 - 视图定义解析器
// ==========================================
// 职责: XML 文档 → ViewDefinition（组件树 + 钩子 + 数据模型绑定）
// 流程:
//   文档根 (plugin) → view* → component(根, window) 递归 → 钩子
//   → 挂接组件树 → 视图初始化
// 约束: 解析器只读；单视图的可变状态全部在 ParseContext 中
// ==========================================

use crate::domain::component::ComponentPattern;
use crate::domain::data_definition::DataDefinitionService;
use crate::domain::hook::{ComponentCustomEvent, HookDefinition};
use crate::domain::types::{ComponentId, ComponentOption, ViewKey};
use crate::domain::view::ViewDefinition;
use crate::hooks::HookFactory;
use crate::i18n::TranslationService;
use crate::view::components::ViewComponentsResolver;
use crate::view::context::ParseContext;
use crate::view::definition_builder::ComponentDefinitionBuilder;
use crate::view::error::{ViewParseError, ViewParseResult};
use crate::xml::{
    get_boolean_attribute, get_string_attribute, has_text, require_string_attribute, XmlDocument,
    XmlNode,
};
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;

/// 默认根组件类型
pub const DEFAULT_ROOT_COMPONENT_TYPE: &str = "window";

pub struct ViewDefinitionParser {
    data_definitions: Arc<dyn DataDefinitionService>,
    hook_factory: Arc<HookFactory>,
    components: Arc<ViewComponentsResolver>,
    translation_service: Arc<dyn TranslationService>,
    root_component_type: String,
}

impl ViewDefinitionParser {
    pub fn new(
        data_definitions: Arc<dyn DataDefinitionService>,
        hook_factory: Arc<HookFactory>,
        components: Arc<ViewComponentsResolver>,
        translation_service: Arc<dyn TranslationService>,
    ) -> Self {
        Self {
            data_definitions,
            hook_factory,
            components,
            translation_service,
            root_component_type: DEFAULT_ROOT_COMPONENT_TYPE.to_string(),
        }
    }

    pub fn with_root_component_type(mut self, root_component_type: impl Into<String>) -> Self {
        self.root_component_type = root_component_type.into();
        self
    }

    pub fn root_component_type(&self) -> &str {
        &self.root_component_type
    }

    // ==========================================
    // 文档级解析
    // ==========================================

    pub fn parse_str(&self, xml: &str) -> ViewParseResult<Vec<ViewDefinition>> {
        self.parse_document(&XmlDocument::parse_str(xml)?)
    }

    pub fn parse_reader<R: BufRead>(&self, source: R) -> ViewParseResult<Vec<ViewDefinition>> {
        self.parse_document(&XmlDocument::from_reader(source)?)
    }

    /// 解析整个文档
    ///
    /// 任一视图失败即中止整个文档（已解析的视图一并丢弃）
    pub fn parse_document(&self, document: &XmlDocument) -> ViewParseResult<Vec<ViewDefinition>> {
        let root = document.root();
        let plugin_identifier = require_string_attribute(root, "plugin")?;

        root.child_elements()
            .filter(|child| child.name() == "view")
            .map(|child| self.parse_view(child, plugin_identifier))
            .collect()
    }

    // ==========================================
    // 视图解析
    // ==========================================

    pub fn parse_view(
        &self,
        view_node: &XmlNode,
        plugin_identifier: &str,
    ) -> ViewParseResult<ViewDefinition> {
        let name = require_string_attribute(view_node, "name")?;
        let key = ViewKey::new(plugin_identifier, name);
        let mut ctx = ParseContext::new(key.clone());

        tracing::info!(plugin = plugin_identifier, view = name, "正在读取视图");

        let menu_accessible = get_boolean_attribute(view_node, "menuAccessible", false);

        let data_definition = match get_string_attribute(view_node, "model") {
            Some(model) => Some(self.data_definitions.get(plugin_identifier, model).ok_or_else(
                || ViewParseError::UnknownModel {
                    plugin: plugin_identifier.to_string(),
                    model: model.to_string(),
                },
            )?),
            None => None,
        };

        let mut view = ViewDefinition::new(key.clone(), data_definition, menu_accessible);
        let mut root: Option<ComponentId> = None;

        for child in view_node.child_elements() {
            match child.name() {
                "component" => {
                    if root.is_some() {
                        return Err(ViewParseError::DuplicateRootComponent {
                            view: key.to_string(),
                        });
                    }
                    root = Some(self.parse_component(child, &mut ctx, None)?);
                }
                "preInitializeHook" => view.add_pre_initialize_hook(self.parse_hook(child)?),
                "postInitializeHook" => view.add_post_initialize_hook(self.parse_hook(child)?),
                "preRenderHook" => view.add_pre_render_hook(self.parse_hook(child)?),
                _ => {}
            }
        }

        view.set_component_tree(ctx.into_tree(), root);
        view.initialize()?;

        Ok(view)
    }

    // ==========================================
    // 组件解析（递归）
    // ==========================================

    /// 解析组件节点
    ///
    /// # 错误
    /// - 无父组件且 type 不是根组件类型 → UnsupportedRootComponent
    /// - 缺少 type → MissingAttribute
    /// - type 未注册 → UnresolvedComponentType
    /// - 嵌套超过 MAX_COMPONENT_DEPTH → NestingTooDeep
    pub fn parse_component(
        &self,
        node: &XmlNode,
        ctx: &mut ParseContext,
        parent: Option<ComponentId>,
    ) -> ViewParseResult<ComponentId> {
        let view = ctx.view().clone();
        self.parse_component_in_view(node, &view, ctx, parent)
    }

    /// 解析子组件（所属视图取自父组件）
    pub fn parse_child_component(
        &self,
        node: &XmlNode,
        ctx: &mut ParseContext,
        parent: ComponentId,
    ) -> ViewParseResult<ComponentId> {
        let view = ctx.tree().get(parent)?.definition().view.clone();
        self.parse_component_in_view(node, &view, ctx, Some(parent))
    }

    fn parse_component_in_view(
        &self,
        node: &XmlNode,
        view: &ViewKey,
        ctx: &mut ParseContext,
        parent: Option<ComponentId>,
    ) -> ViewParseResult<ComponentId> {
        ctx.enter_component()?;
        let result = self.build_component(node, view, ctx, parent);
        ctx.leave_component();
        result
    }

    fn build_component(
        &self,
        node: &XmlNode,
        view: &ViewKey,
        ctx: &mut ParseContext,
        parent: Option<ComponentId>,
    ) -> ViewParseResult<ComponentId> {
        let type_name = get_string_attribute(node, "type");

        if parent.is_none() && type_name != Some(self.root_component_type.as_str()) {
            return Err(ViewParseError::UnsupportedRootComponent(
                type_name.unwrap_or_default().to_string(),
            ));
        }

        let type_name = require_string_attribute(node, "type")?;
        let definition =
            ComponentDefinitionBuilder::new(view, &self.translation_service).build(node, parent);
        let variant = self.components.resolve(type_name)?;

        let index = ctx.next_index();
        let id = ctx.tree().next_id();
        ctx.tree_mut().insert(ComponentPattern::new(
            id,
            index,
            type_name,
            definition,
            variant.initial_kind(),
        ))?;

        tracing::debug!(
            view = %view,
            component = get_string_attribute(node, "name").unwrap_or_default(),
            component_type = type_name,
            index,
            "组件已创建"
        );

        let kind = variant.parse(node, self, ctx, id)?;
        ctx.tree_mut().get_mut(id)?.set_kind(kind);

        Ok(id)
    }

    // ==========================================
    // 钩子 / 事件 / 选项
    // ==========================================

    /// 解析钩子节点（bean + method）
    ///
    /// # 错误
    /// - bean 或 method 缺失/空白 → HookPrecondition
    /// - 未注册 → UnregisteredHook
    pub fn parse_hook(&self, hook_node: &XmlNode) -> ViewParseResult<HookDefinition> {
        let bean = get_string_attribute(hook_node, "bean");
        let method = get_string_attribute(hook_node, "method");

        let bean = match bean {
            Some(bean) if has_text(Some(bean)) => bean,
            _ => return Err(ViewParseError::HookPrecondition("钩子 bean 名称为必填项".to_string())),
        };
        let method = match method {
            Some(method) if has_text(Some(method)) => method,
            _ => {
                return Err(ViewParseError::HookPrecondition(
                    "钩子 method 名称为必填项".to_string(),
                ))
            }
        };

        self.hook_factory.get_hook(bean, method)
    }

    /// 解析组件自定义事件（钩子 + event）
    pub fn parse_custom_event(&self, listener_node: &XmlNode) -> ViewParseResult<ComponentCustomEvent> {
        let hook = self.parse_hook(listener_node)?;
        let event = get_string_attribute(listener_node, "event").map(str::to_string);
        Ok(ComponentCustomEvent::new(event, hook))
    }

    /// 解析选项节点：全部属性 + type 标识
    pub fn parse_option(&self, option_node: &XmlNode) -> ComponentOption {
        let attributes: HashMap<String, String> = option_node
            .attributes()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let option_type = get_string_attribute(option_node, "type").map(str::to_string);
        ComponentOption::new(option_type, attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::{ComponentKind, InputKind};
    use crate::domain::data_definition::{DataDefinition, InMemoryDataDefinitionService};
    use crate::i18n::RustI18nTranslationService;
    use crate::view::context::MAX_COMPONENT_DEPTH;
    use serde_json::Value;

    fn parser() -> ViewDefinitionParser {
        let models = InMemoryDataDefinitionService::new();
        models.register(DataDefinition::new("orders", "order").with_fields(["number", "product"]));

        let mut hooks = HookFactory::new();
        hooks
            .register("orderHooks", "first", |state: &mut Value| {
                if let Some(calls) = state["calls"].as_array_mut() {
                    calls.push(Value::from("first"));
                }
                Ok(())
            })
            .register("orderHooks", "second", |state: &mut Value| {
                if let Some(calls) = state["calls"].as_array_mut() {
                    calls.push(Value::from("second"));
                }
                Ok(())
            })
            .register("orderHooks", "onSelect", |_: &mut Value| Ok(()));

        ViewDefinitionParser::new(
            Arc::new(models),
            Arc::new(hooks),
            Arc::new(ViewComponentsResolver::with_defaults()),
            Arc::new(RustI18nTranslationService),
        )
    }

    fn single_view(xml: &str) -> ViewDefinition {
        let mut views = parser().parse_str(xml).unwrap();
        assert_eq!(views.len(), 1);
        views.remove(0)
    }

    #[test]
    fn test_window_with_single_field() {
        let view = single_view(
            r#"<views plugin="basic">
                 <view name="main">
                   <component type="window" name="window">
                     <component type="field" name="qty" field="qty"/>
                   </component>
                 </view>
               </views>"#,
        );

        assert_eq!(view.name(), "main");
        assert!(view.data_definition().is_none());
        assert!(!view.is_menu_accessible());

        let root = view.root().unwrap();
        assert_eq!(root.type_name(), "window");
        assert_eq!(root.index(), 1);
        assert_eq!(root.parent(), None);

        let children = view.children_of(root.id());
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].field_path(), Some("qty"));
        assert_eq!(children[0].index(), 2);
        assert_eq!(children[0].parent(), Some(root.id()));
        assert_eq!(children[0].kind(), &ComponentKind::Field { input: InputKind::Text });
    }

    #[test]
    fn test_depth_first_index_order() {
        let view = single_view(
            r#"<views plugin="basic"><view name="main">
                 <component type="window" name="window">
                   <component type="form" name="form">
                     <component type="field" name="a"/>
                     <component type="field" name="b"/>
                   </component>
                   <component type="field" name="c"/>
                 </component>
               </view></views>"#,
        );

        let order: Vec<(String, u32)> = view
            .components()
            .iter()
            .map(|c| (c.path().to_string(), c.index()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("window".to_string(), 1),
                ("window.form".to_string(), 2),
                ("window.form.a".to_string(), 3),
                ("window.form.b".to_string(), 4),
                ("window.c".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_non_window_root_rejected() {
        let err = parser()
            .parse_str(r#"<views plugin="basic"><view name="main"><component type="form"/></view></views>"#)
            .unwrap_err();
        assert!(matches!(err, ViewParseError::UnsupportedRootComponent(ref t) if t == "form"));
    }

    #[test]
    fn test_root_without_type_rejected() {
        let err = parser()
            .parse_str(r#"<views plugin="basic"><view name="main"><component name="x"/></view></views>"#)
            .unwrap_err();
        assert!(matches!(err, ViewParseError::UnsupportedRootComponent(ref t) if t.is_empty()));
    }

    #[test]
    fn test_unresolved_child_type_rejected() {
        let err = parser()
            .parse_str(
                r#"<views plugin="basic"><view name="main">
                     <component type="window"><component type="grid" name="g"/></component>
                   </view></views>"#,
            )
            .unwrap_err();
        assert!(matches!(err, ViewParseError::UnresolvedComponentType(ref t) if t == "grid"));
    }

    #[test]
    fn test_child_without_type_rejected() {
        let err = parser()
            .parse_str(
                r#"<views plugin="basic"><view name="main">
                     <component type="window"><component name="g"/></component>
                   </view></views>"#,
            )
            .unwrap_err();
        assert!(matches!(err, ViewParseError::MissingAttribute { ref attribute, .. } if attribute == "type"));
    }

    #[test]
    fn test_missing_root_component_rejected() {
        let err = parser()
            .parse_str(r#"<views plugin="basic"><view name="main"/></views>"#)
            .unwrap_err();
        assert!(matches!(err, ViewParseError::MissingRootComponent { ref view } if view == "basic.main"));
    }

    #[test]
    fn test_second_root_component_rejected() {
        let err = parser()
            .parse_str(
                r#"<views plugin="basic"><view name="main">
                     <component type="window"/><component type="window"/>
                   </view></views>"#,
            )
            .unwrap_err();
        assert!(matches!(err, ViewParseError::DuplicateRootComponent { .. }));
    }

    #[test]
    fn test_model_binding_and_menu_flag() {
        let view = single_view(
            r#"<views plugin="orders">
                 <view name="orderDetails" model="order" menuAccessible="true">
                   <component type="window" name="window"/>
                 </view>
               </views>"#,
        );
        assert_eq!(view.data_definition().map(|d| d.name.as_str()), Some("order"));
        assert!(view.is_menu_accessible());
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = parser()
            .parse_str(
                r#"<views plugin="orders"><view name="v" model="missing">
                     <component type="window"/>
                   </view></views>"#,
            )
            .unwrap_err();
        assert!(matches!(err, ViewParseError::UnknownModel { ref model, .. } if model == "missing"));
    }

    #[test]
    fn test_hooks_kept_in_declaration_order() {
        let view = single_view(
            r#"<views plugin="orders"><view name="v">
                 <preInitializeHook bean="orderHooks" method="second"/>
                 <component type="window"/>
                 <preInitializeHook bean="orderHooks" method="first"/>
                 <preRenderHook bean="orderHooks" method="first"/>
               </view></views>"#,
        );

        let methods: Vec<&str> = view.pre_initialize_hooks().iter().map(|h| h.method()).collect();
        assert_eq!(methods, vec!["second", "first"]);
        assert!(view.post_initialize_hooks().is_empty());
        assert_eq!(view.pre_render_hooks().len(), 1);

        let mut state = serde_json::json!({ "calls": [] });
        view.run_pre_initialize_hooks(&mut state).unwrap();
        assert_eq!(state["calls"], serde_json::json!(["second", "first"]));
    }

    #[test]
    fn test_hook_missing_bean_or_method() {
        let p = parser();
        let no_bean = XmlNode::new("preInitializeHook").with_attribute("method", "first");
        let no_method = XmlNode::new("preInitializeHook").with_attribute("bean", "orderHooks");
        let blank = XmlNode::new("preInitializeHook")
            .with_attribute("bean", " ")
            .with_attribute("method", "first");

        assert!(matches!(p.parse_hook(&no_bean), Err(ViewParseError::HookPrecondition(_))));
        assert!(matches!(p.parse_hook(&no_method), Err(ViewParseError::HookPrecondition(_))));
        assert!(matches!(p.parse_hook(&blank), Err(ViewParseError::HookPrecondition(_))));
    }

    #[test]
    fn test_hook_identifiers_match_input() {
        let node = XmlNode::new("postInitializeHook")
            .with_attribute("bean", "orderHooks")
            .with_attribute("method", "first");
        let hook = parser().parse_hook(&node).unwrap();
        assert_eq!(hook.bean(), "orderHooks");
        assert_eq!(hook.method(), "first");
    }

    #[test]
    fn test_custom_event_reads_event_name() {
        let node = XmlNode::new("listener")
            .with_attribute("event", "select")
            .with_attribute("bean", "orderHooks")
            .with_attribute("method", "onSelect");
        let event = parser().parse_custom_event(&node).unwrap();
        assert_eq!(event.event(), Some("select"));
        assert_eq!(event.bean(), "orderHooks");
        assert_eq!(event.method(), "onSelect");
    }

    #[test]
    fn test_parse_option_captures_all_attributes() {
        let node = XmlNode::new("option")
            .with_attribute("type", "value")
            .with_attribute("key", "draft")
            .with_attribute("label", "Draft");
        let option = parser().parse_option(&node);

        assert_eq!(option.option_type(), Some("value"));
        assert_eq!(option.attributes.len(), 3);
        assert_eq!(option.get("type"), Some("value"));
        assert_eq!(option.get("key"), Some("draft"));
    }

    #[test]
    fn test_select_values_and_listeners() {
        let view = single_view(
            r#"<views plugin="orders"><view name="v">
                 <component type="window" name="window">
                   <component type="select" name="state" field="state">
                     <option type="value" key="draft" label="Draft"/>
                     <option type="value" key="accepted"/>
                     <listener event="select" bean="orderHooks" method="onSelect"/>
                   </component>
                 </component>
               </view></views>"#,
        );

        let select = view.component_by_path("window.state").unwrap();
        assert_eq!(
            select.kind(),
            &ComponentKind::Select {
                values: vec![
                    crate::domain::component::SelectValue {
                        key: "draft".to_string(),
                        label: Some("Draft".to_string())
                    },
                    crate::domain::component::SelectValue {
                        key: "accepted".to_string(),
                        label: None
                    },
                ]
            }
        );
        assert_eq!(select.options().len(), 2);
        assert_eq!(select.custom_events().len(), 1);
    }

    #[test]
    fn test_field_cannot_have_children() {
        let err = parser()
            .parse_str(
                r#"<views plugin="basic"><view name="main">
                     <component type="window">
                       <component type="field" name="f"><component type="field" name="g"/></component>
                     </component>
                   </view></views>"#,
            )
            .unwrap_err();
        assert!(matches!(err, ViewParseError::ChildrenNotSupported { ref component, .. } if component == "f"));
    }

    #[test]
    fn test_window_options() {
        let view = single_view(
            r#"<views plugin="basic"><view name="main">
                 <component type="window" name="window">
                   <option type="header" value="false"/>
                   <option type="fixedHeight" value="true"/>
                 </component>
               </view></views>"#,
        );
        assert_eq!(
            view.root().unwrap().kind(),
            &ComponentKind::Window {
                header: false,
                fixed_height: true
            }
        );
    }

    #[test]
    fn test_reference_wiring() {
        let view = single_view(
            r##"<views plugin="orders"><view name="v" model="order">
                 <component type="window" name="window">
                   <component type="form" name="form" reference="form">
                     <component type="field" name="product" source="#{form}.product"/>
                   </component>
                 </component>
               </view></views>"##,
        );

        let form = view.component_by_reference("form").unwrap();
        let product = view.component_by_path("window.form.product").unwrap();
        assert_eq!(product.source_reference(), Some(form.id()));
        assert_eq!(product.field_reference(), None);
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let err = parser()
            .parse_str(
                r##"<views plugin="orders"><view name="v">
                     <component type="window">
                       <component type="field" name="p" source="#{nowhere}.product"/>
                     </component>
                   </view></views>"##,
            )
            .unwrap_err();
        assert!(matches!(err, ViewParseError::UnknownReference { ref reference, .. } if reference == "nowhere"));
    }

    #[test]
    fn test_duplicate_reference_rejected() {
        let err = parser()
            .parse_str(
                r#"<views plugin="orders"><view name="v">
                     <component type="window" reference="r">
                       <component type="field" name="p" reference="r"/>
                     </component>
                   </view></views>"#,
            )
            .unwrap_err();
        assert!(matches!(err, ViewParseError::DuplicateReference { ref reference, .. } if reference == "r"));
    }

    #[test]
    fn test_index_resets_per_view() {
        let views = parser()
            .parse_str(
                r#"<views plugin="basic">
                     <view name="a"><component type="window"><component type="field" name="x"/></component></view>
                     <view name="b"><component type="window"><component type="field" name="y"/></component></view>
                   </views>"#,
            )
            .unwrap();

        for view in &views {
            let indexes: Vec<u32> = view.components().iter().map(|c| c.index()).collect();
            assert_eq!(indexes, vec![1, 2]);
        }
    }

    #[test]
    fn test_missing_plugin_attribute_rejected() {
        let err = parser()
            .parse_str(r#"<views><view name="a"><component type="window"/></view></views>"#)
            .unwrap_err();
        assert!(matches!(err, ViewParseError::MissingAttribute { ref attribute, .. } if attribute == "plugin"));
    }

    #[test]
    fn test_custom_root_type() {
        let p = parser().with_root_component_type("form");
        let views = p
            .parse_str(r#"<views plugin="basic"><view name="a"><component type="form"/></view></views>"#)
            .unwrap();
        assert_eq!(views[0].root().unwrap().type_name(), "form");
    }

    /// window 下嵌套 containers 层 container
    fn nested_containers(containers: usize) -> String {
        format!(
            r#"<views plugin="basic"><view name="deep"><component type="window">{}{}</component></view></views>"#,
            r#"<component type="container">"#.repeat(containers),
            "</component>".repeat(containers)
        )
    }

    #[test]
    fn test_nesting_at_component_limit_is_accepted() {
        let views = parser()
            .parse_str(&nested_containers(MAX_COMPONENT_DEPTH - 1))
            .unwrap();
        assert_eq!(views[0].components().len(), MAX_COMPONENT_DEPTH);
    }

    #[test]
    fn test_nesting_beyond_component_limit_rejected() {
        let err = parser()
            .parse_str(&nested_containers(MAX_COMPONENT_DEPTH))
            .unwrap_err();
        assert!(matches!(
            err,
            ViewParseError::NestingTooDeep { ref view, limit } if view == "basic.deep" && limit == MAX_COMPONENT_DEPTH
        ));
    }

    #[test]
    fn test_name_colliding_with_unnamed_segment_rejected() {
        let err = parser()
            .parse_str(
                r#"<views plugin="basic"><view name="main">
                     <component type="window" name="window">
                       <component type="field" name="component3" field="named"/>
                       <component type="field" field="unnamed"/>
                     </component>
                   </view></views>"#,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ViewParseError::DuplicateComponentPath { ref path, .. } if path == "window.component3"
        ));
    }

    #[test]
    fn test_dotted_name_colliding_with_nested_path_rejected() {
        let err = parser()
            .parse_str(
                r#"<views plugin="basic"><view name="main">
                     <component type="window" name="window">
                       <component type="form" name="form">
                         <component type="field" name="number"/>
                       </component>
                       <component type="field" name="form.number"/>
                     </component>
                   </view></views>"#,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ViewParseError::DuplicateComponentPath { ref path, .. } if path == "window.form.number"
        ));
    }

    #[test]
    fn test_unnamed_components_get_distinct_paths() {
        let view = single_view(
            r#"<views plugin="basic"><view name="main">
                 <component type="window" name="window">
                   <component type="field" field="a"/>
                   <component type="field" field="b"/>
                 </component>
               </view></views>"#,
        );
        assert_eq!(
            view.component_by_path("window.component2").and_then(|c| c.field_path()),
            Some("a")
        );
        assert_eq!(
            view.component_by_path("window.component3").and_then(|c| c.field_path()),
            Some("b")
        );
    }
}
