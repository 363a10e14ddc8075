// ==========================================
// 视图解析集成测试
// ==========================================
// 测试目标: 文档 → 视图定义 的完整装配
// 覆盖范围: 组件树 / 序号 / 钩子顺序 / 模型绑定 / 引用 / 标签翻译
// ==========================================


use mes_view::domain::{ComponentKind, InputKind, SelectValue};
use mes_view::logging;
use mes_view::{ViewDefinition, ViewParseError};
use serde_json::json;
use test_helpers::{create_parser, MAIN_VIEW_DOCUMENT, ORDERS_DOCUMENT};

fn parse_orders() -> Vec<ViewDefinition> {
    create_parser()
        .parse_str(ORDERS_DOCUMENT)
        .expect("orders document should parse")
}

fn index_sequence(view: &ViewDefinition) -> Vec<(String, u32)> {
    view.components()
        .iter()
        .map(|c| (c.path().to_string(), c.index()))
        .collect()
}

// ==========================================
// 测试用例 1: 单视图 window → field
// ==========================================

#[test]
fn test_main_view_end_to_end() {
    logging::init_test();

    let views = create_parser().parse_str(MAIN_VIEW_DOCUMENT).unwrap();
    assert_eq!(views.len(), 1);

    let view = &views[0];
    assert_eq!(view.name(), "main");
    assert_eq!(view.plugin_identifier(), "basic");
    assert!(view.data_definition().is_none());
    assert!(view.is_initialized());

    let root = view.root().expect("root component");
    assert_eq!(root.type_name(), "window");
    assert_eq!(root.index(), 1);
    assert!(root.parent().is_none());

    let children = view.children_of(root.id());
    assert_eq!(children.len(), 1);
    let field = children[0];
    assert_eq!(field.type_name(), "field");
    assert_eq!(field.field_path(), Some("qty"));
    assert_eq!(field.index(), 2);
    assert_eq!(field.parent(), Some(root.id()));
}

// ==========================================
// 测试用例 2: 序号按深度优先文档顺序，且重复解析结果一致
// ==========================================

#[test]
fn test_index_sequence_is_depth_first_and_repeatable() {
    let first = parse_orders();
    let second = parse_orders();

    let details = first.iter().find(|v| v.name() == "orderDetails").unwrap();
    assert_eq!(
        index_sequence(details),
        vec![
            ("window".to_string(), 1),
            ("window.form".to_string(), 2),
            ("window.form.number".to_string(), 3),
            ("window.form.product".to_string(), 4),
            ("window.form.state".to_string(), 5),
            ("window.form.urgent".to_string(), 6),
        ]
    );

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(index_sequence(a), index_sequence(b));
    }
}

#[test]
fn test_index_resets_for_each_view() {
    let views = parse_orders();
    for view in &views {
        let indexes: Vec<u32> = view.components().iter().map(|c| c.index()).collect();
        let expected: Vec<u32> = (1..=indexes.len() as u32).collect();
        assert_eq!(indexes, expected, "view {}", view.name());
    }
}

// ==========================================
// 测试用例 3: 组件配置与变体
// ==========================================

#[test]
fn test_order_details_components() {
    let views = parse_orders();
    let details = views.iter().find(|v| v.name() == "orderDetails").unwrap();

    assert_eq!(details.data_definition().map(|d| d.name.as_str()), Some("order"));
    assert!(!details.is_menu_accessible());

    let number = details.component_by_path("window.form.number").unwrap();
    assert_eq!(number.kind(), &ComponentKind::Field { input: InputKind::Text });
    assert!(number.definition().has_description);
    assert!(number.definition().default_enabled);

    let product = details.component_by_path("window.form.product").unwrap();
    assert_eq!(product.kind(), &ComponentKind::Field { input: InputKind::TextArea });
    let form = details.component_by_reference("form").unwrap();
    assert_eq!(product.source_reference(), Some(form.id()));

    let state = details.component_by_path("window.form.state").unwrap();
    assert!(!state.definition().default_enabled);
    assert_eq!(
        state.kind(),
        &ComponentKind::Select {
            values: vec![
                SelectValue {
                    key: "draft".to_string(),
                    label: Some("Draft".to_string()),
                },
                SelectValue {
                    key: "accepted".to_string(),
                    label: Some("Accepted".to_string()),
                },
            ]
        }
    );
    assert_eq!(state.custom_events().len(), 1);
    assert_eq!(state.custom_events()[0].event(), Some("change"));

    let urgent = details.component_by_path("window.form.urgent").unwrap();
    assert_eq!(urgent.kind(), &ComponentKind::Field { input: InputKind::CheckBox });
    assert!(!urgent.definition().default_visible);

    // 非根组件均有父链接
    for component in details.components().iter() {
        if component.id() == details.root().unwrap().id() {
            assert!(component.parent().is_none());
        } else {
            assert!(component.parent().is_some());
        }
    }
}

// ==========================================
// 测试用例 4: 钩子按声明顺序注册与执行
// ==========================================

#[test]
fn test_hooks_registered_in_declaration_order() {
    let document = r#"<views plugin="orders">
        <view name="v">
            <preInitializeHook bean="orderHooks" method="second"/>
            <preInitializeHook bean="orderHooks" method="first"/>
            <component type="window"/>
        </view>
    </views>"#;

    let views = create_parser().parse_str(document).unwrap();
    let hooks: Vec<&str> = views[0]
        .pre_initialize_hooks()
        .iter()
        .map(|h| h.method())
        .collect();
    assert_eq!(hooks, vec!["second", "first"]);

    let mut state = json!({ "calls": [] });
    views[0].run_pre_initialize_hooks(&mut state).unwrap();
    assert_eq!(state["calls"], json!(["orderHooks#second", "orderHooks#first"]));
}

#[test]
fn test_lifecycle_hook_lists() {
    let views = parse_orders();
    let details = views.iter().find(|v| v.name() == "orderDetails").unwrap();

    let mut state = json!({ "calls": [] });
    details.run_pre_initialize_hooks(&mut state).unwrap();
    details.run_post_initialize_hooks(&mut state).unwrap();
    details.run_pre_render_hooks(&mut state).unwrap();

    assert_eq!(
        state["calls"],
        json!([
            "orderHooks#first",
            "orderHooks#afterInit",
            "orderHooks#beforeRender"
        ])
    );
}

// ==========================================
// 测试用例 5: 失败场景
// ==========================================

#[test]
fn test_unregistered_hook_aborts_document() {
    let document = r#"<views plugin="orders">
        <view name="v">
            <component type="window"/>
            <preRenderHook bean="orderHooks" method="unknown"/>
        </view>
    </views>"#;

    let err = create_parser().parse_str(document).unwrap_err();
    assert!(matches!(err, ViewParseError::UnregisteredHook { ref method, .. } if method == "unknown"));
}

#[test]
fn test_error_in_second_view_aborts_whole_document() {
    let document = r#"<views plugin="orders">
        <view name="ok"><component type="window"/></view>
        <view name="broken"><component type="form"/></view>
    </views>"#;

    let err = create_parser().parse_str(document).unwrap_err();
    assert!(matches!(err, ViewParseError::UnsupportedRootComponent(ref t) if t == "form"));
}

#[test]
fn test_malformed_document() {
    let err = create_parser()
        .parse_str(r#"<views plugin="orders"><view name="v"></views>"#)
        .unwrap_err();
    assert!(matches!(err, ViewParseError::MalformedDocument(_)));
}

// ==========================================
// 测试用例 6: 组件标签翻译
// ==========================================

#[test]
fn test_component_labels() {
    let views = parse_orders();
    let details = views.iter().find(|v| v.name() == "orderDetails").unwrap();

    let root = details.root().unwrap();
    assert_eq!(root.label("en"), "Order details");
    assert_eq!(root.label("zh-CN"), "订单详情");

    let number = details.component_by_path("window.form.number").unwrap();
    assert_eq!(number.label("en"), "Order number");

    // 无译文时回退为组件名
    let urgent = details.component_by_path("window.form.urgent").unwrap();
    assert_eq!(urgent.label("en"), "urgent");
}
