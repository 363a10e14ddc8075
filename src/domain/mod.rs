// ==========================================
// MES 视图引擎 - 领域模型层
// ==========================================
// 职责: 视图定义、组件树、钩子、数据模型描述
// 红线: 不含 XML 解析逻辑，不含持久化逻辑
// ==========================================

pub mod component;
pub mod component_tree;
pub mod data_definition;
pub mod hook;
pub mod types;
pub mod view;

// 重导出核心类型
pub use component::{ComponentDefinition, ComponentKind, ComponentPattern, InputKind, SelectValue};
pub use component_tree::ComponentTree;
pub use data_definition::{DataDefinition, DataDefinitionService, InMemoryDataDefinitionService};
pub use hook::{ComponentCustomEvent, HookDefinition, HookFn};
pub use types::{ComponentId, ComponentOption, ViewKey};
pub use view::ViewDefinition;
