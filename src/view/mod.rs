// ==========================================
// MES 视图引擎 - 视图解析装配层
// ==========================================
// 流程: 文档发现 → XML 解析 → 视图/组件递归装配 → 初始化 → 注册/持久化
// ==========================================

pub mod components;
pub mod context;
pub mod definition_builder;
pub mod error;
pub mod loader;
pub mod parser;
pub mod registry;

// 重导出核心类型
pub use components::{
    ComponentVariant, ContainerVariant, FieldVariant, SelectVariant, ViewComponentsResolver,
    WindowVariant,
};
pub use context::{IndexAllocator, ParseContext, MAX_COMPONENT_DEPTH};
pub use definition_builder::ComponentDefinitionBuilder;
pub use error::{ViewParseError, ViewParseResult};
pub use loader::{DocumentFailure, DocumentFailureKind, LoadReport, ViewDocumentLoader};
pub use parser::{ViewDefinitionParser, DEFAULT_ROOT_COMPONENT_TYPE};
pub use registry::{DefaultViewDefinitionService, ViewDefinitionService};
