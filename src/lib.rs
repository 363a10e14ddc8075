// ==========================================
// MES 视图引擎 - 核心库
// ==========================================
// 系统定位: 制造执行系统视图层
// 职责: XML 视图定义 → 组件树装配 → 钩子绑定 → 注册/持久化
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// XML 基础层 - 节点树与属性读取
pub mod xml;

// 领域层 - 视图、组件、钩子
pub mod domain;

// 钩子层 - 钩子注册表
pub mod hooks;

// 视图层 - 解析、装配、加载、注册
pub mod view;

// 数据仓储层 - 视图定义持久化
pub mod repository;

// 配置层 - 加载配置
pub mod config;

// SQLite 连接（视图定义库）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    ComponentDefinition, ComponentId, ComponentKind, ComponentOption, ComponentPattern,
    DataDefinition, DataDefinitionService, HookDefinition, InMemoryDataDefinitionService,
    ViewDefinition, ViewKey,
};

pub use hooks::HookFactory;

pub use i18n::{RustI18nTranslationService, TranslationService};

pub use view::{
    DefaultViewDefinitionService, LoadReport, ViewComponentsResolver, ViewDefinitionParser,
    ViewDefinitionService, ViewDocumentLoader, ViewParseError, ViewParseResult,
};

pub use config::ViewLoaderConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "MES 视图定义加载器";
