// ==========================================
// MES 视图引擎 - 配置层
// ==========================================
// 职责: 视图文档发现、根组件类型、持久化位置等加载配置
// ==========================================

pub mod loader_config;

pub use loader_config::ViewLoaderConfig;
