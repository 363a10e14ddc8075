// ==========================================
// MES 视图引擎 - 钩子层
// ==========================================

pub mod hook_factory;

pub use hook_factory::HookFactory;
