// ==========================================
// MES 视图引擎 - 解析装配错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 资源I/O / 文档格式 / 结构校验 / 前置条件 / 引用解析
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 视图解析装配错误类型
#[derive(Error, Debug)]
pub enum ViewParseError {
    // ===== 资源错误（加载器跳过该文档，继续加载） =====
    #[error("视图文档读取失败 ({path}): {message}")]
    ResourceRead { path: String, message: String },

    // ===== 文档格式错误 =====
    #[error("视图文档格式错误: {0}")]
    MalformedDocument(String),

    // ===== 结构校验错误 =====
    #[error("缺少必需属性: <{element}> 缺少 {attribute}")]
    MissingAttribute { element: String, attribute: String },

    #[error("不支持的根组件类型: {0}")]
    UnsupportedRootComponent(String),

    #[error("未注册的组件类型: {0}")]
    UnresolvedComponentType(String),

    #[error("视图 {view} 缺少根组件")]
    MissingRootComponent { view: String },

    #[error("视图 {view} 存在多个根组件")]
    DuplicateRootComponent { view: String },

    #[error("组件名称重复 (视图 {view}): {name}")]
    DuplicateComponentName { view: String, name: String },

    #[error("组件引用名重复 (视图 {view}): {reference}")]
    DuplicateReference { view: String, reference: String },

    #[error("未知的组件引用 (视图 {view}): #{{{reference}}}")]
    UnknownReference { view: String, reference: String },

    #[error("组件 {component} (类型 {component_type}) 不支持子组件")]
    ChildrenNotSupported {
        component: String,
        component_type: String,
    },

    #[error("组件路径重复 (视图 {view}): {path}")]
    DuplicateComponentPath { view: String, path: String },

    #[error("组件嵌套过深 (视图 {view}): 超过 {limit} 层")]
    NestingTooDeep { view: String, limit: usize },

    #[error("组件句柄无效: {0}")]
    InvalidComponentHandle(usize),

    // ===== 前置条件错误 =====
    #[error("钩子定义不完整: {0}")]
    HookPrecondition(String),

    // ===== 协作方解析错误 =====
    #[error("未注册的钩子: bean={bean}, method={method}")]
    UnregisteredHook { bean: String, method: String },

    #[error("数据模型不存在: plugin={plugin}, model={model}")]
    UnknownModel { plugin: String, model: String },

    #[error("视图注册失败: {0}")]
    Registration(String),

    // ===== 持久化错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<quick_xml::Error> for ViewParseError {
    fn from(err: quick_xml::Error) -> Self {
        ViewParseError::MalformedDocument(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ViewParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ViewParseError::MalformedDocument(err.to_string())
    }
}

impl From<std::str::Utf8Error> for ViewParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        ViewParseError::MalformedDocument(err.to_string())
    }
}

impl ViewParseError {
    /// 是否为资源读取类错误（加载器据此决定“跳过并继续”）
    pub fn is_resource_error(&self) -> bool {
        matches!(self, ViewParseError::ResourceRead { .. })
    }
}

/// Result 类型别名
pub type ViewParseResult<T> = Result<T, ViewParseError>;
