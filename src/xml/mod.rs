// ==========================================
// MES 视图引擎 - XML 基础层
// ==========================================
// 职责: 文档解析为节点树，提供属性/内容读取
// ==========================================

pub mod attributes;
pub mod node;

pub use attributes::{
    get_boolean_attribute, get_string_attribute, get_string_node_content, has_text,
    require_string_attribute,
};
pub use node::{XmlContent, XmlDocument, XmlNode, MAX_NESTING_DEPTH};
