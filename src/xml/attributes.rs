// ==========================================
// MES 视图引擎 - 节点属性读取
// ==========================================
// 职责: 从通用 XML 节点读取字符串/布尔属性与文本内容
// 约束: 无状态纯函数
// ==========================================

use crate::view::error::{ViewParseError, ViewParseResult};
use crate::xml::node::{XmlContent, XmlNode};

/// 读取字符串属性（不存在返回 None）
pub fn get_string_attribute<'a>(node: &'a XmlNode, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// 读取必需的字符串属性
///
/// # 错误
/// - 属性缺失或仅含空白 → MissingAttribute
pub fn require_string_attribute<'a>(node: &'a XmlNode, name: &str) -> ViewParseResult<&'a str> {
    match node.attribute(name) {
        Some(value) if has_text(Some(value)) => Ok(value),
        _ => Err(ViewParseError::MissingAttribute {
            element: node.name().to_string(),
            attribute: name.to_string(),
        }),
    }
}

/// 读取布尔属性
///
/// 宽松解析：仅 "true"（忽略大小写）为 true，其余取值均为 false；
/// 属性不存在时返回 default_value
pub fn get_boolean_attribute(node: &XmlNode, name: &str, default_value: bool) -> bool {
    match node.attribute(name) {
        Some(value) => value.eq_ignore_ascii_case("true"),
        None => default_value,
    }
}

/// 读取节点文本内容
///
/// 仅拼接直接的文本与 CDATA 子节点（忽略子元素与注释），结果去除首尾空白
pub fn get_string_node_content(node: &XmlNode) -> String {
    let mut content = String::new();
    for child in node.children() {
        match child {
            XmlContent::Text(text) | XmlContent::CData(text) => content.push_str(text),
            XmlContent::Element(_) | XmlContent::Comment(_) => {}
        }
    }
    content.trim().to_string()
}

/// 是否包含非空白字符
pub fn has_text(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}
