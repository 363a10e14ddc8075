// ==========================================
// MES 视图引擎 - 通用 XML 节点树
// ==========================================
// 职责: 将 quick-xml 事件流构建为可遍历的节点树
// 说明: 保留文本 / CDATA / 注释子节点，供内容提取区分节点类型
// ==========================================

use crate::view::error::{ViewParseError, ViewParseResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

/// 元素最大嵌套层数（含根元素）
pub const MAX_NESTING_DEPTH: usize = 256;

/// 节点内容（元素或字符数据）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlContent {
    Element(XmlNode),
    Text(String),
    CData(String),
    Comment(String),
}

/// XML 元素节点
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlContent>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    // ===== 构建方法（测试与程序化构造） =====

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(XmlContent::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlContent::Text(text.into()));
        self
    }

    pub fn with_cdata(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlContent::CData(text.into()));
        self
    }

    // ===== 访问方法 =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 属性列表（文档顺序）
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[XmlContent] {
        &self.children
    }

    /// 直接子元素（文档顺序，跳过文本/注释）
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter_map(|child| match child {
            XmlContent::Element(node) => Some(node),
            _ => None,
        })
    }
}

/// 已解析的 XML 文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlNode,
}

impl XmlDocument {
    pub fn parse_str(xml: &str) -> ViewParseResult<Self> {
        Self::from_reader(xml.as_bytes())
    }

    /// 从字节流解析文档
    ///
    /// # 错误
    /// - 语法错误、标签不匹配、未闭合元素、无根元素 → MalformedDocument
    pub fn from_reader<R: BufRead>(source: R) -> ViewParseResult<Self> {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(false);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                ViewParseError::MalformedDocument(format!(
                    "位置 {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(ref e) => {
                    check_depth(stack.len())?;
                    stack.push(element_from_start(e)?);
                }
                Event::Empty(ref e) => {
                    check_depth(stack.len())?;
                    let node = element_from_start(e)?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or_else(|| {
                        ViewParseError::MalformedDocument("多余的结束标签".to_string())
                    })?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(ref t) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = t.unescape()?;
                        parent.children.push(XmlContent::Text(text.into_owned()));
                    }
                }
                Event::CData(t) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = std::str::from_utf8(&t.into_inner())?.to_string();
                        parent.children.push(XmlContent::CData(text));
                    }
                }
                Event::Comment(ref t) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = std::str::from_utf8(t)?;
                        parent.children.push(XmlContent::Comment(text.to_string()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(ViewParseError::MalformedDocument(format!(
                "元素未闭合: <{}>",
                open.name
            )));
        }

        root.map(|root| Self { root })
            .ok_or_else(|| ViewParseError::MalformedDocument("文档没有根元素".to_string()))
    }

    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    pub fn into_root(self) -> XmlNode {
        self.root
    }
}

/// 新元素将位于 open + 1 层
fn check_depth(open: usize) -> ViewParseResult<()> {
    if open >= MAX_NESTING_DEPTH {
        return Err(ViewParseError::MalformedDocument(format!(
            "元素嵌套超过 {} 层",
            MAX_NESTING_DEPTH
        )));
    }
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> ViewParseResult<XmlNode> {
    let name = std::str::from_utf8(start.local_name().as_ref())?.to_string();
    let mut node = XmlNode::new(name);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
        let value = attribute.unescape_value()?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> ViewParseResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlContent::Element(node)),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(ViewParseError::MalformedDocument(format!(
                "文档存在多个根元素: <{}>",
                node.name
            )))
        }
    }
    Ok(())
}
