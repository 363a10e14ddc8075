// ==========================================
// MES 视图引擎 - 组件树（arena 存储）
// ==========================================
// 约束:
// - 组件按构造顺序存入 arena，即深度优先的文档顺序
// - 子组件由树持有，父链接仅为句柄
// - 同一父组件下的组件名唯一
// ==========================================

use crate::domain::component::ComponentPattern;
use crate::domain::types::ComponentId;
use crate::view::error::{ViewParseError, ViewParseResult};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentTree {
    nodes: Vec<ComponentPattern>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// 下一个插入组件将获得的句柄
    pub fn next_id(&self) -> ComponentId {
        ComponentId(self.nodes.len())
    }

    /// 插入组件；若有父组件，同时挂接为其子组件
    pub fn insert(&mut self, pattern: ComponentPattern) -> ViewParseResult<ComponentId> {
        let id = self.next_id();
        if pattern.id() != id {
            return Err(ViewParseError::InvalidComponentHandle(pattern.id().as_usize()));
        }

        if let Some(parent_id) = pattern.parent() {
            let parent = self.get(parent_id)?;
            if let Some(name) = pattern.name() {
                let duplicated = parent
                    .children()
                    .iter()
                    .filter_map(|child| self.nodes.get(child.as_usize()))
                    .any(|sibling| sibling.name() == Some(name));
                if duplicated {
                    return Err(ViewParseError::DuplicateComponentName {
                        view: pattern.definition().view.to_string(),
                        name: name.to_string(),
                    });
                }
            }
            self.get_mut(parent_id)?.push_child(id);
        }

        self.nodes.push(pattern);
        Ok(id)
    }

    pub fn get(&self, id: ComponentId) -> ViewParseResult<&ComponentPattern> {
        self.nodes
            .get(id.as_usize())
            .ok_or(ViewParseError::InvalidComponentHandle(id.as_usize()))
    }

    pub fn get_mut(&mut self, id: ComponentId) -> ViewParseResult<&mut ComponentPattern> {
        self.nodes
            .get_mut(id.as_usize())
            .ok_or(ViewParseError::InvalidComponentHandle(id.as_usize()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 全部组件（深度优先文档顺序）
    pub fn iter(&self) -> impl Iterator<Item = &ComponentPattern> {
        self.nodes.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ComponentPattern> {
        self.nodes.iter_mut()
    }

    /// 从指定组件开始的深度优先遍历
    pub fn depth_first(&self, start: ComponentId) -> Vec<ComponentId> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.as_usize()) else {
                continue;
            };
            order.push(id);
            stack.extend(node.children().iter().rev().copied());
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::{ComponentDefinition, ComponentKind, InputKind};
    use crate::domain::types::ViewKey;
    use crate::i18n::RustI18nTranslationService;
    use std::sync::Arc;

    fn definition(name: Option<&str>, parent: Option<ComponentId>) -> ComponentDefinition {
        ComponentDefinition {
            name: name.map(str::to_string),
            field_path: None,
            source_field_path: None,
            parent,
            view: ViewKey::new("basic", "main"),
            reference: None,
            default_enabled: true,
            default_visible: true,
            has_description: false,
            translation_service: Arc::new(RustI18nTranslationService),
        }
    }

    fn field(id: usize, name: Option<&str>, parent: usize) -> ComponentPattern {
        ComponentPattern::new(
            ComponentId(id),
            id as u32 + 1,
            "field",
            definition(name, Some(ComponentId(parent))),
            ComponentKind::Field {
                input: InputKind::Text,
            },
        )
    }

    fn window() -> ComponentPattern {
        ComponentPattern::new(
            ComponentId(0),
            1,
            "window",
            definition(Some("window"), None),
            ComponentKind::Window {
                header: true,
                fixed_height: false,
            },
        )
    }

    #[test]
    fn test_insert_links_children() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(window()).unwrap();
        let a = tree.insert(field(1, Some("a"), 0)).unwrap();
        let b = tree.insert(field(2, Some("b"), 0)).unwrap();

        assert_eq!(tree.get(root).unwrap().children(), &[a, b]);
        assert_eq!(tree.get(a).unwrap().parent(), Some(root));
        assert_eq!(tree.depth_first(root), vec![root, a, b]);
    }

    #[test]
    fn test_duplicate_sibling_name_rejected() {
        let mut tree = ComponentTree::new();
        tree.insert(window()).unwrap();
        tree.insert(field(1, Some("qty"), 0)).unwrap();

        let err = tree.insert(field(2, Some("qty"), 0)).unwrap_err();
        assert!(matches!(err, ViewParseError::DuplicateComponentName { ref name, .. } if name == "qty"));
    }

    #[test]
    fn test_unnamed_siblings_allowed() {
        let mut tree = ComponentTree::new();
        tree.insert(window()).unwrap();
        tree.insert(field(1, None, 0)).unwrap();
        assert!(tree.insert(field(2, None, 0)).is_ok());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut tree = ComponentTree::new();
        tree.insert(window()).unwrap();
        let err = tree.insert(field(1, Some("x"), 7)).unwrap_err();
        assert!(matches!(err, ViewParseError::InvalidComponentHandle(7)));
    }
}
