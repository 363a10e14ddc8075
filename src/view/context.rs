// ==========================================
// MES 视图引擎 - 解析上下文
// ==========================================
// 职责: 单个视图解析过程中的全部可变状态
// - 序号分配器（每个视图从 1 开始）
// - 构建中的组件树
// - 当前组件嵌套深度（递归解析的上限）
// 约束: 上下文随调用链显式传递，解析器本身无可变状态
// ==========================================

use crate::domain::component_tree::ComponentTree;
use crate::domain::types::ViewKey;
use crate::view::error::{ViewParseError, ViewParseResult};

/// 组件最大嵌套层数（根组件为第 1 层）
pub const MAX_COMPONENT_DEPTH: usize = 64;

/// 组件序号分配器
///
/// 非线程安全：一个上下文只属于一次视图解析
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexAllocator {
    next: u32,
}

impl IndexAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// 返回当前序号并自增
    pub fn next_index(&mut self) -> u32 {
        let index = self.next;
        self.next += 1;
        index
    }
}

impl Default for IndexAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// 单视图解析上下文
#[derive(Debug)]
pub struct ParseContext {
    view: ViewKey,
    indexes: IndexAllocator,
    tree: ComponentTree,
    depth: usize,
}

impl ParseContext {
    pub fn new(view: ViewKey) -> Self {
        Self {
            view,
            indexes: IndexAllocator::new(),
            tree: ComponentTree::new(),
            depth: 0,
        }
    }

    pub fn view(&self) -> &ViewKey {
        &self.view
    }

    pub fn next_index(&mut self) -> u32 {
        self.indexes.next_index()
    }

    /// 进入下一层组件
    ///
    /// # 错误
    /// - 超过 MAX_COMPONENT_DEPTH → NestingTooDeep（深度不变）
    pub fn enter_component(&mut self) -> ViewParseResult<()> {
        if self.depth >= MAX_COMPONENT_DEPTH {
            return Err(ViewParseError::NestingTooDeep {
                view: self.view.to_string(),
                limit: MAX_COMPONENT_DEPTH,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave_component(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    pub fn into_tree(self) -> ComponentTree {
        self.tree
    }
}
