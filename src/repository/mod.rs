// ==========================================
// MES 视图引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含解析逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod view_definition_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use view_definition_repo::{ViewDefinitionEntity, ViewDefinitionRepository};
