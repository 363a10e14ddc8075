// ==========================================
// MES 视图引擎 - 仓储层错误类型
// ==========================================

use thiserror::Error;

/// 视图定义仓储错误
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("视图定义数据库连接不可用: {0}")]
    LockError(String),

    #[error("视图定义保存事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("视图定义查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("视图定义数据库约束违反: {0}")]
    ConstraintViolation(String),

    #[error("视图定义快照序列化失败: {0}")]
    SerializationError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RepositoryError::ConstraintViolation(msg.unwrap_or_else(|| code.to_string()))
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
