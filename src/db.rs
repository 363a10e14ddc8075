// ==========================================
// MES 视图引擎 - SQLite 连接初始化
// ==========================================
// 视图定义库为单写者（加载批次）多读者，使用 WAL 日志模式
// ==========================================

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// 加载批次写入时的 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 对每个新连接应用的 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    // 内存库返回 "memory"
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

/// 打开视图定义数据库，必要时创建所在目录
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("无法创建数据库目录 {}: {}", parent.display(), e);
            }
        }
    }
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库（测试与不落盘场景）
pub fn open_in_memory_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}
