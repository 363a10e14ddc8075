// ==========================================
// MES 视图引擎 - 视图定义仓储
// ==========================================
// 职责: 管理 view_definition 表 (按 插件+视图名)
// 说明: 组件树与钩子以 JSON 快照存储；同一文档的视图在单个事务内写入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::ViewKey;
use crate::domain::view::ViewDefinition;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 视图定义持久化实体
#[derive(Debug, Clone)]
pub struct ViewDefinitionEntity {
    pub plugin_identifier: String,   // 插件标识
    pub view_name: String,           // 视图名
    pub model_name: Option<String>,  // 绑定的数据模型
    pub menu_accessible: bool,       // 是否可从菜单访问
    pub component_count: i64,        // 组件数量
    pub definition_json: String,     // 组件树 + 钩子 JSON 快照
    pub load_batch_id: String,       // 加载批次ID (UUID)
    pub saved_at: String,            // 保存时间
}

impl ViewDefinitionEntity {
    /// 从视图定义创建实体（自动生成时间戳）
    pub fn from_view(view: &ViewDefinition, load_batch_id: &str) -> RepositoryResult<Self> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        Ok(Self {
            plugin_identifier: view.plugin_identifier().to_string(),
            view_name: view.name().to_string(),
            model_name: view.data_definition().map(|d| d.name.clone()),
            menu_accessible: view.is_menu_accessible(),
            component_count: view.components().len() as i64,
            definition_json: serde_json::to_string(view)?,
            load_batch_id: load_batch_id.to_string(),
            saved_at: now,
        })
    }

    pub fn key(&self) -> ViewKey {
        ViewKey::new(&self.plugin_identifier, &self.view_name)
    }
}

pub struct ViewDefinitionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ViewDefinitionRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS view_definition (
              plugin_identifier TEXT NOT NULL,
              view_name TEXT NOT NULL,
              model_name TEXT,
              menu_accessible INTEGER NOT NULL DEFAULT 0,
              component_count INTEGER NOT NULL DEFAULT 0,
              definition_json TEXT NOT NULL,
              load_batch_id TEXT NOT NULL,
              saved_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (plugin_identifier, view_name)
            );

            CREATE INDEX IF NOT EXISTS idx_view_definition_batch
              ON view_definition(load_batch_id);
            "#,
        )?;
        Ok(())
    }

    /// 保存单个视图（Upsert）
    pub fn save(&self, view: &ViewDefinition, load_batch_id: &str) -> RepositoryResult<()> {
        self.save_all(std::slice::from_ref(view), load_batch_id)
            .map(|_| ())
    }

    /// 在单个事务内保存一批视图（同一文档）
    ///
    /// 任一写入失败则整体回滚
    pub fn save_all(&self, views: &[ViewDefinition], load_batch_id: &str) -> RepositoryResult<usize> {
        let entities = views
            .iter()
            .map(|view| ViewDefinitionEntity::from_view(view, load_batch_id))
            .collect::<RepositoryResult<Vec<_>>>()?;

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        for entity in &entities {
            tx.execute(
                r#"
                INSERT INTO view_definition (
                    plugin_identifier,
                    view_name,
                    model_name,
                    menu_accessible,
                    component_count,
                    definition_json,
                    load_batch_id,
                    saved_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(plugin_identifier, view_name) DO UPDATE SET
                    model_name = excluded.model_name,
                    menu_accessible = excluded.menu_accessible,
                    component_count = excluded.component_count,
                    definition_json = excluded.definition_json,
                    load_batch_id = excluded.load_batch_id,
                    saved_at = excluded.saved_at
                "#,
                params![
                    entity.plugin_identifier,
                    entity.view_name,
                    entity.model_name,
                    entity.menu_accessible,
                    entity.component_count,
                    entity.definition_json,
                    entity.load_batch_id,
                    entity.saved_at,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(entities.len())
    }

    /// 按主键查找视图
    pub fn find(
        &self,
        plugin_identifier: &str,
        view_name: &str,
    ) -> RepositoryResult<Option<ViewDefinitionEntity>> {
        let conn = self.get_conn()?;
        let entity = conn
            .query_row(
                r#"
                SELECT
                    plugin_identifier,
                    view_name,
                    model_name,
                    menu_accessible,
                    component_count,
                    definition_json,
                    load_batch_id,
                    saved_at
                FROM view_definition
                WHERE plugin_identifier = ?1 AND view_name = ?2
                "#,
                params![plugin_identifier, view_name],
                |row| {
                    Ok(ViewDefinitionEntity {
                        plugin_identifier: row.get(0)?,
                        view_name: row.get(1)?,
                        model_name: row.get(2)?,
                        menu_accessible: row.get(3)?,
                        component_count: row.get(4)?,
                        definition_json: row.get(5)?,
                        load_batch_id: row.get(6)?,
                        saved_at: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(entity)
    }

    /// 全部视图主键（按插件、视图名排序）
    pub fn list_keys(&self) -> RepositoryResult<Vec<ViewKey>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT plugin_identifier, view_name FROM view_definition ORDER BY plugin_identifier, view_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ViewKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM view_definition", [], |row| row.get(0))?;
        Ok(count)
    }
}
