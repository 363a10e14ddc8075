// ==========================================
// MES 视图引擎 - 加载器配置
// ==========================================
// 来源优先级: 环境变量 > JSON 配置文件 > 默认值
// 环境变量:
// - MES_VIEW_ROOTS:   视图根目录列表（按平台路径分隔符分隔）
// - MES_VIEW_DB_PATH: 视图定义数据库路径
// - MES_VIEW_LOG_FORMAT: 日志格式（text / json）
// ==========================================

use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};

pub const ENV_VIEW_ROOTS: &str = "MES_VIEW_ROOTS";
pub const ENV_DB_PATH: &str = "MES_VIEW_DB_PATH";
pub const ENV_LOG_FORMAT: &str = "MES_VIEW_LOG_FORMAT";

/// 视图加载器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewLoaderConfig {
    /// 视图根目录（各插件的资源根）
    pub view_roots: Vec<PathBuf>,

    /// 根目录下存放视图文档的子目录
    pub document_dir: String,

    /// 视图文档扩展名
    pub document_extension: String,

    /// 唯一合法的根组件类型
    pub root_component_type: String,

    /// 视图定义数据库路径（None 时使用用户数据目录）
    pub db_path: Option<String>,

    /// 是否持久化已注册视图
    pub persist: bool,

    /// 默认语言
    pub default_locale: String,

    /// 日志格式
    pub log_format: LogFormat,
}

impl Default for ViewLoaderConfig {
    fn default() -> Self {
        Self {
            view_roots: vec![PathBuf::from(".")],
            document_dir: "view".to_string(),
            document_extension: "xml".to_string(),
            root_component_type: "window".to_string(),
            db_path: None,
            persist: true,
            default_locale: "zh-CN".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl ViewLoaderConfig {
    /// 从 JSON 文件读取配置（缺省字段取默认值）
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config: ViewLoaderConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// 加载配置：可选 JSON 文件 + 环境变量覆写
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let mut config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// 应用环境变量覆写（空值忽略）
    pub fn apply_env_overrides(&mut self) {
        if let Some(roots) = std::env::var_os(ENV_VIEW_ROOTS) {
            let roots: Vec<PathBuf> = std::env::split_paths(&roots)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if !roots.is_empty() {
                self.view_roots = roots;
            }
        }

        if let Ok(path) = std::env::var(ENV_DB_PATH) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                self.db_path = Some(trimmed.to_string());
            }
        }

        if let Ok(format) = std::env::var(ENV_LOG_FORMAT) {
            self.log_format = LogFormat::parse(&format);
        }
    }

    /// 视图定义数据库路径
    ///
    /// 未配置时使用用户数据目录下的 mes-view/views.db
    pub fn resolved_db_path(&self) -> String {
        if let Some(path) = &self.db_path {
            return path.clone();
        }

        let mut path = PathBuf::from("./mes_view.db");

        if let Some(data_dir) = dirs::data_dir() {
            let app_dir = data_dir.join("mes-view");
            match std::fs::create_dir_all(&app_dir) {
                Ok(()) => path = app_dir.join("views.db"),
                Err(e) => tracing::warn!("无法创建数据目录 {}，使用当前目录: {}", app_dir.display(), e),
            }
        }

        path.to_string_lossy().to_string()
    }
}
