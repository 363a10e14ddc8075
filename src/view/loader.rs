// ==========================================
// MES 视图引擎 - 视图文档加载器
// ==========================================
// 职责: 发现 <root>/<document_dir>/*.<ext> 文档，逐个解析并注册
// 失败隔离:
// - 文档读取失败: 记录并跳过，继续加载
// - 文档解析失败: 中止该文档（其视图均不注册），继续加载下一个
// ==========================================

use crate::config::ViewLoaderConfig;
use crate::domain::types::ViewKey;
use crate::view::error::{ViewParseError, ViewParseResult};
use crate::view::parser::ViewDefinitionParser;
use crate::view::registry::ViewDefinitionService;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;
use walkdir::WalkDir;

/// 文档失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentFailureKind {
    /// 文档不可读
    Resource,
    /// 文档格式/结构/引用错误
    Parse,
}

/// 单个文档的失败记录
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub kind: DocumentFailureKind,
    pub message: String,
}

/// 一次加载的结果汇总
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub batch_id: String,
    pub documents: usize,
    pub registered: Vec<ViewKey>,
    pub failures: Vec<DocumentFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct ViewDocumentLoader {
    parser: Arc<ViewDefinitionParser>,
    service: Arc<dyn ViewDefinitionService>,
    config: ViewLoaderConfig,
}

impl ViewDocumentLoader {
    pub fn new(
        parser: Arc<ViewDefinitionParser>,
        service: Arc<dyn ViewDefinitionService>,
        config: ViewLoaderConfig,
    ) -> Self {
        Self {
            parser,
            service,
            config,
        }
    }

    /// 发现全部视图文档（各根目录内按文件名排序）
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut documents = Vec::new();

        for root in &self.config.view_roots {
            let dir = root.join(&self.config.document_dir);
            if !dir.is_dir() {
                tracing::debug!(path = %dir.display(), "视图目录不存在，跳过");
                continue;
            }

            let entries = WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name();

            for entry in entries {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && self.is_view_document(entry.path()) => {
                        documents.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(path = %dir.display(), "视图目录遍历失败: {}", e),
                }
            }
        }

        documents
    }

    fn is_view_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(&self.config.document_extension))
            .unwrap_or(false)
    }

    /// 加载全部视图文档
    pub fn load_all(&self) -> LoadReport {
        let batch_id = Uuid::new_v4().to_string();
        tracing::info!(batch_id = %batch_id, "正在读取视图定义 ...");

        let documents = self.discover();
        tracing::info!(count = documents.len(), "发现视图文档");

        let mut report = LoadReport {
            batch_id: batch_id.clone(),
            documents: documents.len(),
            registered: Vec::new(),
            failures: Vec::new(),
        };

        for path in documents {
            tracing::info!(path = %path.display(), "正在加载视图文档");
            match self.load_document(&path, &batch_id) {
                Ok(keys) => report.registered.extend(keys),
                Err(e) if e.is_resource_error() => {
                    tracing::error!(path = %path.display(), "视图文档读取失败，已跳过: {}", e);
                    report.failures.push(DocumentFailure {
                        path,
                        kind: DocumentFailureKind::Resource,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), "视图文档解析失败，已中止该文档: {}", e);
                    report.failures.push(DocumentFailure {
                        path,
                        kind: DocumentFailureKind::Parse,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            batch_id = %batch_id,
            registered = report.registered.len(),
            failed = report.failures.len(),
            "视图定义加载完成"
        );
        report
    }

    /// 加载单个文档：解析全部视图后整体注册
    ///
    /// 文档先整体读入内存，I/O 错误只会出现在读取阶段
    pub fn load_document(&self, path: &Path, load_batch_id: &str) -> ViewParseResult<Vec<ViewKey>> {
        let content = std::fs::read(path).map_err(|e| ViewParseError::ResourceRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let views = self.parser.parse_reader(content.as_slice())?;
        self.service.register_all(views, load_batch_id)
    }
}
