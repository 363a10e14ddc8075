// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 级别: RUST_LOG 环境变量，缺省 info
// 格式: 由加载配置的 log_format 决定（text / json）
// ==========================================

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// 日志输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// 人读格式，带目标模块与行号
    #[default]
    Text,
    /// 单行 JSON，供日志采集
    Json,
}

impl LogFormat {
    /// 宽松解析：仅 "json"（不区分大小写）视为 Json
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化日志系统
///
/// # 示例
/// ```no_run
/// use mes_view::logging::{self, LogFormat};
/// logging::init(LogFormat::Text);
/// ```
pub fn init(format: LogFormat) {
    match format {
        LogFormat::Text => fmt()
            .with_env_filter(default_filter())
            .with_target(true)
            .with_line_number(true)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(default_filter())
            .with_target(true)
            .init(),
    }
}

/// 初始化测试环境的日志系统（debug 级别，可重复调用）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
