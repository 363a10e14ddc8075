// ==========================================
// MES 视图引擎 - 加载器主入口
// ==========================================
// 用法: mes-view-loader [配置文件.json]
// 说明: 业务钩子由宿主进程注册；独立运行时钩子表为空，
//       引用钩子的文档会被判定为解析失败并在汇总中列出
// ==========================================

use anyhow::Context;
use mes_view::{
    i18n, logging, DefaultViewDefinitionService, HookFactory, InMemoryDataDefinitionService,
    RustI18nTranslationService, ViewComponentsResolver, ViewDefinitionParser,
    ViewDefinitionService, ViewDocumentLoader, ViewLoaderConfig,
};
use mes_view::repository::ViewDefinitionRepository;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ViewLoaderConfig::load(config_path.as_deref())
        .map_err(|e| anyhow::anyhow!("配置加载失败: {}", e))?;

    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", mes_view::APP_NAME);
    tracing::info!("系统版本: {}", mes_view::VERSION);
    tracing::info!("==================================================");

    i18n::set_locale(&config.default_locale);

    let service: Arc<DefaultViewDefinitionService> = if config.persist {
        let db_path = config.resolved_db_path();
        tracing::info!("使用数据库: {}", db_path);
        let repository = ViewDefinitionRepository::new(&db_path)
            .with_context(|| format!("无法打开视图定义数据库: {}", db_path))?;
        Arc::new(DefaultViewDefinitionService::with_repository(repository))
    } else {
        Arc::new(DefaultViewDefinitionService::in_memory())
    };

    let parser = ViewDefinitionParser::new(
        Arc::new(InMemoryDataDefinitionService::new()),
        Arc::new(HookFactory::new()),
        Arc::new(ViewComponentsResolver::with_defaults()),
        Arc::new(RustI18nTranslationService),
    )
    .with_root_component_type(config.root_component_type.clone());

    let loader = ViewDocumentLoader::new(Arc::new(parser), service.clone(), config);
    let report = loader.load_all();

    for view in service.list() {
        println!(
            "{}\t{} 个组件\t菜单可见={}",
            view.key(),
            view.components().len(),
            view.is_menu_accessible()
        );
    }
    for failure in &report.failures {
        eprintln!("[{:?}] {}: {}", failure.kind, failure.path.display(), failure.message);
    }

    println!(
        "文档 {} 个，注册视图 {} 个，失败文档 {} 个",
        report.documents,
        report.registered.len(),
        report.failures.len()
    );

    Ok(())
}
