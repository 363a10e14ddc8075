// ==========================================
// MES 视图引擎 - 组件文案翻译
// ==========================================
// 文案来源: locales/*.yml（rust-i18n，lib.rs 中 i18n! 宏加载）
// 键格式: <plugin>.<view>.<component path>.label
// ==========================================

/// 当前进程默认语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换进程默认语言
///
/// 未收录的语言码被忽略并返回 false，保持原语言
pub fn set_locale(locale: &str) -> bool {
    let known = rust_i18n::available_locales!().iter().any(|l| *l == locale);
    if known {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!("未收录的语言: {}，保持 {}", locale, current_locale());
    }
    known
}

// ==========================================
// TranslationService Trait
// ==========================================
// 用途: 组件标签等文案按 (key, locale) 查找
pub trait TranslationService: Send + Sync {
    /// 翻译指定键
    ///
    /// # 返回
    /// - Some(String): 译文
    /// - None: 该语言下无此键
    fn translate(&self, key: &str, locale: &str) -> Option<String>;
}

/// 基于 rust-i18n 的翻译服务（读取 locales/*.yml）
#[derive(Debug, Clone, Copy, Default)]
pub struct RustI18nTranslationService;

impl TranslationService for RustI18nTranslationService {
    fn translate(&self, key: &str, locale: &str) -> Option<String> {
        let text = rust_i18n::t!(key, locale = locale).to_string();
        // 缺失时 rust-i18n 回显键本身
        if text == key || text == format!("{}.{}", locale, key) {
            None
        } else {
            Some(text)
        }
    }
}
