// ==========================================
// MES 视图引擎 - 组件配置记录构建
// ==========================================
// 职责: 节点属性 + 所属视图 + 翻译服务 → ComponentDefinition
// 默认值: defaultEnabled=true, defaultVisible=true, hasDescription=false
// ==========================================

use crate::domain::component::ComponentDefinition;
use crate::domain::types::{ComponentId, ViewKey};
use crate::i18n::TranslationService;
use crate::xml::{get_boolean_attribute, get_string_attribute, XmlNode};
use std::sync::Arc;

pub struct ComponentDefinitionBuilder<'a> {
    view: &'a ViewKey,
    translation_service: &'a Arc<dyn TranslationService>,
}

impl<'a> ComponentDefinitionBuilder<'a> {
    pub fn new(view: &'a ViewKey, translation_service: &'a Arc<dyn TranslationService>) -> Self {
        Self {
            view,
            translation_service,
        }
    }

    pub fn build(&self, node: &XmlNode, parent: Option<ComponentId>) -> ComponentDefinition {
        let owned = |name: &str| get_string_attribute(node, name).map(str::to_string);

        ComponentDefinition {
            name: owned("name"),
            field_path: owned("field"),
            source_field_path: owned("source"),
            parent,
            view: self.view.clone(),
            reference: owned("reference"),
            default_enabled: get_boolean_attribute(node, "defaultEnabled", true),
            default_visible: get_boolean_attribute(node, "defaultVisible", true),
            has_description: get_boolean_attribute(node, "hasDescription", false),
            translation_service: Arc::clone(self.translation_service),
        }
    }
}
