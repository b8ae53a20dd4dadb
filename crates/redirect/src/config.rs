//! 分组重定向配置与写入路径
//!
//! 管理接口创建/更新分组时调用 `prepare`：迁移旧格式、校验别名环、
//! 合并规则、校验规则环。任何一步失败都拒绝整次写入，不产生部分结果。

use crate::chain::validate_alias_map;
use crate::merge::{canonicalize_rules, decode_rule_set};
use crate::migrate::{alias_map_to_json, migrate_legacy_mapping};
use crate::snapshot::RedirectSnapshot;
use crate::validate::validate_rule_set;
use modelmux_core::{RedirectResult, RuleSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 分组的重定向配置（管理接口提交的原始形式）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRedirectConfig {
    /// 旧版 `from:to` 文本，或别名 JSON 对象字符串
    #[serde(default, alias = "modelMapping", skip_serializing_if = "Option::is_none")]
    pub model_mapping: Option<String>,
    /// 重定向规则对象，也接受存储层保存的 JSON 字符串
    #[serde(
        default,
        alias = "modelRedirectRules",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_redirect_rules: Option<Value>,
    /// 严格模式
    #[serde(default, alias = "modelRedirectStrict")]
    pub model_redirect_strict: bool,
}

/// 校验通过的配置：运行时快照 + 持久化用的规范 JSON
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRedirect {
    pub snapshot: RedirectSnapshot,
    /// 别名表的规范 JSON，旧文本格式不会回写
    pub model_mapping: Option<String>,
    /// 合并后的规则 JSON
    pub model_redirect_rules: Option<String>,
}

impl GroupRedirectConfig {
    /// 写入路径：迁移、合并、校验，生成不可变快照
    pub fn prepare(&self) -> RedirectResult<PreparedRedirect> {
        let aliases = match self.model_mapping.as_deref() {
            Some(text) => migrate_legacy_mapping(text)?,
            None => None,
        };
        if let Some(map) = aliases.as_ref() {
            validate_alias_map(map)?;
        }

        let rules = match &self.model_redirect_rules {
            None | Some(Value::Null) => RuleSet::new(),
            Some(Value::String(raw)) => decode_rule_set(raw)?,
            Some(value) => canonicalize_rules(serde_json::from_value(value.clone())?),
        };
        validate_rule_set(&rules)?;

        let model_mapping = aliases.as_ref().map(alias_map_to_json).transpose()?;
        let model_redirect_rules = if rules.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&rules)?)
        };

        Ok(PreparedRedirect {
            snapshot: RedirectSnapshot::new(aliases, rules, self.model_redirect_strict),
            model_mapping,
            model_redirect_rules,
        })
    }
}

impl PreparedRedirect {
    /// 转回可持久化的配置形式（规范化后）
    pub fn canonical_config(&self) -> RedirectResult<GroupRedirectConfig> {
        let model_redirect_rules = if self.snapshot.rules.is_empty() {
            None
        } else {
            Some(serde_json::to_value(&self.snapshot.rules)?)
        };
        Ok(GroupRedirectConfig {
            model_mapping: self.model_mapping.clone(),
            model_redirect_rules,
            model_redirect_strict: self.snapshot.strict,
        })
    }
}
