//! 分组重定向快照
//!
//! 写入路径校验通过后生成，之后只读。修改（包括健康检查翻转启用状态）
//! 一律生成新快照，不在原快照上原地修改。

use modelmux_core::{AliasMap, RedirectRule, RuleSet};

/// 单个分组的重定向配置快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectSnapshot {
    /// 旧版别名表
    pub aliases: Option<AliasMap>,
    /// 加权重定向规则
    pub rules: RuleSet,
    /// 严格模式：未配置的模型直接拒绝
    pub strict: bool,
}

impl RedirectSnapshot {
    pub fn new(aliases: Option<AliasMap>, rules: RuleSet, strict: bool) -> Self {
        Self {
            aliases,
            rules,
            strict,
        }
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.as_ref().map_or(0, |m| m.len())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule(&self, model: &str) -> Option<&RedirectRule> {
        self.rules.get(model)
    }

    /// 请求模型是否被别名表或规则集覆盖
    pub fn covers(&self, model: &str) -> bool {
        self.rules.contains_key(model)
            || self
                .aliases
                .as_ref()
                .is_some_and(|m| m.contains_key(model))
    }

    /// 复制一份并修改指定目标的启用状态；规则或目标不存在时返回 `None`
    pub fn with_target_enabled(&self, from: &str, model: &str, enabled: bool) -> Option<Self> {
        if !self.rules.get(from)?.targets.iter().any(|t| t.model == model) {
            return None;
        }
        let mut next = self.clone();
        let target = next.rules.get_mut(from)?.target_mut(model)?;
        target.enabled = Some(enabled);
        Some(next)
    }
}
