//! 请求期分发
//!
//! 给定请求模型和分组快照，决定实际发往上游的模型：
//! 1. 命中加权规则：在启用的目标中按权重挑选一个
//! 2. 命中别名表：沿别名链解析
//! 3. 都未命中：严格模式拒绝，否则原样透传
//!
//! 快照只借用不修改，规则路径上不分配内存。

use crate::chain::resolve_chain;
use crate::snapshot::RedirectSnapshot;
use modelmux_core::{
    select_by, DispatchError, DispatchResult, RedirectRule, RedirectTarget, SharedRng,
};
use tracing::{debug, warn};

/// 分发来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchSource {
    /// 未重定向
    Passthrough,
    /// 通过别名链重定向
    Alias,
    /// 通过加权规则重定向，`target` 为规则内目标下标
    Rule { target: usize },
}

/// 分发结果，模型名借用自快照或请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch<'a> {
    pub model: &'a str,
    pub source: DispatchSource,
}

impl<'a> Dispatch<'a> {
    fn passthrough(model: &'a str) -> Self {
        Self {
            model,
            source: DispatchSource::Passthrough,
        }
    }

    /// 是否发生了重定向
    pub fn is_redirected(&self) -> bool {
        !matches!(self.source, DispatchSource::Passthrough)
    }
}

/// 在规则中挑选一个目标
///
/// 只有一个目标且启用时总是选中它（权重缺省为 0 也一样）；
/// 否则按权重挑选，禁用目标权重视为 0。
pub fn pick_target(rule: &RedirectRule, rng: &SharedRng) -> Option<usize> {
    if let [only] = rule.targets.as_slice() {
        return only.is_enabled().then_some(0);
    }
    select_by(&rule.targets, RedirectTarget::effective_weight, rng)
}

/// 分发解析器，持有一次解析所需的快照与随机源引用
#[derive(Debug, Clone, Copy)]
pub struct DispatchResolver<'a> {
    snapshot: &'a RedirectSnapshot,
    rng: &'a SharedRng,
}

impl<'a> DispatchResolver<'a> {
    pub fn new(snapshot: &'a RedirectSnapshot, rng: &'a SharedRng) -> Self {
        Self { snapshot, rng }
    }

    /// 使用进程级默认随机源
    pub fn with_global_rng(snapshot: &'a RedirectSnapshot) -> Self {
        Self::new(snapshot, SharedRng::global())
    }

    /// 解析请求模型
    pub fn resolve(&self, requested: &'a str) -> DispatchResult<Dispatch<'a>> {
        if let Some(rule) = self.snapshot.rule(requested) {
            let Some(idx) = pick_target(rule, self.rng) else {
                return Err(DispatchError::NoEligibleTarget {
                    model: requested.to_string(),
                });
            };
            let model = rule.targets[idx].model.as_str();
            debug!(requested, resolved = model, target = idx, "规则重定向");
            return Ok(Dispatch {
                model,
                source: DispatchSource::Rule { target: idx },
            });
        }

        let resolved = resolve_chain(requested, self.snapshot.aliases.as_ref())?;
        if resolved.mapped {
            debug!(requested, resolved = resolved.model, "别名重定向");
            return Ok(Dispatch {
                model: resolved.model,
                source: DispatchSource::Alias,
            });
        }

        if self.snapshot.strict && !self.snapshot.covers(requested) {
            return Err(DispatchError::ModelNotAllowed {
                model: requested.to_string(),
            });
        }

        Ok(Dispatch::passthrough(requested))
    }

    /// 解析请求模型，没有可用目标时降级为原始模型
    pub fn resolve_or_fallback(&self, requested: &'a str) -> DispatchResult<Dispatch<'a>> {
        match self.resolve(requested) {
            Err(err) if err.is_recoverable() => {
                warn!(requested, "{}，降级为原始模型", err);
                Ok(Dispatch::passthrough(requested))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupRedirectConfig;
    use modelmux_core::{AliasMap, RedirectError, RuleSet};
    use serde_json::json;

    fn snapshot(rules: serde_json::Value, mapping: Option<&str>, strict: bool) -> RedirectSnapshot {
        GroupRedirectConfig {
            model_mapping: mapping.map(ToString::to_string),
            model_redirect_rules: Some(rules),
            model_redirect_strict: strict,
        }
        .prepare()
        .unwrap()
        .snapshot
    }

    #[test]
    fn test_passthrough_without_config() {
        let snap = RedirectSnapshot::default();
        let rng = SharedRng::seeded(1);
        let d = DispatchResolver::new(&snap, &rng).resolve("gpt-4").unwrap();
        assert_eq!(d.model, "gpt-4");
        assert!(!d.is_redirected());
    }

    #[test]
    fn test_single_zero_weight_target_always_selected() {
        let snap = snapshot(json!({"gpt-4": {"targets": [{"model": "gpt-4o"}]}}), None, false);
        let rng = SharedRng::seeded(1);
        let resolver = DispatchResolver::new(&snap, &rng);
        for _ in 0..50 {
            let d = resolver.resolve("gpt-4").unwrap();
            assert_eq!(d.model, "gpt-4o");
            assert_eq!(d.source, DispatchSource::Rule { target: 0 });
        }
    }

    #[test]
    fn test_disabled_targets_never_selected() {
        let snap = snapshot(
            json!({"gpt-4": {"targets": [
                {"model": "a", "weight": 100, "enabled": false},
                {"model": "b", "weight": 1},
                {"model": "c", "weight": 0}
            ]}}),
            None,
            false,
        );
        let rng = SharedRng::seeded(9);
        let resolver = DispatchResolver::new(&snap, &rng);
        for _ in 0..200 {
            assert_eq!(resolver.resolve("gpt-4").unwrap().model, "b");
        }
    }

    #[test]
    fn test_no_eligible_target() {
        let snap = snapshot(
            json!({"gpt-4": {"targets": [
                {"model": "a", "weight": 5, "enabled": false},
                {"model": "b"}
            ]}}),
            None,
            false,
        );
        let rng = SharedRng::seeded(1);
        let resolver = DispatchResolver::new(&snap, &rng);
        let err = resolver.resolve("gpt-4").unwrap_err();
        assert_eq!(
            err,
            DispatchError::NoEligibleTarget {
                model: "gpt-4".to_string()
            }
        );

        let d = resolver.resolve_or_fallback("gpt-4").unwrap();
        assert_eq!(d, Dispatch::passthrough("gpt-4"));
    }

    #[test]
    fn test_single_disabled_target_is_not_eligible() {
        let snap = snapshot(
            json!({"gpt-4": {"targets": [{"model": "a", "weight": 5, "enabled": false}]}}),
            None,
            false,
        );
        let rng = SharedRng::seeded(1);
        assert!(DispatchResolver::new(&snap, &rng).resolve("gpt-4").is_err());
    }

    #[test]
    fn test_rules_take_precedence_over_aliases() {
        let snap = snapshot(
            json!({"gpt-4": {"targets": [{"model": "from-rule", "weight": 1}]}}),
            Some("gpt-4:from-alias claude:claude-3 claude-3:claude-3-5"),
            false,
        );
        let rng = SharedRng::seeded(1);
        let resolver = DispatchResolver::new(&snap, &rng);
        assert_eq!(resolver.resolve("gpt-4").unwrap().model, "from-rule");

        let d = resolver.resolve("claude").unwrap();
        assert_eq!(d.model, "claude-3-5");
        assert_eq!(d.source, DispatchSource::Alias);
    }

    #[test]
    fn test_strict_mode() {
        let snap = snapshot(
            json!({"gpt-4": {"targets": [{"model": "x", "weight": 1}]}}),
            Some("same:same"),
            true,
        );
        let rng = SharedRng::seeded(1);
        let resolver = DispatchResolver::new(&snap, &rng);

        let err = resolver.resolve("unknown").unwrap_err();
        assert!(matches!(err, DispatchError::ModelNotAllowed { .. }));
        // 严格模式下的错误不可降级
        assert!(resolver.resolve_or_fallback("unknown").is_err());

        // 自映射的别名视为已配置
        let d = resolver.resolve("same").unwrap();
        assert_eq!(d, Dispatch::passthrough("same"));
    }

    #[test]
    fn test_unvalidated_alias_cycle_surfaces_as_config_error() {
        let aliases: AliasMap = [("a", "b"), ("b", "a")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let snap = RedirectSnapshot::new(Some(aliases), RuleSet::new(), false);
        let rng = SharedRng::seeded(1);
        let err = DispatchResolver::new(&snap, &rng).resolve("a").unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Config(RedirectError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_weighted_rule_distribution() {
        let snap = snapshot(
            json!({"gpt-4": {"targets": [
                {"model": "a", "weight": 1},
                {"model": "b", "weight": 3}
            ]}}),
            None,
            false,
        );
        let rng = SharedRng::seeded(77);
        let resolver = DispatchResolver::new(&snap, &rng);
        let mut b = 0;
        for _ in 0..4000 {
            if resolver.resolve("gpt-4").unwrap().model == "b" {
                b += 1;
            }
        }
        assert!((2700..3300).contains(&b), "b selected {b} times");
    }
}
