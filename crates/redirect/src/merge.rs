//! 重定向规则规范化与合并
//!
//! 导入配置时把规则集整理为规范形式：
//! - from key 去除首尾空白，空 key 丢弃
//! - 规范化后相同的 key 合并目标列表（`"gpt-4"` 与 `" gpt-4 "`）
//! - 目标模型名去除首尾空白，空模型名丢弃
//! - 同一 key 下按模型名去重，保留第一次出现的目标（权重、启用状态随之保留）
//! - 没有剩余目标的 key 整体移除
//!
//! 合并顺序：原始 key 按字典序累积。例如 `" gpt-4 "` 排在 `"gpt-4"` 之前，
//! 两者有同名目标时以 `" gpt-4 "` 中的为准。

use modelmux_core::{RedirectResult, RedirectRule, RedirectTarget, RuleSet};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// 规范化规则 JSON，返回规范化后的 JSON
///
/// 空输入或空对象原样返回。
pub fn merge_redirect_rules(raw: &str) -> RedirectResult<String> {
    if raw.trim().is_empty() {
        return Ok(raw.to_string());
    }

    let decoded: RuleSet = serde_json::from_str(raw)?;
    if decoded.is_empty() {
        return Ok(raw.to_string());
    }

    let canonical = canonicalize_rules(decoded);
    Ok(serde_json::to_string(&canonical)?)
}

/// 解析并规范化规则 JSON，空输入得到空规则集
pub fn decode_rule_set(raw: &str) -> RedirectResult<RuleSet> {
    if raw.trim().is_empty() {
        return Ok(RuleSet::new());
    }
    let decoded: RuleSet = serde_json::from_str(raw)?;
    Ok(canonicalize_rules(decoded))
}

/// 规范化已解码的规则集
pub fn canonicalize_rules(raw: RuleSet) -> RuleSet {
    let raw_len = raw.len();
    let mut accumulated: BTreeMap<String, Vec<RedirectTarget>> = BTreeMap::new();

    for (from, rule) in raw {
        let key = from.trim();
        if key.is_empty() {
            continue;
        }
        accumulated
            .entry(key.to_string())
            .or_default()
            .extend(rule.targets);
    }

    let canonical: RuleSet = accumulated
        .into_iter()
        .filter_map(|(key, targets)| {
            let targets = dedup_targets(targets);
            if targets.is_empty() {
                None
            } else {
                Some((key, RedirectRule::new(targets)))
            }
        })
        .collect();

    debug!("重定向规则规范化: {} -> {} 项", raw_len, canonical.len());
    canonical
}

fn dedup_targets(targets: Vec<RedirectTarget>) -> Vec<RedirectTarget> {
    let mut seen: HashSet<String> = HashSet::with_capacity(targets.len());
    let mut out = Vec::with_capacity(targets.len());

    for mut target in targets {
        let model = target.model.trim().to_string();
        if model.is_empty() || seen.contains(&model) {
            continue;
        }
        seen.insert(model.clone());
        target.model = model;
        out.push(target);
    }

    out
}
