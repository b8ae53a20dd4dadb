//! 别名链解析
//!
//! 旧版别名表每项只描述一跳，请求时沿链一直走到没有下一跳为止。
//! 已访问集合每轮严格增长，步数不超过别名表的条目数。

use modelmux_core::{AliasMap, RedirectError, RedirectResult};
use std::collections::HashSet;

/// 链式解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedModel<'a> {
    /// 最终模型名
    pub model: &'a str,
    /// 是否发生了重定向
    pub mapped: bool,
}

impl<'a> ResolvedModel<'a> {
    fn unmapped(model: &'a str) -> Self {
        Self {
            model,
            mapped: false,
        }
    }
}

/// 沿别名链解析请求模型
///
/// - 别名表为空：原样返回
/// - 映射到空字符串或没有下一跳：停在当前模型
/// - 自环（a → a）：一跳都没走时视为未映射，否则停在当前模型并视为已映射
/// - 回到此前访问过的其他模型：`CircularReference`
pub fn resolve_chain<'a>(
    original: &'a str,
    aliases: Option<&'a AliasMap>,
) -> RedirectResult<ResolvedModel<'a>> {
    let Some(map) = aliases.filter(|m| !m.is_empty()) else {
        return Ok(ResolvedModel::unmapped(original));
    };

    let mut current = original;
    let mut hops = 0usize;
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(original);

    loop {
        let next = match map.get(current) {
            Some(next) if !next.is_empty() => next.as_str(),
            _ => {
                return Ok(ResolvedModel {
                    model: current,
                    mapped: hops > 0,
                })
            }
        };

        if visited.contains(next) {
            if next == current {
                return Ok(ResolvedModel {
                    model: current,
                    mapped: hops > 0,
                });
            }
            return Err(RedirectError::CircularReference {
                model: original.to_string(),
                chain: cycle_chain(original, map),
            });
        }

        visited.insert(next);
        current = next;
        hops += 1;
    }
}

/// 重新走一遍链，收集到第一个重复节点为止，用于错误信息
fn cycle_chain(original: &str, map: &AliasMap) -> Vec<String> {
    let mut chain = vec![original.to_string()];
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(original);
    let mut current = original;
    while let Some(next) = map.get(current) {
        chain.push(next.clone());
        if !seen.insert(next.as_str()) {
            break;
        }
        current = next.as_str();
    }
    chain
}

/// 校验别名表中每个 key 都能终止，遇到第一个环即失败
///
/// 按 key 排序遍历，保证同一份配置报出的错误稳定。
pub fn validate_alias_map(map: &AliasMap) -> RedirectResult<()> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    for key in keys {
        resolve_chain(key, Some(map))?;
    }
    Ok(())
}
