//! 旧版映射文本迁移
//!
//! 旧格式为空白分隔的 `from:to` 列表，例如 `gpt-4:gpt-4o claude:claude-3-5-sonnet`。
//! 写入时统一转换为 JSON 对象 `{"from":"to"}`，旧文本不再回写。

use modelmux_core::{AliasMap, RedirectError, RedirectResult};
use std::collections::BTreeMap;
use tracing::debug;

/// 把旧版映射文本或 JSON 对象转换为别名表
///
/// - 空输入返回 `None`
/// - 先尝试按 JSON 对象解析，已迁移的数据保持不变
/// - 解析失败则按 `from:to` 逐项解析，任一项非法则整体失败，不返回部分结果
/// - 重复的 from 以最后一次为准
/// - 结果为空时返回 `None`
pub fn migrate_legacy_mapping(text: &str) -> RedirectResult<Option<AliasMap>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(map) = serde_json::from_str::<AliasMap>(trimmed) {
        return Ok(non_empty(map));
    }

    let mut map = AliasMap::new();
    for token in trimmed.split_whitespace() {
        let (from, to) = parse_token(token)?;
        map.insert(from.to_string(), to.to_string());
    }
    debug!("旧版模型映射已迁移: {} 项", map.len());
    Ok(non_empty(map))
}

fn parse_token(token: &str) -> RedirectResult<(&str, &str)> {
    let mut parts = token.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(from), Some(to), None) if !from.is_empty() && !to.is_empty() => Ok((from, to)),
        _ => Err(RedirectError::invalid_format(format!(
            "无效的模型映射项 '{token}'，应为 from:to"
        ))),
    }
}

fn non_empty(map: AliasMap) -> Option<AliasMap> {
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 别名表的持久化形式，key 有序，输出稳定
pub fn alias_map_to_json(map: &AliasMap) -> RedirectResult<String> {
    let sorted: BTreeMap<&str, &str> = map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    Ok(serde_json::to_string(&sorted)?)
}
