//! 加权随机选择
//!
//! 重定向目标选择和 Key/分组轮换共用的选择原语。
//! 按权重占比随机挑选一个下标；权重 <= 0 的候选永远不会被选中。
//! O(n)，除随机抽取外不分配内存。权重总和按 u128 累加，
//! 每个权重都接近 i64::MAX 时依然严格按比例。

use super::rng::SharedRng;

/// 在权重列表中按比例挑选一个下标
///
/// 列表为空或所有权重 <= 0 时返回 `None`。
pub fn select_index(weights: &[i64], rng: &SharedRng) -> Option<usize> {
    select_by(weights, |w| *w, rng)
}

/// 在任意候选列表上按 `weight` 给出的权重挑选一个下标
///
/// `weight` 会被调用两次（求和与扫描），必须是纯函数。
pub fn select_by<T, F>(items: &[T], weight: F, rng: &SharedRng) -> Option<usize>
where
    F: Fn(&T) -> i64,
{
    let total = items
        .iter()
        .map(|item| positive(weight(item)))
        .sum::<u128>();
    if total == 0 {
        return None;
    }

    let r = rng.below_u128(total);
    let mut cumulative = 0u128;
    for (idx, item) in items.iter().enumerate() {
        let w = positive(weight(item));
        if w == 0 {
            continue;
        }
        cumulative += w;
        if r < cumulative {
            return Some(idx);
        }
    }

    None
}

fn positive(w: i64) -> u128 {
    if w > 0 {
        w as u128
    } else {
        0
    }
}
