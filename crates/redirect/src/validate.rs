//! 重定向规则图校验
//!
//! 每条规则视为 from → 各目标模型的边（自环忽略）。分发只走一跳，
//! 但规则图中的环说明配置自相矛盾，写入时一律拒绝。
//! 禁用的目标同样参与校验，健康检查随时可能重新启用它们。

use modelmux_core::{RedirectError, RedirectResult, RedirectRule, RuleSet};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// 校验规则集无环，按 key 有序遍历，报出的第一个环稳定
///
/// 使用显式栈，规则链再长也不会耗尽线程栈。
pub fn validate_rule_set(rules: &RuleSet) -> RedirectResult<()> {
    let mut state: HashMap<&str, Visit> = HashMap::with_capacity(rules.len());
    for from in rules.keys() {
        visit(from, rules, &mut state)?;
    }
    Ok(())
}

/// DFS 栈帧：节点及下一个待访问目标的下标
struct Frame<'a> {
    node: &'a str,
    rule: &'a RedirectRule,
    next: usize,
}

fn visit<'a>(
    root: &'a str,
    rules: &'a RuleSet,
    state: &mut HashMap<&'a str, Visit>,
) -> RedirectResult<()> {
    if state.contains_key(root) {
        return Ok(());
    }
    // 不是任何规则的 key，说明是最终的上游模型
    let Some(rule) = rules.get(root) else {
        return Ok(());
    };

    state.insert(root, Visit::InProgress);
    let mut stack = vec![Frame {
        node: root,
        rule,
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let (node, rule, idx) = (frame.node, frame.rule, frame.next);
        frame.next += 1;

        let Some(target) = rule.targets.get(idx) else {
            state.insert(node, Visit::Done);
            stack.pop();
            continue;
        };
        let child = target.model.as_str();
        if child == node {
            continue;
        }
        match state.get(child) {
            Some(Visit::Done) => {}
            Some(Visit::InProgress) => return Err(cycle_error(&stack, child)),
            None => {
                if let Some(child_rule) = rules.get(child) {
                    state.insert(child, Visit::InProgress);
                    stack.push(Frame {
                        node: child,
                        rule: child_rule,
                        next: 0,
                    });
                }
            }
        }
    }
    Ok(())
}

/// 从栈中截取环路径：第一次出现 `node` 的帧到栈顶，再回到 `node`
fn cycle_error(stack: &[Frame<'_>], node: &str) -> RedirectError {
    let start = stack.iter().position(|f| f.node == node).unwrap_or(0);
    let mut chain: Vec<String> = stack[start..].iter().map(|f| f.node.to_string()).collect();
    chain.push(node.to_string());
    RedirectError::CircularReference {
        model: node.to_string(),
        chain,
    }
}
