//! 模型重定向数据模型
//!
//! 两种配置形态：
//! - `AliasMap`：旧版一跳别名表（from → to），运行时按链式解析
//! - `RuleSet`：加权多目标重定向规则，运行时按权重挑选一个启用的目标
//!
//! 两者在写入时生成不可变快照，请求路径只读。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 旧版别名表：请求模型 → 替换模型
pub type AliasMap = HashMap<String, String>;

/// 重定向规则集：from 模型 → 规则
///
/// 使用有序 map，保证规范化后的 JSON 输出稳定。
pub type RuleSet = BTreeMap<String, RedirectRule>;

/// 单个重定向目标
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectTarget {
    /// 上游模型名
    pub model: String,
    /// 权重，缺省为 0
    #[serde(default, skip_serializing_if = "is_zero")]
    pub weight: u32,
    /// 是否启用，缺省视为启用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl RedirectTarget {
    pub fn new(model: impl Into<String>, weight: u32) -> Self {
        Self {
            model: model.into(),
            weight,
            enabled: None,
        }
    }

    /// 显式设置启用状态
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// 参与加权选择的权重，禁用的目标为 0
    pub fn effective_weight(&self) -> i64 {
        if self.is_enabled() {
            i64::from(self.weight)
        } else {
            0
        }
    }
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

/// 重定向规则：有序的候选目标列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    #[serde(default)]
    pub targets: Vec<RedirectTarget>,
}

impl RedirectRule {
    pub fn new(targets: Vec<RedirectTarget>) -> Self {
        Self { targets }
    }

    /// 是否至少有一个启用的目标
    pub fn has_enabled_target(&self) -> bool {
        self.targets.iter().any(RedirectTarget::is_enabled)
    }

    /// 按模型名查找目标
    pub fn target_mut(&mut self, model: &str) -> Option<&mut RedirectTarget> {
        self.targets.iter_mut().find(|t| t.model == model)
    }
}
