//! 重定向快照存储
//!
//! 每个分组持有一个 `Arc<RedirectSnapshot>`。读者克隆 `Arc` 后立即释放读锁，
//! 之后的解析完全在快照上进行；写者先在锁外完成校验和构建，
//! 再整体替换指针，进行中的请求看到的永远是完整的旧快照或新快照。
//! 写者之间通过单独的写锁串行化。

use crate::config::GroupRedirectConfig;
use crate::dispatch::{DispatchResolver, DispatchSource};
use crate::snapshot::RedirectSnapshot;
use modelmux_core::{DispatchResult, RedirectResult, SharedRng};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// 拥有所有权的分发结果，用于快照生命周期之外
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub model: String,
    pub source: DispatchSource,
}

impl DispatchOutcome {
    pub fn is_redirected(&self) -> bool {
        !matches!(self.source, DispatchSource::Passthrough)
    }
}

/// 分组 → 重定向快照
#[derive(Debug, Default)]
pub struct RedirectStore {
    groups: RwLock<HashMap<String, Arc<RedirectSnapshot>>>,
    writer: Mutex<()>,
}

impl RedirectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验配置并发布为分组的新快照
    ///
    /// 校验失败时保留原快照不变。
    pub fn publish(
        &self,
        group: &str,
        config: &GroupRedirectConfig,
    ) -> RedirectResult<Arc<RedirectSnapshot>> {
        let _writer = self.writer.lock();

        let prepared = config.prepare().map_err(|err| {
            warn!(group, kind = ?err.kind(), "拒绝重定向配置写入: {}", err);
            err
        })?;

        let snapshot = Arc::new(prepared.snapshot);
        self.groups
            .write()
            .insert(group.to_string(), Arc::clone(&snapshot));

        info!(
            "分组 {} 重定向配置已更新: 别名 {} 项, 规则 {} 项, 严格模式 {}",
            group,
            snapshot.alias_count(),
            snapshot.rule_count(),
            snapshot.strict
        );
        Ok(snapshot)
    }

    /// 获取分组当前快照
    pub fn snapshot(&self, group: &str) -> Option<Arc<RedirectSnapshot>> {
        self.groups.read().get(group).cloned()
    }

    /// 移除分组，返回是否存在
    pub fn remove(&self, group: &str) -> bool {
        let _writer = self.writer.lock();
        self.groups.write().remove(group).is_some()
    }

    /// 已配置的分组名（有序）
    pub fn groups(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// 健康检查翻转目标启用状态，生成新快照，不经过合并流程
    ///
    /// 分组、规则或目标不存在时返回 false。
    pub fn set_target_enabled(&self, group: &str, from: &str, model: &str, enabled: bool) -> bool {
        let _writer = self.writer.lock();

        let Some(current) = self.snapshot(group) else {
            return false;
        };
        let Some(next) = current.with_target_enabled(from, model, enabled) else {
            return false;
        };

        self.groups
            .write()
            .insert(group.to_string(), Arc::new(next));
        info!(group, from, model, enabled, "重定向目标状态已更新");
        true
    }

    /// 按分组解析请求模型；分组未配置时原样透传
    pub fn dispatch(
        &self,
        group: &str,
        requested: &str,
        rng: &SharedRng,
    ) -> DispatchResult<DispatchOutcome> {
        let Some(snapshot) = self.snapshot(group) else {
            return Ok(DispatchOutcome {
                model: requested.to_string(),
                source: DispatchSource::Passthrough,
            });
        };

        let dispatch = DispatchResolver::new(&snapshot, rng).resolve(requested)?;
        Ok(DispatchOutcome {
            model: dispatch.model.to_string(),
            source: dispatch.source,
        })
    }
}
