//! 模型重定向与加权分发
//!
//! ## 模块结构
//!
//! - `chain` - 旧版别名链解析与环检测
//! - `migrate` - 旧版 `from:to` 文本迁移
//! - `merge` - 加权规则规范化与合并
//! - `validate` - 规则图环检测
//! - `config` - 分组配置写入路径
//! - `snapshot` - 不可变分组快照
//! - `dispatch` - 请求期分发
//! - `store` - 快照存储与原子替换
//!
//! ## 数据流
//!
//! 管理接口写入配置 → 迁移旧格式 → 合并规范化 → 校验 → 生成快照并原子替换。
//! 请求期只读快照：命中规则则按权重挑选目标，否则沿别名链解析。

pub mod chain;
pub mod config;
pub mod dispatch;
pub mod merge;
pub mod migrate;
pub mod snapshot;
pub mod store;
pub mod validate;

pub use chain::{resolve_chain, validate_alias_map, ResolvedModel};
pub use config::{GroupRedirectConfig, PreparedRedirect};
pub use dispatch::{pick_target, Dispatch, DispatchResolver, DispatchSource};
pub use merge::{canonicalize_rules, decode_rule_set, merge_redirect_rules};
pub use migrate::{alias_map_to_json, migrate_legacy_mapping};
pub use snapshot::RedirectSnapshot;
pub use store::{DispatchOutcome, RedirectStore};
pub use validate::validate_rule_set;
