//! 数据模型模块
//!
//! - `redirect`: 别名表与加权重定向规则

pub mod redirect;

pub use redirect::{AliasMap, RedirectRule, RedirectTarget, RuleSet};
