//! 模型重定向核心类型和工具模块
//!
//! 包含 models, errors, selector 等基础功能

pub mod errors;
pub mod models;
pub mod selector;

pub use errors::{
    DispatchError, DispatchResult, GatewayError, GatewayErrorCode, GatewayErrorResponse,
    RedirectError, RedirectErrorKind, RedirectResult,
};
pub use models::{AliasMap, RedirectRule, RedirectTarget, RuleSet};
pub use selector::{select_by, select_index, SharedRng};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
