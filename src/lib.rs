//! modelmux - 多 Provider AI 网关的模型重定向与加权分发
//!
//! ## Workspace 结构
//!
//! - modelmux-core crate（models, errors, selector）
//! - modelmux-redirect crate（chain, migrate, merge, validate, dispatch, store）
//! - 主 crate 负责配置文件读写和日志初始化

pub mod config;
pub mod logger;

// 重新导出子 crate 的常用类型
pub use modelmux_core::{
    select_by, select_index, AliasMap, DispatchError, GatewayError, GatewayErrorCode,
    RedirectError, RedirectErrorKind, RedirectRule, RedirectTarget, RuleSet, SharedRng,
};
pub use modelmux_redirect::{
    Dispatch, DispatchOutcome, DispatchResolver, DispatchSource, GroupRedirectConfig,
    RedirectSnapshot, RedirectStore,
};

pub use config::{build_store, load_config, save_config, GatewayConfig, LoggingConfig};
pub use logger::init_tracing;
