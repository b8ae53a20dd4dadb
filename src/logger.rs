//! 日志初始化
use crate::config::LoggingConfig;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 初始化全局 tracing 订阅者
///
/// RUST_LOG 优先于配置中的级别；重复初始化会被忽略。
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    match result {
        Ok(()) => info!("modelmux {} 日志已初始化", modelmux_core::version()),
        Err(e) => debug!("tracing 已初始化，跳过: {}", e),
    }
}
