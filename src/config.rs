//! 配置文件管理
//!
//! 配置以 JSON 保存，默认位于 `<config_dir>/modelmux/config.json`。
//! 保存前会把每个分组规范化（旧版映射文本迁移为 JSON、规则合并去重），
//! 磁盘上不会出现旧格式。

use anyhow::Context;
use modelmux_redirect::{GroupRedirectConfig, RedirectStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 分组名 → 重定向配置
    #[serde(default)]
    pub groups: BTreeMap<String, GroupRedirectConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别或 EnvFilter 表达式，RUST_LOG 优先
    pub level: String,
    /// 输出 JSON 格式
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("modelmux")
        .join("config.json")
}

/// 读取配置，文件不存在时返回默认配置
pub fn load_config(path: &Path) -> anyhow::Result<GatewayConfig> {
    if !path.exists() {
        return Ok(GatewayConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
    Ok(config)
}

/// 规范化后保存配置；任一分组无效则不写入
pub fn save_config(path: &Path, config: &GatewayConfig) -> anyhow::Result<()> {
    let normalized = normalize_config(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&normalized)?;
    std::fs::write(path, content)
        .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
    Ok(())
}

/// 把每个分组转换为规范形式
pub fn normalize_config(config: &GatewayConfig) -> anyhow::Result<GatewayConfig> {
    let mut groups = BTreeMap::new();
    for (name, group) in &config.groups {
        let prepared = group
            .prepare()
            .with_context(|| format!("分组 {name} 的重定向配置无效"))?;
        groups.insert(name.clone(), prepared.canonical_config()?);
    }
    Ok(GatewayConfig {
        logging: config.logging.clone(),
        groups,
    })
}

/// 根据配置构建快照存储，遇到第一个无效分组即失败
pub fn build_store(config: &GatewayConfig) -> anyhow::Result<RedirectStore> {
    let store = RedirectStore::new();
    for (name, group) in &config.groups {
        store
            .publish(name, group)
            .with_context(|| format!("分组 {name} 的重定向配置无效"))?;
    }
    Ok(store)
}
