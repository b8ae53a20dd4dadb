//! 模型重定向错误类型
//!
//! 错误分两类：
//! - `RedirectError`：配置写入期检测到的作者错误（格式错误、循环引用），必须拒绝整次写入
//! - `DispatchError`：请求期错误，`NoEligibleTarget` 可由调用方降级处理
//!
//! ## 设计原则
//! - 使用 thiserror 派生 Error trait
//! - 实现 Serialize，管理接口可直接返回错误文本

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// 配置错误
// ============================================================================

/// 配置错误种类，用于结构化上报
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedirectErrorKind {
    InvalidFormat,
    CircularReference,
}

/// 配置写入期错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedirectError {
    /// 配置 JSON 或旧版映射文本格式错误
    #[error("配置格式无效: {0}")]
    InvalidFormat(String),

    /// 别名表或重定向规则中存在环
    #[error("检测到循环重定向: {model} ({})", .chain.join(" -> "))]
    CircularReference { model: String, chain: Vec<String> },
}

impl RedirectError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn kind(&self) -> RedirectErrorKind {
        match self {
            Self::InvalidFormat(_) => RedirectErrorKind::InvalidFormat,
            Self::CircularReference { .. } => RedirectErrorKind::CircularReference,
        }
    }
}

impl From<serde_json::Error> for RedirectError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

impl From<RedirectError> for String {
    fn from(err: RedirectError) -> Self {
        err.to_string()
    }
}

impl Serialize for RedirectError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type RedirectResult<T> = Result<T, RedirectError>;

// ============================================================================
// 请求期错误
// ============================================================================

/// 请求期分发错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// 所有目标均被禁用或权重为 0
    #[error("模型 {model} 没有可用的重定向目标")]
    NoEligibleTarget { model: String },

    /// 严格模式下请求了未配置的模型
    #[error("模型 {model} 未配置重定向（严格模式）")]
    ModelNotAllowed { model: String },

    /// 快照中的配置本身无效
    #[error(transparent)]
    Config(#[from] RedirectError),
}

impl DispatchError {
    /// 调用方是否可以降级为原始模型继续请求
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoEligibleTarget { .. })
    }
}

impl From<DispatchError> for String {
    fn from(err: DispatchError) -> Self {
        err.to_string()
    }
}

impl Serialize for DispatchError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_reference_message() {
        let err = RedirectError::CircularReference {
            model: "a".to_string(),
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.kind(), RedirectErrorKind::CircularReference);
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_json_error_is_invalid_format() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RedirectError = json_err.into();
        assert_eq!(err.kind(), RedirectErrorKind::InvalidFormat);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&RedirectErrorKind::CircularReference).unwrap();
        assert_eq!(json, "\"CIRCULAR_REFERENCE\"");
    }

    #[test]
    fn test_error_serializes_as_message() {
        let err = RedirectError::invalid_format("token 'a' 缺少分隔符");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("缺少分隔符"));
        let msg: String = err.into();
        assert!(msg.starts_with("配置格式无效"));
    }

    #[test]
    fn test_dispatch_error_recoverable() {
        let err = DispatchError::NoEligibleTarget {
            model: "gpt-4".to_string(),
        };
        assert!(err.is_recoverable());

        let err = DispatchError::ModelNotAllowed {
            model: "gpt-4".to_string(),
        };
        assert!(!err.is_recoverable());

        let err: DispatchError = RedirectError::invalid_format("bad").into();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("bad"));
    }
}
