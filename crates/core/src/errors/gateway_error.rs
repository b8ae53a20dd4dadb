//! 网关统一错误模型
//!
//! 把重定向引擎的配置错误和分发错误映射为稳定的错误码，
//! 便于管理接口和请求处理层统一返回。

use super::redirect_error::{DispatchError, RedirectError, RedirectErrorKind};
use serde::{Deserialize, Serialize};

/// 网关错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayErrorCode {
    InvalidFormat,
    CircularReference,
    NoEligibleTarget,
    ModelNotAllowed,
    InternalError,
}

impl GatewayErrorCode {
    /// 建议的 HTTP 状态码
    pub fn http_status(self) -> u16 {
        match self {
            Self::InvalidFormat | Self::CircularReference => 400,
            Self::ModelNotAllowed => 404,
            Self::NoEligibleTarget => 503,
            Self::InternalError => 500,
        }
    }

    /// 默认错误文案
    pub fn default_message(self) -> &'static str {
        match self {
            Self::InvalidFormat => "重定向配置格式无效",
            Self::CircularReference => "重定向配置存在循环引用",
            Self::NoEligibleTarget => "当前没有可用的重定向目标",
            Self::ModelNotAllowed => "请求的模型未配置重定向",
            Self::InternalError => "服务内部错误",
        }
    }

    /// 是否可重试
    ///
    /// 目标可能被健康检查重新启用，因此只有 NoEligibleTarget 可重试。
    pub fn retryable(self) -> bool {
        matches!(self, Self::NoEligibleTarget)
    }
}

impl From<RedirectErrorKind> for GatewayErrorCode {
    fn from(kind: RedirectErrorKind) -> Self {
        match kind {
            RedirectErrorKind::InvalidFormat => Self::InvalidFormat,
            RedirectErrorKind::CircularReference => Self::CircularReference,
        }
    }
}

/// 网关错误详情
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayError {
    pub code: GatewayErrorCode,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl GatewayError {
    /// 创建错误详情
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let final_message = if message.trim().is_empty() {
            code.default_message().to_string()
        } else {
            message
        };

        Self {
            code,
            message: final_message,
            retryable: code.retryable(),
            request_id: None,
            group: None,
        }
    }

    /// 设置请求 ID
    pub fn with_request_id(mut self, request_id: Option<&str>) -> Self {
        self.request_id = request_id.map(ToString::to_string);
        self
    }

    /// 设置分组名
    pub fn with_group(mut self, group: Option<&str>) -> Self {
        self.group = group.map(ToString::to_string);
        self
    }

    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl From<&RedirectError> for GatewayError {
    fn from(err: &RedirectError) -> Self {
        Self::new(err.kind().into(), err.to_string())
    }
}

impl From<&DispatchError> for GatewayError {
    fn from(err: &DispatchError) -> Self {
        match err {
            DispatchError::NoEligibleTarget { .. } => {
                Self::new(GatewayErrorCode::NoEligibleTarget, err.to_string())
            }
            DispatchError::ModelNotAllowed { .. } => {
                Self::new(GatewayErrorCode::ModelNotAllowed, err.to_string())
            }
            DispatchError::Config(inner) => inner.into(),
        }
    }
}

/// 网关错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayErrorResponse {
    pub error: GatewayError,
}

impl GatewayErrorResponse {
    /// 创建响应
    pub fn new(error: GatewayError) -> Self {
        Self { error }
    }
}
