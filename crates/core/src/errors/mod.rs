//! 错误类型模块
//!
//! 定义模型重定向引擎中的各种错误类型。
//!
//! ## 模块结构
//! - `redirect_error`: 配置写入期错误（RedirectError）与请求期错误（DispatchError）
//! - `gateway_error`: 面向客户端的统一错误模型

pub mod gateway_error;
pub mod redirect_error;

pub use gateway_error::{GatewayError, GatewayErrorCode, GatewayErrorResponse};
pub use redirect_error::{
    DispatchError, DispatchResult, RedirectError, RedirectErrorKind, RedirectResult,
};
