//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`ApiMessage`] - 简单操作结果响应
//! - 日志、金额等工具

pub mod error;
pub mod logger;
pub mod money;
pub mod validation;

pub use error::{AppError, AppResult};

/// 简单操作结果响应
///
/// 用于删除、状态更新等没有实体返回值的接口：
///
/// ```json
/// { "success": true, "message": "Product deleted successfully" }
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    /// 创建成功响应
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
