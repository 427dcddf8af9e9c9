//! xlet-demo 错误处理系统
//!
//! 统一的错误类型和错误处理机制

use crate::lifecycle::XletState;
use thiserror::Error;

/// 应用统一错误类型
#[derive(Error, Debug)]
pub enum XletError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON error: {0}")]
    JsonObject(#[from] json::Error),

    #[error("XML error: {0}")]
    XmlTree(#[from] roxmltree::Error),

    #[error("XML error: {0}")]
    XmlPull(#[from] quick_xml::Error),

    #[error("Properties error in {name}: {message}")]
    Properties { name: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Unexpected element: expected {expected}, found {found}")]
    UnexpectedElement { expected: String, found: String },

    #[error("Parser factory error: {message}")]
    ParserFactory { message: String },

    #[error("State change failed: {message}")]
    StateChange { message: String },

    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition { from: XletState, to: XletState },
}

impl XletError {
    /// 创建属性文件相关错误
    pub fn properties(name: &str, message: &str) -> Self {
        Self::Properties {
            name: name.to_string(),
            message: message.to_string(),
        }
    }

    /// 创建配置相关错误
    pub fn config(message: &str) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// 创建字段缺失错误
    pub fn missing_field(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    /// 创建解析器工厂错误
    pub fn parser_factory(message: &str) -> Self {
        Self::ParserFactory {
            message: message.to_string(),
        }
    }

    /// 创建状态变更错误
    pub fn state_change(message: &str) -> Self {
        Self::StateChange {
            message: message.to_string(),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, XletError>;
