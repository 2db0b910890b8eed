//! 领域层统一错误定义
//!
//! 聚焦事件系统（订阅/分发）、序列化与领域命令校验等最小必要集合。
//! 表单校验失败属于正常控制流，以 `FormErrors` 数据表达，不在此处建模。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // --- 事件系统 ---
    #[error("invalid pattern: pattern={pattern}, reason={reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("unknown event: {name}")]
    UnknownEvent { name: String },
    #[error(
        "event handler error: event={event}, handler={handler}, reason={reason}, suppressed={suppressed}"
    )]
    EventHandler {
        event: String,
        handler: String,
        reason: String,
        /// 同一次分发中除首个错误外、被忽略的其他失败数
        suppressed: usize,
    },

    // --- 领域规则/命令与状态 ---
    #[error("invalid command: {reason}")]
    InvalidCommand { reason: String },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
}

impl DomainError {
    pub fn invalid_command(reason: impl Into<String>) -> Self {
        Self::InvalidCommand {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
