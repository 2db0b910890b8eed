//! 订阅匹配器（Matcher）
//!
//! 精确名称按字符串相等查找；模式只以 `is_match` 测试事件名，
//! 从不按其源文本参与精确查找，因此发出一个与模式源文本同名的事件
//! 并不会命中该模式（除非正则本身匹配这个字符串）。
//!
use crate::error::{DomainError, DomainResult};
use regex::Regex;
use std::fmt;

/// 订阅键：注册后不可变，需要变更时先退订再重新订阅
#[derive(Clone, Debug)]
pub enum Matcher {
    /// 精确事件名
    Exact(String),
    /// 针对事件名字符串的正则模式
    Pattern(Regex),
    /// 匹配任意事件（诊断/追踪用）
    All,
}

impl Matcher {
    pub fn exact(event_name: impl Into<String>) -> Self {
        Self::Exact(event_name.into())
    }

    /// 编译正则模式；非法模式在订阅前即失败
    pub fn pattern(pattern: &str) -> DomainResult<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| DomainError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn matches(&self, event_name: &str) -> bool {
        match self {
            Self::Exact(name) => name == event_name,
            Self::Pattern(re) => re.is_match(event_name),
            Self::All => true,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
            Self::All => f.write_str("*"),
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Self::Exact(value.to_string())
    }
}

impl From<String> for Matcher {
    fn from(value: String) -> Self {
        Self::Exact(value)
    }
}

impl From<Regex> for Matcher {
    fn from(value: Regex) -> Self {
        Self::Pattern(value)
    }
}
