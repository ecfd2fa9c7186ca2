//! 文档内容来源
//!
//! 会话层只通过这个 trait 读取/写回文本，不关心背后是内存表还是真实存储。

use std::fmt;

pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    NotFound(String),
    Binary(String),
    Io(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::NotFound(p) => write!(f, "content not found: {}", p),
            ContentError::Binary(p) => write!(f, "binary file cannot be opened as text: {}", p),
            ContentError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ContentError {}

impl From<std::io::Error> for ContentError {
    fn from(e: std::io::Error) -> Self {
        ContentError::Io(e.to_string())
    }
}

pub trait ContentProvider: Send {
    fn resolve(&self, path: &str) -> Result<String>;

    fn write(&mut self, path: &str, content: &str) -> Result<()>;

    /// Moves every entry at or below `from` to the matching path below `to`.
    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    /// Drops every entry at or below `path`.
    fn remove(&mut self, path: &str) -> Result<()>;
}
