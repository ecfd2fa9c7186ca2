//! 内存内容表：按路径保存文本，改名/删除按前缀重写

use rustc_hash::FxHashMap;

use crate::kernel::services::ports::content::{ContentError, ContentProvider, Result};
use crate::models::vpath;

#[derive(Debug, Default)]
pub struct MemoryContentProvider {
    files: FxHashMap<String, String>,
    placeholder: bool,
}

impl MemoryContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown text paths resolve to a short placeholder instead of `NotFound`.
    pub fn with_placeholder() -> Self {
        Self {
            files: FxHashMap::default(),
            placeholder: true,
        }
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ContentProvider for MemoryContentProvider {
    fn resolve(&self, path: &str) -> Result<String> {
        if vpath::is_binary_file(vpath::file_name(path)) {
            return Err(ContentError::Binary(path.to_string()));
        }
        match self.files.get(path) {
            Some(content) => Ok(content.clone()),
            None if self.placeholder => {
                Ok(format!("// File: {}\n// Content not available", path))
            }
            None => Err(ContentError::NotFound(path.to_string())),
        }
    }

    fn write(&mut self, path: &str, content: &str) -> Result<()> {
        self.files.insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let moved: Vec<String> = self
            .files
            .keys()
            .filter(|k| vpath::is_same_or_descendant(k, from))
            .cloned()
            .collect();
        for old in moved {
            let Some(new) = vpath::rebase(&old, from, to) else {
                continue;
            };
            if let Some(content) = self.files.remove(&old) {
                self.files.insert(new, content);
            }
        }
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<()> {
        self.files
            .retain(|k, _| !vpath::is_same_or_descendant(k, path));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;
