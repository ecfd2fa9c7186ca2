//! 虚拟路径工具：斜杠分隔的字符串路径，不触碰真实文件系统

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "ico", "bmp"];

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "ico", "bmp", "pdf", "doc", "docx", "xls", "xlsx", "ppt",
    "pptx", "zip", "rar", "7z", "tar", "gz", "mp3", "mp4", "wav", "avi", "mov", "mkv", "exe",
    "dll", "so", "dylib", "woff", "woff2", "ttf", "otf", "eot",
];

pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx + 1 < path.len() => &path[idx + 1..],
        Some(_) => path,
        None => path,
    }
}

/// All segments except the last. `/proj/src/a.ts` -> `/proj/src`, `/proj` -> ``.
pub fn parent_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[..idx],
        None => "",
    }
}

pub fn join(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let name = name.trim_matches('/');
    let mut out = String::with_capacity(parent.len() + name.len() + 1);
    out.push_str(parent);
    out.push('/');
    out.push_str(name);
    out
}

pub fn extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => "",
    }
}

pub fn is_same_or_descendant(path: &str, ancestor: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if !is_same_or_descendant(path, old_prefix) {
        return None;
    }
    let rest = &path[old_prefix.len()..];
    let mut out = String::with_capacity(new_prefix.len() + rest.len());
    out.push_str(new_prefix);
    out.push_str(rest);
    Some(out)
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/')
}

pub fn is_image_file(name: &str) -> bool {
    let ext = extension(name).to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

pub fn is_binary_file(name: &str) -> bool {
    let ext = extension(name).to_ascii_lowercase();
    BINARY_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
#[path = "../../tests/unit/models/vpath.rs"]
mod tests;
