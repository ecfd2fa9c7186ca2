use crate::models::vpath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LanguageId {
    Html,
    Css,
    Scss,
    Sass,
    Less,
    JavaScript,
    TypeScript,
    Json,
    Php,
    Python,
    Ruby,
    Java,
    Go,
    Rust,
    Xml,
    Yaml,
    Toml,
    Ini,
    Markdown,
    Sql,
    GraphQl,
    Shell,
    PowerShell,
    Vue,
    Svelte,
    PlainText,
}

impl LanguageId {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Self::Html,
            "css" => Self::Css,
            "scss" => Self::Scss,
            "sass" => Self::Sass,
            "less" => Self::Less,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Self::TypeScript,
            "json" => Self::Json,
            "php" => Self::Php,
            "py" => Self::Python,
            "rb" => Self::Ruby,
            "java" => Self::Java,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "xml" | "svg" => Self::Xml,
            "yaml" | "yml" => Self::Yaml,
            "toml" => Self::Toml,
            "ini" => Self::Ini,
            "md" | "mdx" => Self::Markdown,
            "sql" => Self::Sql,
            "graphql" => Self::GraphQl,
            "sh" | "bash" | "zsh" => Self::Shell,
            "ps1" => Self::PowerShell,
            "vue" => Self::Vue,
            "svelte" => Self::Svelte,
            _ => Self::PlainText,
        }
    }

    pub fn from_path(path: &str) -> Self {
        Self::from_extension(vpath::extension(vpath::file_name(path)))
    }

    /// Editor-facing language id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Sass => "sass",
            Self::Less => "less",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Json => "json",
            Self::Php => "php",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Java => "java",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Ini => "ini",
            Self::Markdown => "markdown",
            Self::Sql => "sql",
            Self::GraphQl => "graphql",
            Self::Shell => "shell",
            Self::PowerShell => "powershell",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::PlainText => "plaintext",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Scss => "SCSS",
            Self::Sass => "Sass",
            Self::Less => "Less",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Json => "JSON",
            Self::Php => "PHP",
            Self::Python => "Python",
            Self::Ruby => "Ruby",
            Self::Java => "Java",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Xml => "XML",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Ini => "INI",
            Self::Markdown => "Markdown",
            Self::Sql => "SQL",
            Self::GraphQl => "GraphQL",
            Self::Shell => "Shell Script",
            Self::PowerShell => "PowerShell",
            Self::Vue => "Vue",
            Self::Svelte => "Svelte",
            Self::PlainText => "Plain Text",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/language.rs"]
mod tests;
