//! 演示项目：一个小型静态网站的文件树与内容

use super::memory::MemoryContentProvider;
use crate::models::{DuplicateNames, FileTree, FileTreeError, NodeKind};

pub const SAMPLE_ROOT: &str = "/my-website";

const FOLDERS: &[(&str, &str)] = &[
    ("", "src"),
    ("/src", "components"),
    ("/src", "styles"),
    ("", "public"),
    ("/public", "images"),
];

const FILES: &[(&str, &str, &str)] = &[
    ("/src/components", "Header.tsx", HEADER_TSX),
    ("/src/components", "Footer.tsx", FOOTER_TSX),
    ("/src/components", "Button.tsx", BUTTON_TSX),
    ("/src/styles", "globals.css", GLOBALS_CSS),
    ("/src/styles", "variables.css", VARIABLES_CSS),
    ("/src", "App.tsx", APP_TSX),
    ("/src", "main.tsx", MAIN_TSX),
    ("/public/images", "logo.svg", LOGO_SVG),
    ("/public/images", "hero.png", ""),
    ("/public", "favicon.ico", ""),
    ("", "index.html", INDEX_HTML),
    ("", "package.json", PACKAGE_JSON),
    ("", "tsconfig.json", TSCONFIG_JSON),
    ("", "README.md", README_MD),
    ("", ".gitignore", GITIGNORE),
];

/// Builds the sample tree under `root` and a content table for its text files.
/// Unknown text paths resolve to a placeholder so freshly created files open.
pub fn sample_workspace(
    root: &str,
    duplicates: DuplicateNames,
) -> Result<(FileTree, MemoryContentProvider), FileTreeError> {
    let root = root.trim_end_matches('/');
    let mut tree = FileTree::with_policy(root, duplicates);
    let mut content = MemoryContentProvider::with_placeholder();

    for (parent, name) in FOLDERS {
        tree.create_node(&format!("{}{}", root, parent), name, NodeKind::Folder)?;
    }
    for (parent, name, text) in FILES {
        let node = tree.create_node(&format!("{}{}", root, parent), name, NodeKind::File)?;
        if !text.is_empty() {
            content.insert(node.path, *text);
        }
    }

    Ok((tree, content))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>My Awesome Website</title>
  <link rel="stylesheet" href="/src/styles/globals.css">
</head>
<body>
  <div id="root"></div>
  <script type="module" src="/src/main.tsx"></script>
</body>
</html>"#;

const APP_TSX: &str = r#"import { useState } from 'react';
import Header from './components/Header';
import Footer from './components/Footer';
import Button from './components/Button';
import './styles/globals.css';

function App() {
  const [count, setCount] = useState(0);

  return (
    <div className="app">
      <Header />
      <main className="main-content">
        <h1>Welcome to My Website</h1>
        <p>Count: {count}</p>
        <Button onClick={() => setCount(c => c + 1)}>Increment</Button>
      </main>
      <Footer />
    </div>
  );
}

export default App;"#;

const MAIN_TSX: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';

ReactDOM.createRoot(document.getElementById('root')!).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);"#;

const HEADER_TSX: &str = r#"import React from 'react';

const Header: React.FC<{ title?: string }> = ({ title = 'My Website' }) => (
  <header className="header">
    <span>{title}</span>
  </header>
);

export default Header;"#;

const FOOTER_TSX: &str = r#"import React from 'react';

const Footer: React.FC = () => (
  <footer className="footer">
    <p>&copy; My Website</p>
  </footer>
);

export default Footer;"#;

const BUTTON_TSX: &str = r#"import React from 'react';

interface ButtonProps {
  children: React.ReactNode;
  onClick?: () => void;
  variant?: 'primary' | 'secondary';
}

const Button: React.FC<ButtonProps> = ({ children, onClick, variant = 'primary' }) => (
  <button className={`btn btn-${variant}`} onClick={onClick}>
    {children}
  </button>
);

export default Button;"#;

const GLOBALS_CSS: &str = r#"/* Global Styles */
@import './variables.css';

body {
  margin: 0;
  font-family: var(--font-sans);
  color: var(--color-text);
}"#;

const VARIABLES_CSS: &str = r#"/* CSS Variables / Design Tokens */
:root {
  --color-primary: #3b82f6;
  --color-text: #1f2937;
  --font-sans: system-ui, sans-serif;
}"#;

const PACKAGE_JSON: &str = r#"{
  "name": "my-website",
  "version": "1.0.0",
  "scripts": {
    "dev": "vite",
    "build": "tsc && vite build"
  }
}"#;

const TSCONFIG_JSON: &str = r#"{
  "compilerOptions": {
    "target": "ES2020",
    "jsx": "react-jsx",
    "strict": true
  }
}"#;

const README_MD: &str = r#"# My Website

A small website built with React and TypeScript.

## Getting Started

npm install
npm run dev"#;

const GITIGNORE: &str = r#"# Dependencies
node_modules

# Build output
dist"#;

const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <circle cx="50" cy="50" r="40" fill="#3b82f6"/>
</svg>"##;

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/sample.rs"]
mod tests;
