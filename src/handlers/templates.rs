//! Page templates.
//!
//! Pages are read once at startup from the template directory. A missing
//! file falls back to a built-in page, so the server always has something
//! to answer with. Two placeholders are recognised:
//! `{{ csp_nonce }}` and `{{ debug }}`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

const NONCE_PLACEHOLDER: &str = "{{ csp_nonce }}";
const DEBUG_PLACEHOLDER: &str = "{{ debug }}";

const BUILTIN_ROOT: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>The Film</title>
<link rel="stylesheet" href="/static/main.css">
</head>
<body>
<div id="app"></div>
<script nonce="{{ csp_nonce }}">window.DEBUG = {{ debug }};</script>
<script nonce="{{ csp_nonce }}" src="/static/main.js"></script>
</body>
</html>
"#;

const BUILTIN_NO_SUPPORT: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Browser not supported</title>
<link rel="stylesheet" href="/static/main.css">
</head>
<body>
<h1>Sorry, your browser is not supported.</h1>
<p>Please try again with an up-to-date version of Chrome, Firefox, Safari or Edge.</p>
</body>
</html>
"#;

const BUILTIN_NO_WEBGL: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>WebGL required</title>
<link rel="stylesheet" href="/static/main.css">
</head>
<body>
<h1>This experience needs WebGL.</h1>
<p>Your browser or device does not have WebGL enabled.</p>
</body>
</html>
"#;

/// The pages the site can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Root,
    NoSupport,
    NoWebGl,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Root, Page::NoSupport, Page::NoWebGl];

    pub fn file_name(self) -> &'static str {
        match self {
            Page::Root => "root.html",
            Page::NoSupport => "no_support.html",
            Page::NoWebGl => "no_webgl.html",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            Page::Root => BUILTIN_ROOT,
            Page::NoSupport => BUILTIN_NO_SUPPORT,
            Page::NoWebGl => BUILTIN_NO_WEBGL,
        }
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loaded page sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    root: String,
    no_support: String,
    no_webgl: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Templates {
    /// The built-in pages only.
    pub fn builtin() -> Self {
        Self {
            root: BUILTIN_ROOT.to_string(),
            no_support: BUILTIN_NO_SUPPORT.to_string(),
            no_webgl: BUILTIN_NO_WEBGL.to_string(),
        }
    }

    /// Read every page from `dir`, using built-ins for missing files.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let mut templates = Self::builtin();
        for page in Page::ALL {
            if let Some(source) = read_page(dir, page)? {
                *templates.source_mut(page) = source;
            }
        }
        Ok(templates)
    }

    pub fn source(&self, page: Page) -> &str {
        match page {
            Page::Root => &self.root,
            Page::NoSupport => &self.no_support,
            Page::NoWebGl => &self.no_webgl,
        }
    }

    fn source_mut(&mut self, page: Page) -> &mut String {
        match page {
            Page::Root => &mut self.root,
            Page::NoSupport => &mut self.no_support,
            Page::NoWebGl => &mut self.no_webgl,
        }
    }

    /// Render `page` for one request.
    pub fn render(&self, page: Page, nonce: Option<&str>, debug: bool) -> String {
        self.source(page)
            .replace(NONCE_PLACEHOLDER, nonce.unwrap_or(""))
            .replace(DEBUG_PLACEHOLDER, if debug { "true" } else { "false" })
    }
}

fn read_page(dir: &Path, page: Page) -> Result<Option<String>, TemplateError> {
    let path = dir.join(page.file_name());
    match std::fs::read_to_string(&path) {
        Ok(source) => {
            tracing::debug!(path = %path.display(), "Loaded template");
            Ok(Some(source))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Template missing, using built-in page");
            Ok(None)
        }
        Err(source) => Err(TemplateError::Read { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_placeholders() {
        let html = Templates::builtin().render(Page::Root, Some("n0nce"), true);
        assert!(html.contains(r#"<script nonce="n0nce">window.DEBUG = true;</script>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn load_overrides_present_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("no_webgl.html"), "<p>{{ debug }}</p>").unwrap();

        let templates = Templates::load(dir.path()).unwrap();
        assert_eq!(templates.render(Page::NoWebGl, None, false), "<p>false</p>");
        assert_eq!(templates.source(Page::Root), BUILTIN_ROOT);
        assert_eq!(templates.source(Page::NoSupport), BUILTIN_NO_SUPPORT);
    }

    #[test]
    fn missing_directory_means_builtins() {
        let templates = Templates::load(Path::new("/no/such/template/dir")).unwrap();
        assert_eq!(templates, Templates::builtin());
    }
}
