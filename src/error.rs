//! Error types for route-table construction.
//!
//! Lookups never fail: a request without a route and a reverse call without a
//! matching action both resolve to `None`. Everything in this module is raised
//! while a route file is being parsed or its tree is being built, and is fatal
//! to that single rebuild only.

use std::path::{Path, PathBuf};

/// Failure inserting a key into a [`PathTree`](crate::pathtree::PathTree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("path must begin with /: {0:?}")]
    RelativePath(String),

    #[error("duplicate path: {0}")]
    DuplicatePath(String),

    #[error("catch-all segment must be the last path segment: {0}")]
    StarNotLast(String),

    #[error("wildcard segment without a name: {0}")]
    EmptyWildcardName(String),
}

/// Failure turning a single route declaration into a [`Route`](crate::routes::Route).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid fixed parameters ({reason}) for string {args:?}")]
    FixedArgs { args: String, reason: String },

    #[error("absolute URL required, got {0:?}")]
    RelativePath(String),

    #[error("expected two parts (Controller.Action), but got {parts}: {action}")]
    MalformedAction { action: String, parts: usize },

    #[error("action {controller}.{method} is not registered")]
    UnknownAction { controller: String, method: String },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// A configuration error with enough source context to point at the
/// offending route declaration.
///
/// `line` is 1-based. `source_lines` holds the whole route file when it was
/// available, so callers can render the surrounding declarations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{title}: {description}", location(.path, .line))]
pub struct ConfigError {
    pub title: String,
    pub description: String,
    pub path: Option<PathBuf>,
    pub line: Option<usize>,
    pub source_lines: Vec<String>,
}

impl ConfigError {
    /// The route file could not be read at all.
    #[must_use]
    pub fn load(path: &Path, err: &std::io::Error) -> Self {
        Self {
            title: "Failed to load routes file".to_string(),
            description: err.to_string(),
            path: Some(path.to_path_buf()),
            line: None,
            source_lines: Vec::new(),
        }
    }

    /// A declaration failed to parse, validate or insert.
    ///
    /// `line` is 1-based.
    #[must_use]
    pub fn route(err: &RouteError, path: Option<&Path>, line: usize) -> Self {
        Self {
            title: "Route validation error".to_string(),
            description: err.to_string(),
            path: path.map(Path::to_path_buf),
            line: Some(line),
            source_lines: Vec::new(),
        }
    }

    /// Attach the route file content, unless some is already present.
    #[must_use]
    pub fn with_source(mut self, content: &str) -> Self {
        if self.source_lines.is_empty() {
            self.source_lines = content.split('\n').map(str::to_string).collect();
        }
        self
    }

    /// The offending line and up to `radius` neighbours on each side, paired
    /// with their 1-based line numbers.
    #[must_use]
    pub fn context_lines(&self, radius: usize) -> Vec<(usize, &str)> {
        let Some(line) = self.line else {
            return Vec::new();
        };
        if line == 0 || line > self.source_lines.len() {
            return Vec::new();
        }
        let first = line.saturating_sub(radius).max(1);
        let last = (line + radius).min(self.source_lines.len());
        (first..=last)
            .map(|n| (n, self.source_lines[n - 1].as_str()))
            .collect()
    }
}

/// `path:line: ` prefix for [`ConfigError`] messages, or empty.
fn location(path: &Option<PathBuf>, line: &Option<usize>) -> String {
    match (path, line) {
        (Some(path), Some(line)) => format!("{}:{line}: ", path.display()),
        (Some(path), None) => format!("{}: ", path.display()),
        (None, Some(line)) => format!("line {line}: "),
        (None, None) => String::new(),
    }
}
