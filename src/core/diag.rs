use std::fmt::{Display, Formatter, Result};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::evt::ParseErrorKind;
use crate::core::project::ProjectErrorKind;
use crate::core::resolve::ResolveErrorKind;

/// A position in an `.evt` file. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// An error kind paired with the location it was reported at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedError<K> {
    kind: K,
    location: Option<Location>,
}

impl<K> LocatedError<K> {
    pub fn new(kind: K, location: Option<Location>) -> Self {
        Self { kind, location }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn into_kind(self) -> K {
        self.kind
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Attaches a location if the error does not carry one yet.
    pub fn or_at(mut self, location: &Location) -> Self {
        if self.location.is_none() {
            self.location = Some(location.clone());
        }
        self
    }
}

impl<K: Display> Display for LocatedError<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl<K: std::error::Error + 'static> std::error::Error for LocatedError<K> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

pub type ParseError = LocatedError<ParseErrorKind>;
pub type ResolveError = LocatedError<ResolveErrorKind>;
pub type ProjectError = LocatedError<ProjectErrorKind>;

#[derive(Debug, Error)]
pub enum GlueError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GlueError {
    pub fn location(&self) -> Option<&Location> {
        match self {
            GlueError::Parse(e) => e.location(),
            GlueError::Resolve(e) => e.location(),
            GlueError::Project(e) => e.location(),
            GlueError::Internal(_) | GlueError::Io { .. } => None,
        }
    }

    /// The message without the location prefix.
    pub fn message(&self) -> String {
        match self {
            GlueError::Parse(e) => e.kind().to_string(),
            GlueError::Resolve(e) => e.kind().to_string(),
            GlueError::Project(e) => e.kind().to_string(),
            other => other.to_string(),
        }
    }
}

/// Formats an error together with the offending source line and one line of
/// context on either side.
///
/// ```text
/// (http.evt:3) expected token '->'
/// │ 2 │
/// │ 3 │ on HTTP::Request event http_request(self.uri);
/// │   │ ----------------------------------------------
/// │ 4 │
/// ```
pub fn format_error(source: &str, location: &Location, error: impl Display) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let line = location.line.max(1);

    let mut out = format!("({location}) {error}\n");
    if line > lines.len() {
        return out;
    }

    let first_line = line.saturating_sub(1).max(1);
    let last_line = (line + 1).min(lines.len());
    let number_width = last_line.to_string().len();

    for line_no in first_line..=last_line {
        let content = lines.get(line_no - 1).copied().unwrap_or("");
        out.push_str(&format!(
            "│ {:>number_width$} │ {}\n",
            line_no,
            content,
            number_width = number_width
        ));

        if line_no != line {
            continue;
        }

        let indent = content.len() - content.trim_start().len();
        let len = content.trim().chars().count();
        if len > 0 {
            out.push_str(&format!(
                "│ {:>number_width$} │ {}{}\n",
                "",
                &content[..indent],
                "-".repeat(len),
                number_width = number_width
            ));
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/t_diag.rs"]
mod tests;
