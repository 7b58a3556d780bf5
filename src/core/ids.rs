use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifiers cannot carry `%`, so `%done` and friends are stored as `0x25_done`.
pub const PERCENT_ESCAPE: &str = "0x25_";

/// A `::`-separated identifier such as `HTTP::Request::0x25_done`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedId(String);

impl QualifiedId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds an id from user-written text, escaping `%`.
    pub fn from_source(text: &str) -> Self {
        Self(text.replace('%', PERCENT_ESCAPE))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Everything before the last `::`, or an empty id when unqualified.
    pub fn namespace(&self) -> QualifiedId {
        match self.0.rfind("::") {
            Some(idx) => QualifiedId(self.0[..idx].to_string()),
            None => QualifiedId::default(),
        }
    }

    /// The component after the last `::`.
    pub fn local(&self) -> &str {
        match self.0.rfind("::") {
            Some(idx) => &self.0[idx + 2..],
            None => &self.0,
        }
    }

    pub fn join(&self, local: &str) -> QualifiedId {
        if self.0.is_empty() {
            QualifiedId(local.to_string())
        } else {
            QualifiedId(format!("{}::{local}", self.0))
        }
    }
}

impl fmt::Display for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedId {
    fn from(value: &str) -> Self {
        QualifiedId::new(value)
    }
}

impl From<String> for QualifiedId {
    fn from(value: String) -> Self {
        QualifiedId(value)
    }
}

#[cfg(test)]
#[path = "../tests/t_ids.rs"]
mod tests;
