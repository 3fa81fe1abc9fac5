use std::fmt;

use serde_json::Value;

/// The kind of catalog entity a query or lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Track,
    Album,
    Artist,
}

impl EntityKind {
    /// The name the catalog uses for this kind in `search?type=`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Album => "album",
            EntityKind::Artist => "artist",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures of a single remote lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Failed to send http request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Catalog responded with status {code}")]
    Status { code: u16 },
    #[error("Catalog returned an error payload: {payload}")]
    Service { payload: Value },
    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Failures of a resolver dispatch.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Could not find {kind} \"{query}\"")]
    NotFound { kind: EntityKind, query: String },
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Unexpected {kind} response for \"{query}\": {reason}")]
    Malformed {
        kind: EntityKind,
        query: String,
        reason: String,
    },
}

impl ResolveError {
    pub fn not_found(kind: EntityKind, query: impl Into<String>) -> Self {
        let query = query.into();
        log::warn!("Could not find {} \"{}\"", kind, query);
        Self::NotFound { kind, query }
    }

    pub fn malformed(kind: EntityKind, query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            query: query.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }
}
