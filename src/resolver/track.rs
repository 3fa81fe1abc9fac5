use std::fmt;

use serde_json::Value;

use crate::error::{EntityKind, ResolveError};
use crate::resolver::types::{TrackRecord, TrackReference, TrackResponse, first_search_item};
use crate::resolver::{Entry, Resolvable};
use crate::services::catalog::Catalog;

#[derive(Debug, Clone, PartialEq)]
enum TrackState {
    Unresolved,
    /// Matched by a search or embedded in an album, not yet fetched.
    Partial(TrackReference),
    /// Terminal.
    Resolved(TrackRecord),
}

/// A track query, resolved into a full track record.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    query: String,
    state: TrackState,
}

impl Track {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            state: TrackState::Unresolved,
        }
    }

    /// Seeds the track with a response that is either a full or a simplified
    /// track object. Anything else leaves it unresolved.
    pub fn from_response(query: &str, response: Value) -> Self {
        let mut track = Self::new(query);
        match TrackResponse::classify(response) {
            Ok(TrackResponse::Full(record)) => track.state = TrackState::Resolved(record),
            Ok(TrackResponse::Partial(reference)) => track.state = TrackState::Partial(reference),
            Err(error) => {
                log::warn!("Ignoring unusable track response for \"{}\": {}", track.query, error);
            }
        }
        track
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, TrackState::Resolved(_))
    }

    /// True once a match is known, whether or not the full record is.
    pub fn is_partially_resolved(&self) -> bool {
        !matches!(self.state, TrackState::Unresolved)
    }

    pub fn record(&self) -> Option<&TrackRecord> {
        match &self.state {
            TrackState::Resolved(record) => Some(record),
            _ => None,
        }
    }

    pub fn popularity(&self) -> Option<u32> {
        self.record().map(|record| record.popularity)
    }

    /// Canonical URI such as `spotify:track:xxxxxxxxxxxxxxxxxxxxxx`, or `""`
    /// when the track has not been matched.
    pub fn uri(&self) -> &str {
        match &self.state {
            TrackState::Resolved(record) => &record.uri,
            TrackState::Partial(reference) => &reference.uri,
            TrackState::Unresolved => "",
        }
    }

    async fn search(&mut self, catalog: &Catalog) -> Result<(), ResolveError> {
        let response = catalog.search(EntityKind::Track, &self.query).await?;

        let reference = first_search_item(&response, "tracks")
            .and_then(|item| serde_json::from_value::<TrackReference>(item.clone()).ok())
            .filter(|reference| !reference.uri.is_empty())
            .ok_or_else(|| ResolveError::not_found(EntityKind::Track, &self.query))?;

        self.state = TrackState::Partial(reference);
        Ok(())
    }

    async fn fetch(&mut self, catalog: &Catalog, id: &str) -> Result<(), ResolveError> {
        let response = catalog.fetch(EntityKind::Track, id).await?;

        match TrackResponse::classify(response) {
            Ok(TrackResponse::Full(record)) => {
                self.state = TrackState::Resolved(record);
                Ok(())
            }
            Ok(TrackResponse::Partial(_)) => Err(ResolveError::malformed(
                EntityKind::Track,
                &self.query,
                "fetched track has no popularity",
            )),
            Err(error) => Err(ResolveError::malformed(
                EntityKind::Track,
                &self.query,
                error.to_string(),
            )),
        }
    }

    /// Moves the track forward to `Resolved`, searching first if needed.
    /// A resolved track is left untouched and issues no lookups.
    pub async fn resolve(&mut self, catalog: &Catalog) -> Result<&TrackRecord, ResolveError> {
        if matches!(self.state, TrackState::Unresolved) {
            self.search(catalog).await?;
        }

        if let TrackState::Partial(reference) = &self.state {
            let id = reference.id.clone();
            self.fetch(catalog, &id).await?;
        }

        match &self.state {
            TrackState::Resolved(record) => Ok(record),
            _ => Err(ResolveError::malformed(
                EntityKind::Track,
                &self.query,
                "track did not resolve",
            )),
        }
    }
}

#[async_trait::async_trait]
impl Resolvable for Track {
    async fn dispatch(&mut self, catalog: &Catalog) -> Result<Entry<Track>, ResolveError> {
        self.resolve(catalog).await?;
        Ok(Entry::Item(self.clone()))
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record() {
            Some(record) if !record.name.is_empty() => {
                let artists: Vec<&str> = record
                    .artists
                    .iter()
                    .map(|artist| artist.name.as_str())
                    .collect();
                if artists.is_empty() {
                    write!(f, "{}", record.name)
                } else {
                    write!(f, "{} - {}", record.name, artists.join(", "))
                }
            }
            _ => write!(f, "{}", self.query),
        }
    }
}
