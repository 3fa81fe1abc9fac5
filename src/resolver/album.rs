use std::fmt;

use serde_json::Value;

use crate::error::{EntityKind, ResolveError};
use crate::resolver::types::{AlbumRecord, AlbumResponse, AlbumSummary};
use crate::resolver::{Entry, Queue, Resolvable, Track};
use crate::services::catalog::Catalog;

#[derive(Debug, Clone, PartialEq)]
enum AlbumState {
    Unresolved,
    /// Best search match or a simplified album object; enough to fetch by id.
    Matched(AlbumSummary),
    Fetched(AlbumRecord),
}

/// An album query, resolved into the album's tracks in release order.
#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    query: String,
    limit: Option<usize>,
    state: AlbumState,
}

impl Album {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            limit: None,
            state: AlbumState::Unresolved,
        }
    }

    /// Seeds the album with a search response, a full album object or a
    /// simplified album object.
    pub fn from_response(query: &str, response: &Value) -> Self {
        let mut album = Self::new(query);
        album.state = match AlbumResponse::classify(response) {
            Some(AlbumResponse::Album(record)) => AlbumState::Fetched(record),
            Some(AlbumResponse::Search(summary)) | Some(AlbumResponse::Summary(summary)) => {
                AlbumState::Matched(summary)
            }
            None => AlbumState::Unresolved,
        };
        album
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Caps the number of tracks taken from the album. Ignored unless positive.
    pub fn set_limit(&mut self, limit: i64) {
        if let Ok(limit) = usize::try_from(limit) {
            if limit > 0 {
                self.limit = Some(limit);
            }
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The catalog id: the full record's, else the matched one's.
    pub fn id(&self) -> Option<&str> {
        match &self.state {
            AlbumState::Fetched(record) => Some(&record.id),
            AlbumState::Matched(summary) => Some(&summary.id),
            AlbumState::Unresolved => None,
        }
    }

    async fn search(&mut self, catalog: &Catalog) -> Result<(), ResolveError> {
        let response = catalog.search(EntityKind::Album, &self.query).await?;
        match AlbumResponse::classify(&response) {
            Some(AlbumResponse::Search(summary)) => {
                self.state = AlbumState::Matched(summary);
                Ok(())
            }
            _ => Err(ResolveError::not_found(EntityKind::Album, &self.query)),
        }
    }

    async fn fetch(&mut self, catalog: &Catalog, id: &str) -> Result<(), ResolveError> {
        let response = catalog.fetch(EntityKind::Album, id).await?;
        match AlbumResponse::classify(&response) {
            Some(AlbumResponse::Album(record)) => {
                self.state = AlbumState::Fetched(record);
                Ok(())
            }
            _ => Err(ResolveError::not_found(EntityKind::Album, &self.query)),
        }
    }

    /// One partially resolved track per embedded item, in album order.
    fn create_queue(&self, record: &AlbumRecord) -> Queue<Track> {
        let tracks = record
            .tracks
            .items
            .iter()
            .map(|item| Track::from_response(&self.query, item.clone()));

        match self.limit {
            Some(limit) => tracks.take(limit).collect(),
            None => tracks.collect(),
        }
    }

    pub async fn resolve(&mut self, catalog: &Catalog) -> Result<Queue<Track>, ResolveError> {
        if matches!(self.state, AlbumState::Unresolved) {
            self.search(catalog).await?;
        }

        if let AlbumState::Matched(summary) = &self.state {
            let id = summary.id.clone();
            self.fetch(catalog, &id).await?;
        }

        match &self.state {
            AlbumState::Fetched(record) => {
                let queue = self.create_queue(record);
                log::debug!("Album \"{}\" resolved to {} tracks", self.query, queue.len());
                Ok(queue)
            }
            _ => Err(ResolveError::not_found(EntityKind::Album, &self.query)),
        }
    }
}

#[async_trait::async_trait]
impl Resolvable for Album {
    async fn dispatch(&mut self, catalog: &Catalog) -> Result<Entry<Track>, ResolveError> {
        self.resolve(catalog).await.map(Entry::Queue)
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match &self.state {
            AlbumState::Fetched(record) => record.name.as_deref(),
            AlbumState::Matched(summary) => summary.name.as_deref(),
            AlbumState::Unresolved => None,
        };
        write!(f, "{}", name.unwrap_or(self.query.as_str()))
    }
}
