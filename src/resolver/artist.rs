use std::fmt;

use crate::error::{EntityKind, ResolveError};
use crate::resolver::types::{ArtistSummary, Page, first_search_item};
use crate::resolver::{Album, Entry, Queue, Resolvable, Track};
use crate::services::catalog::Catalog;

/// An artist query, resolved into the tracks of every album on the first
/// page of the artist's catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    query: String,
    album_limit: Option<i64>,
    matched: Option<(String, ArtistSummary)>,
}

impl Artist {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            album_limit: None,
            matched: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Track cap handed to every album of the artist.
    pub fn set_album_limit(&mut self, limit: i64) {
        self.album_limit = Some(limit);
    }

    async fn search(&mut self, catalog: &Catalog) -> Result<String, ResolveError> {
        if let Some((id, _)) = &self.matched {
            return Ok(id.clone());
        }

        let response = catalog.search(EntityKind::Artist, &self.query).await?;
        let item = first_search_item(&response, "artists")
            .ok_or_else(|| ResolveError::not_found(EntityKind::Artist, &self.query))?;

        let id = item
            .get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| ResolveError::not_found(EntityKind::Artist, &self.query))?;
        let summary: ArtistSummary = serde_json::from_value(item.clone()).map_err(|error| {
            ResolveError::malformed(EntityKind::Artist, &self.query, error.to_string())
        })?;

        self.matched = Some((id.clone(), summary));
        Ok(id)
    }

    async fn fetch_albums(&self, catalog: &Catalog, id: &str) -> Result<Queue<Album>, ResolveError> {
        let response = catalog.artist_albums(id).await?;
        let page: Page<serde_json::Value> = serde_json::from_value(response).map_err(|error| {
            ResolveError::malformed(EntityKind::Artist, &self.query, error.to_string())
        })?;

        Ok(page
            .items
            .iter()
            .map(|summary| {
                let mut album = Album::from_response(&self.query, summary);
                if let Some(limit) = self.album_limit {
                    album.set_limit(limit);
                }
                album
            })
            .collect())
    }

    pub async fn resolve(&mut self, catalog: &Catalog) -> Result<Queue<Track>, ResolveError> {
        let id = self.search(catalog).await?;
        let mut albums = self.fetch_albums(catalog, &id).await?;
        log::debug!("Artist \"{}\" has {} albums", self, albums.len());

        let mut tracks = albums.dispatch(catalog).await?;
        tracks.flatten();
        Ok(tracks)
    }
}

#[async_trait::async_trait]
impl Resolvable for Artist {
    async fn dispatch(&mut self, catalog: &Catalog) -> Result<Entry<Track>, ResolveError> {
        self.resolve(catalog).await.map(Entry::Queue)
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matched {
            Some((_, summary)) => write!(f, "{}", summary.name),
            None => write!(f, "{}", self.query),
        }
    }
}
