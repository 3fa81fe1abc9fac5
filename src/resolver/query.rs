use std::fmt;

use crate::error::ResolveError;
use crate::resolver::{Album, Artist, Entry, Resolvable, Track};
use crate::services::catalog::Catalog;

/// One line of a playlist.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Track(Track),
    Album(Album),
    Artist(Artist),
}

impl Query {
    /// Caps the tracks taken from each album this query expands to.
    pub fn set_album_limit(&mut self, limit: i64) {
        match self {
            Query::Track(_) => {}
            Query::Album(album) => album.set_limit(limit),
            Query::Artist(artist) => artist.set_album_limit(limit),
        }
    }
}

#[async_trait::async_trait]
impl Resolvable for Query {
    async fn dispatch(&mut self, catalog: &Catalog) -> Result<Entry<Track>, ResolveError> {
        match self {
            Query::Track(track) => track.dispatch(catalog).await,
            Query::Album(album) => album.dispatch(catalog).await,
            Query::Artist(artist) => artist.dispatch(catalog).await,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Track(track) => write!(f, "{}", track),
            Query::Album(album) => write!(f, "#ALBUM {}", album),
            Query::Artist(artist) => write!(f, "#ARTIST {}", artist),
        }
    }
}

impl From<Track> for Query {
    fn from(track: Track) -> Self {
        Query::Track(track)
    }
}

impl From<Album> for Query {
    fn from(album: Album) -> Self {
        Query::Album(album)
    }
}

impl From<Artist> for Query {
    fn from(artist: Artist) -> Self {
        Query::Artist(artist)
    }
}
