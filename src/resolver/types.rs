use serde::Deserialize;
use serde_json::Value;

/// Full track object, as returned by `tracks/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: String,
    pub popularity: u32,
    #[serde(default)]
    pub artists: Vec<ArtistSummary>,
}

/// Simplified track object, as embedded in search results and albums.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackReference {
    pub id: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtistSummary {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Full album object, as returned by `albums/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlbumRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub tracks: Page<Value>,
}

/// One page of a paged collection. Only the first page is ever read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
}

/// The two shapes a track response can take.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackResponse {
    Full(TrackRecord),
    Partial(TrackReference),
}

impl TrackResponse {
    /// Full records are the only ones carrying `popularity`.
    pub fn classify(value: Value) -> Result<Self, serde_json::Error> {
        let is_full = value.get("popularity").is_some_and(|p| !p.is_null());
        if is_full {
            serde_json::from_value(value).map(TrackResponse::Full)
        } else {
            serde_json::from_value(value).map(TrackResponse::Partial)
        }
    }
}

/// The shapes an album response can take.
#[derive(Debug, Clone, PartialEq)]
pub enum AlbumResponse {
    /// `search?type=album`: the first item is the best match.
    Search(AlbumSummary),
    /// `albums/{id}`: carries `id` and the embedded track items.
    Album(AlbumRecord),
    /// Simplified album object with an `id` but no tracks, e.g. from an artist's catalog.
    Summary(AlbumSummary),
}

impl AlbumResponse {
    pub fn classify(value: &Value) -> Option<Self> {
        if let Some(first) = value.pointer("/albums/items/0") {
            if first.get("id").is_some_and(Value::is_string) {
                return serde_json::from_value(first.clone())
                    .ok()
                    .map(AlbumResponse::Search);
            }
            return None;
        }

        if !value.get("id").is_some_and(Value::is_string) {
            return None;
        }

        if value.pointer("/tracks/items").is_some_and(Value::is_array) {
            serde_json::from_value(value.clone())
                .ok()
                .map(AlbumResponse::Album)
        } else {
            serde_json::from_value(value.clone())
                .ok()
                .map(AlbumResponse::Summary)
        }
    }
}

/// First item of `{collection}.items` in a search response, if it has an `id`.
pub fn first_search_item<'a>(value: &'a Value, collection: &str) -> Option<&'a Value> {
    value
        .get(collection)?
        .get("items")?
        .get(0)
        .filter(|item| item.get("id").is_some_and(Value::is_string))
}
