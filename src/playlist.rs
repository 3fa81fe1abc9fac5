use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::FailurePolicy;
use crate::error::ResolveError;
use crate::resolver::{Album, Artist, Entry, Query, Queue, Track};
use crate::services::catalog::Catalog;

static ORDER_BY_POPULARITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#ORDER BY POPULARITY").unwrap());
static ALBUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^#ALBUM\s+(.+)$").unwrap());
static ARTIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^#ARTIST\s+(.+)$").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Playlist order.
    #[default]
    None,
    /// Most popular first.
    Popularity,
}

/// A text playlist: one query per line, resolved into track URIs.
///
/// ```text
/// #ORDER BY POPULARITY
/// Shape of You
/// #ALBUM Thriller
/// #ARTIST Daft Punk
/// ```
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    queries: Queue<Query>,
    tracks: Queue<Track>,
    order: SortOrder,
}

impl Playlist {
    pub fn parse(text: &str) -> Self {
        let mut playlist = Self::default();

        for line in text.split(['\r', '\n']).map(str::trim) {
            if line.is_empty() {
                continue;
            }

            if ORDER_BY_POPULARITY.is_match(line) {
                playlist.order = SortOrder::Popularity;
            } else if let Some(captures) = ALBUM.captures(line) {
                playlist.queries.push(Album::new(&captures[1]).into());
            } else if let Some(captures) = ARTIST.captures(line) {
                playlist.queries.push(Artist::new(&captures[1]).into());
            } else {
                playlist.queries.push(Track::new(line).into());
            }
        }

        playlist
    }

    /// Caps the tracks taken from every album the playlist expands to.
    pub fn with_album_limit(mut self, limit: Option<i64>) -> Self {
        if let Some(limit) = limit {
            for entry in self.queries.iter_mut() {
                if let Entry::Item(query) = entry {
                    query.set_album_limit(limit);
                }
            }
        }
        self
    }

    pub fn queries(&self) -> &Queue<Query> {
        &self.queries
    }

    pub fn tracks(&self) -> &Queue<Track> {
        &self.tracks
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Resolves every query and renders the result.
    pub async fn dispatch(&mut self, catalog: &Catalog) -> Result<String, ResolveError> {
        self.fetch_tracks(catalog).await?;
        Ok(self.render())
    }

    /// Resolves every query, in order, into the flat track list.
    pub async fn fetch_tracks(&mut self, catalog: &Catalog) -> Result<(), ResolveError> {
        let mut tracks = self.queries.dispatch(catalog).await?;
        tracks.flatten();

        if self.order == SortOrder::Popularity {
            resolve_popularity(&mut tracks, catalog).await?;
            tracks.sort_by(by_descending_popularity);
        }

        log::info!(
            "Resolved {} queries into {} tracks",
            self.queries.len(),
            tracks.len()
        );
        self.tracks = tracks;
        Ok(())
    }

    /// Newline-separated URIs of the resolved tracks; unmatched tracks are left out.
    pub fn render(&self) -> String {
        self.tracks
            .items()
            .map(Track::uri)
            .filter(|uri| !uri.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end()
            .to_string()
    }
}

/// Album tracks only carry a simplified object; popularity needs the full one.
async fn resolve_popularity(
    tracks: &mut Queue<Track>,
    catalog: &Catalog,
) -> Result<(), ResolveError> {
    for entry in tracks.iter_mut() {
        let Entry::Item(track) = entry else {
            continue;
        };
        // Unmatched album items have nothing to fetch by.
        if track.is_resolved() || !track.is_partially_resolved() {
            continue;
        }
        if let Err(error) = track.resolve(catalog).await.map(|_| ()) {
            match catalog.failure_policy() {
                FailurePolicy::AbortAll => return Err(error),
                FailurePolicy::SkipAndContinue => {
                    log::warn!("No popularity for \"{}\": {}", track, error);
                }
            }
        }
    }
    Ok(())
}

fn by_descending_popularity(a: &Entry<Track>, b: &Entry<Track>) -> Ordering {
    let popularity = |entry: &Entry<Track>| match entry {
        Entry::Item(track) => track.popularity(),
        Entry::Queue(_) => None,
    };
    // None sorts below every Some, so unknown popularity goes last.
    popularity(b).cmp(&popularity(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::error::EntityKind;
    use crate::ports::catalog::MockCatalogLookup;
    use crate::services::catalog::Endpoints;
    use crate::test_utils::{
        ScriptedCatalog, album_json, album_search_json, artist_albums_json, artist_search_json,
        full_track_json, track_search_json,
    };

    fn kinds(playlist: &Playlist) -> Vec<String> {
        playlist
            .queries()
            .items()
            .map(|query| match query {
                Query::Track(track) => format!("track:{}", track.query()),
                Query::Album(album) => format!("album:{}", album.query()),
                Query::Artist(artist) => format!("artist:{}", artist.query()),
            })
            .collect()
    }

    #[test]
    fn test_parse_line_kinds() {
        let playlist = Playlist::parse(
            "Shape of You\r\n#ALBUM Thriller\r#artist  Daft Punk \n\n   \n#Album Bad\nHello",
        );
        assert_eq!(
            kinds(&playlist),
            vec![
                "track:Shape of You",
                "album:Thriller",
                "artist:Daft Punk",
                "album:Bad",
                "track:Hello",
            ]
        );
        assert_eq!(playlist.order(), SortOrder::None);
    }

    #[test]
    fn test_parse_order_directive_anywhere() {
        let playlist = Playlist::parse("one\n#order by popularity\ntwo");
        assert_eq!(playlist.order(), SortOrder::Popularity);
        assert_eq!(kinds(&playlist), vec!["track:one", "track:two"]);
    }

    #[test]
    fn test_parse_empty() {
        let playlist = Playlist::parse("  \n\r\n ");
        assert!(playlist.queries().is_empty());
        assert_eq!(playlist.render(), "");
    }

    #[test]
    fn test_marker_without_text_is_a_track() {
        let playlist = Playlist::parse("#ALBUM\n#ARTIST   ");
        assert_eq!(kinds(&playlist), vec!["track:#ALBUM", "track:#ARTIST"]);
    }

    #[tokio::test]
    async fn test_resolved_records_render_without_lookups() {
        let mut mock = MockCatalogLookup::new();
        mock.expect_lookup().times(0);
        let catalog = Catalog::new(Arc::new(mock), Endpoints::default());

        let mut playlist = Playlist::default();
        playlist
            .queries
            .push(Track::from_response("a", full_track_json("t1", "A", 1)).into());
        playlist
            .queries
            .push(Track::from_response("b", json!({"id": "t2", "popularity": 2})).into());
        playlist
            .queries
            .push(Track::from_response("c", full_track_json("t3", "C", 3)).into());

        let output = playlist.dispatch(&catalog).await.unwrap();

        let expected: Vec<&str> = playlist
            .tracks()
            .items()
            .map(Track::uri)
            .filter(|uri| !uri.is_empty())
            .collect();
        assert_eq!(output, expected.join("\n"));
        assert_eq!(output, "spotify:track:t1\nspotify:track:t3");
    }

    #[tokio::test]
    async fn test_single_track_line() {
        let scripted = ScriptedCatalog::new();
        let endpoints = scripted.endpoints();
        scripted.respond(
            endpoints.search(EntityKind::Track, "Shape of You"),
            track_search_json(&["7qiZfU4dY1lWllzX7mPBI3"]),
        );
        scripted.respond(
            endpoints.item(EntityKind::Track, "7qiZfU4dY1lWllzX7mPBI3"),
            full_track_json("7qiZfU4dY1lWllzX7mPBI3", "Shape of You", 90),
        );

        let mut playlist = Playlist::parse("Shape of You");
        let output = playlist.dispatch(&scripted.catalog()).await.unwrap();

        assert_eq!(output, "spotify:track:7qiZfU4dY1lWllzX7mPBI3");
        assert_eq!(scripted.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_album_line_in_album_order() {
        let scripted = ScriptedCatalog::new();
        let endpoints = scripted.endpoints();
        scripted.respond(
            endpoints.search(EntityKind::Album, "Thriller"),
            album_search_json(&["thriller"]),
        );
        scripted.respond(
            endpoints.item(EntityKind::Album, "thriller"),
            album_json("thriller", "Thriller", 9),
        );

        let mut playlist = Playlist::parse("#ALBUM Thriller");
        let output = playlist.dispatch(&scripted.catalog()).await.unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 9);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(*line, format!("spotify:track:thriller-{}", i));
        }
    }

    #[tokio::test]
    async fn test_album_limit() {
        let scripted = ScriptedCatalog::new();
        let endpoints = scripted.endpoints();
        scripted.respond(
            endpoints.search(EntityKind::Album, "Ten"),
            album_search_json(&["ten"]),
        );
        scripted.respond(
            endpoints.item(EntityKind::Album, "ten"),
            album_json("ten", "Ten", 10),
        );

        let mut playlist = Playlist::parse("#ALBUM Ten").with_album_limit(Some(3));
        let output = playlist.dispatch(&scripted.catalog()).await.unwrap();

        assert_eq!(
            output,
            "spotify:track:ten-0\nspotify:track:ten-1\nspotify:track:ten-2"
        );
    }

    #[tokio::test]
    async fn test_order_by_popularity() {
        let scripted = ScriptedCatalog::new();
        let endpoints = scripted.endpoints();
        let fixtures = [("low", "t-low", 10), ("high", "t-high", 90), ("mid", "t-mid", 50)];
        for (query, id, popularity) in fixtures {
            scripted.respond(
                endpoints.search(EntityKind::Track, query),
                track_search_json(&[id]),
            );
            scripted.respond(
                endpoints.item(EntityKind::Track, id),
                full_track_json(id, query, popularity),
            );
        }

        let mut playlist = Playlist::parse("low\n#ORDER BY POPULARITY\nhigh\nmid");
        let output = playlist.dispatch(&scripted.catalog()).await.unwrap();

        assert_eq!(
            output,
            "spotify:track:t-high\nspotify:track:t-mid\nspotify:track:t-low"
        );
    }

    #[tokio::test]
    async fn test_order_by_popularity_fetches_album_tracks() {
        let scripted = ScriptedCatalog::new();
        let endpoints = scripted.endpoints();
        scripted.respond(
            endpoints.search(EntityKind::Album, "Duo"),
            album_search_json(&["duo"]),
        );
        scripted.respond(
            endpoints.item(EntityKind::Album, "duo"),
            album_json("duo", "Duo", 2),
        );
        scripted.respond(
            endpoints.item(EntityKind::Track, "duo-0"),
            full_track_json("duo-0", "Duo 0", 5),
        );
        scripted.respond(
            endpoints.item(EntityKind::Track, "duo-1"),
            full_track_json("duo-1", "Duo 1", 70),
        );

        let mut playlist = Playlist::parse("#ORDER BY POPULARITY\n#ALBUM Duo");
        let output = playlist.dispatch(&scripted.catalog()).await.unwrap();

        assert_eq!(output, "spotify:track:duo-1\nspotify:track:duo-0");
        assert_eq!(scripted.calls().len(), 4);
        assert_eq!(scripted.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_mixed_playlist_keeps_line_order() {
        let scripted = ScriptedCatalog::new();
        let endpoints = scripted.endpoints();
        scripted.respond(
            endpoints.search(EntityKind::Track, "first"),
            track_search_json(&["first"]),
        );
        scripted.respond(
            endpoints.item(EntityKind::Track, "first"),
            full_track_json("first", "first", 1),
        );
        scripted.respond(
            endpoints.search(EntityKind::Artist, "Duo Band"),
            artist_search_json("band", "Duo Band"),
        );
        scripted.respond(endpoints.artist_albums("band"), artist_albums_json(&["x", "y"]));
        scripted.respond(endpoints.item(EntityKind::Album, "x"), album_json("x", "X", 1));
        scripted.respond(endpoints.item(EntityKind::Album, "y"), album_json("y", "Y", 2));
        scripted.respond(
            endpoints.search(EntityKind::Track, "last"),
            track_search_json(&["last"]),
        );
        scripted.respond(
            endpoints.item(EntityKind::Track, "last"),
            full_track_json("last", "last", 1),
        );

        let mut playlist = Playlist::parse("first\n#ARTIST Duo Band\nlast");
        let output = playlist.dispatch(&scripted.catalog()).await.unwrap();

        assert_eq!(
            output,
            [
                "spotify:track:first",
                "spotify:track:x-0",
                "spotify:track:y-0",
                "spotify:track:y-1",
                "spotify:track:last",
            ]
            .join("\n")
        );
    }

    #[tokio::test]
    async fn test_failed_track_aborts_playlist() {
        let scripted = ScriptedCatalog::new();
        let endpoints = scripted.endpoints();
        scripted.respond(
            endpoints.search(EntityKind::Track, "good"),
            track_search_json(&["good"]),
        );
        scripted.respond(
            endpoints.item(EntityKind::Track, "good"),
            full_track_json("good", "good", 1),
        );
        scripted.respond(
            endpoints.search(EntityKind::Track, "asdfghjkl"),
            json!({"tracks": {"items": []}}),
        );

        let mut playlist = Playlist::parse("good\nasdfghjkl\nnever");
        let err = playlist.dispatch(&scripted.catalog()).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(playlist.tracks().is_empty());
        assert_eq!(playlist.render(), "");
    }

    #[tokio::test]
    async fn test_failed_track_skipped_when_configured() {
        let scripted = ScriptedCatalog::new();
        let endpoints = scripted.endpoints();
        scripted.respond(
            endpoints.search(EntityKind::Track, "good"),
            track_search_json(&["good"]),
        );
        scripted.respond(
            endpoints.item(EntityKind::Track, "good"),
            full_track_json("good", "good", 1),
        );
        let catalog = scripted
            .catalog()
            .with_failure_policy(FailurePolicy::SkipAndContinue);

        let mut playlist = Playlist::parse("asdfghjkl\ngood");
        let output = playlist.dispatch(&catalog).await.unwrap();

        assert_eq!(output, "spotify:track:good");
    }
}
