use color_eyre::Result;
use color_eyre::eyre::Context;
use url::Url;

use crate::error::EntityKind;

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1/";

/// Builds the catalog URLs the resolvers look up.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .wrap_err_with(|| format!("Invalid catalog base URL: {}", base_url))?;
        let mut base = base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self { base })
    }

    /// https://developer.spotify.com/documentation/web-api/reference/search
    pub fn search(&self, kind: EntityKind, query: &str) -> String {
        format!(
            "{}search?type={}&q={}",
            self.base,
            kind,
            urlencoding::encode(query)
        )
    }

    pub fn item(&self, kind: EntityKind, id: &str) -> String {
        format!("{}{}s/{}", self.base, kind, urlencoding::encode(id))
    }

    /// First page of an artist's albums.
    pub fn artist_albums(&self, artist_id: &str) -> String {
        format!(
            "{}artists/{}/albums",
            self.base,
            urlencoding::encode(artist_id)
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}
