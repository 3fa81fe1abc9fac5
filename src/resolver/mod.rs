pub mod album;
pub mod artist;
pub mod query;
pub mod queue;
pub mod track;
pub mod types;

use std::fmt;

use crate::error::ResolveError;
use crate::services::catalog::Catalog;

pub use album::Album;
pub use artist::Artist;
pub use query::Query;
pub use queue::{Entry, Queue};
pub use track::Track;

/// Something that resolves, through one or more catalog lookups, into tracks.
///
/// A track resolves to a single [`Entry::Item`]; albums and artists resolve
/// to an [`Entry::Queue`] of tracks. `Display` is the text shown in
/// diagnostics when resolution fails.
#[async_trait::async_trait]
pub trait Resolvable: fmt::Display + Send {
    async fn dispatch(&mut self, catalog: &Catalog) -> Result<Entry<Track>, ResolveError>;
}
