pub mod client;
pub mod endpoints;

use std::sync::Arc;

use serde_json::Value;

use crate::config::FailurePolicy;
use crate::error::{EntityKind, LookupError};
use crate::ports::catalog::CatalogLookup;

pub use client::HttpCatalogLookup;
pub use endpoints::Endpoints;

/// What the resolvers talk to: a lookup port, the URL scheme of the catalog,
/// and the policy for queries that fail to resolve.
#[derive(Clone)]
pub struct Catalog {
    lookup: Arc<dyn CatalogLookup>,
    endpoints: Endpoints,
    failure_policy: FailurePolicy,
}

impl Catalog {
    pub fn new(lookup: Arc<dyn CatalogLookup>, endpoints: Endpoints) -> Self {
        Self {
            lookup,
            endpoints,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub async fn search(&self, kind: EntityKind, query: &str) -> Result<Value, LookupError> {
        self.lookup.lookup(&self.endpoints.search(kind, query)).await
    }

    pub async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Value, LookupError> {
        self.lookup.lookup(&self.endpoints.item(kind, id)).await
    }

    pub async fn artist_albums(&self, artist_id: &str) -> Result<Value, LookupError> {
        self.lookup
            .lookup(&self.endpoints.artist_albums(artist_id))
            .await
    }
}
