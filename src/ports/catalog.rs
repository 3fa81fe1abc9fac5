use serde_json::Value;

use crate::error::LookupError;

/// Port trait wrapping the single remote call the resolvers depend on.
///
/// Implementations live in `services::catalog::client` (production) or test fakes.
/// A lookup resolves one fully built URL to its parsed JSON body.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn lookup(&self, url: &str) -> Result<Value, LookupError>;
}
