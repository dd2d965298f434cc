//! Cached access to the station list.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, info};

use crate::geo::{self, Coordinate};

use super::error::StationError;
use super::source::StationSource;
use super::types::Station;

/// Default time the station list is served from memory.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Station list shared between requests.
type StationList = Arc<Vec<Station>>;

/// Station lookups backed by a short-lived cache.
///
/// The whole list is cached as one entry. Concurrent misses share a single
/// load, so a burst of requests after expiry hits the provider once.
pub struct StationService {
    source: StationSource,
    cache: MokaCache<(), StationList>,
}

impl StationService {
    /// Create a service that keeps the list for `ttl`.
    pub fn new(source: StationSource, ttl: Duration) -> Self {
        let cache = MokaCache::builder().time_to_live(ttl).build();

        Self { source, cache }
    }

    /// All stations, loading them if the cached copy has expired.
    pub async fn all(&self) -> Result<StationList, Arc<StationError>> {
        self.cache
            .try_get_with((), async {
                let stations = self.source.load().await?;
                info!(count = stations.len(), source = %self.source.describe(), "loaded stations");
                Ok::<_, StationError>(Arc::new(stations))
            })
            .await
    }

    /// Look up a station by its numeric id.
    ///
    /// Ids that are not integers never match.
    pub async fn get(&self, id: &str) -> Result<Option<Station>, Arc<StationError>> {
        let Ok(id) = id.parse::<i64>() else {
            debug!(id, "station id is not numeric");
            return Ok(None);
        };

        let stations = self.all().await?;
        Ok(stations.iter().find(|s| s.id == id).cloned())
    }

    /// The `limit` stations closest to `origin`, nearest first.
    pub async fn nearby(
        &self,
        origin: Coordinate,
        limit: usize,
    ) -> Result<Vec<Station>, Arc<StationError>> {
        let stations = self.all().await?;
        Ok(geo::nearest(origin, &stations, limit)
            .into_iter()
            .cloned()
            .collect())
    }
}
