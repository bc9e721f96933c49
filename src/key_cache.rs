//! Gateway public key cache
//!
//! Gateway tokens name the key that signed them by id. The cache maps ids to
//! [`PublicKeyRecord`]s fetched lazily from a [`PublicKeySource`] and refreshes
//! once when an id is missing. A second miss right after that refresh is final.
//!
//! The record list is published as an immutable `Arc<[PublicKeyRecord]>`: a refresh
//! builds the new list completely and swaps it in under a short write lock, so a
//! reader always sees either the old list or the new one.

use crate::types::PublicKeyRecord;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Source of gateway public keys
///
/// [`crate::client::GatewayClient`] fetches keys over HTTP. Any
/// `Fn() -> Result<Vec<PublicKeyRecord>>` closure is a source as well.
#[async_trait]
pub trait PublicKeySource: Send + Sync {
    /// Fetch the full list of currently valid keys
    async fn fetch_public_keys(&self) -> Result<Vec<PublicKeyRecord>>;
}

#[async_trait]
impl<F> PublicKeySource for F
where
    F: Fn() -> Result<Vec<PublicKeyRecord>> + Send + Sync,
{
    async fn fetch_public_keys(&self) -> Result<Vec<PublicKeyRecord>> {
        self()
    }
}

#[derive(Debug)]
struct Snapshot {
    records: Arc<[PublicKeyRecord]>,
    generation: u64,
}

/// Public key cache with refresh-on-miss
#[derive(Debug)]
pub struct PublicKeyCache {
    state: RwLock<Snapshot>,
    refresh_guard: Mutex<()>,
}

impl PublicKeyCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Snapshot {
                records: Arc::from(Vec::new()),
                generation: 0,
            }),
            refresh_guard: Mutex::new(()),
        }
    }

    /// Resolve a key by id
    ///
    /// An empty cache is filled first. If the id is still unknown the cache is
    /// refreshed once; if it is missing after that, [`crate::MiroPayError::PublicKeyNotFound`]
    /// is returned. Errors from `source` are returned unchanged.
    pub async fn resolve(
        &self,
        key_id: &str,
        source: &dyn PublicKeySource,
    ) -> Result<PublicKeyRecord> {
        let (mut records, mut generation) = self.current().await;

        if records.is_empty() {
            (records, generation) = self.refresh(generation, source).await?;
        }

        if let Some(record) = find(&records, key_id) {
            return Ok(record.clone());
        }

        tracing::debug!(key_id, generation, "Public key not cached, refreshing");
        let (records, _) = self.refresh(generation, source).await?;

        find(&records, key_id).cloned().ok_or_else(|| {
            tracing::warn!(key_id, "Public key not found after refresh");
            crate::MiroPayError::public_key_not_found(key_id)
        })
    }

    /// Current record list
    pub async fn snapshot(&self) -> Arc<[PublicKeyRecord]> {
        self.state.read().await.records.clone()
    }

    /// Number of cached keys
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every cached key; the next resolve fetches again
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.records = Arc::from(Vec::new());
        state.generation += 1;
    }

    async fn current(&self) -> (Arc<[PublicKeyRecord]>, u64) {
        let state = self.state.read().await;
        (state.records.clone(), state.generation)
    }

    /// Replace the record list unless someone else already did since `seen_generation`
    async fn refresh(
        &self,
        seen_generation: u64,
        source: &dyn PublicKeySource,
    ) -> Result<(Arc<[PublicKeyRecord]>, u64)> {
        let _guard = self.refresh_guard.lock().await;

        {
            let state = self.state.read().await;
            if state.generation != seen_generation {
                tracing::debug!(
                    generation = state.generation,
                    "Public key cache refreshed concurrently, reusing result"
                );
                return Ok((state.records.clone(), state.generation));
            }
        }

        let records: Arc<[PublicKeyRecord]> = source.fetch_public_keys().await?.into();

        let mut state = self.state.write().await;
        state.records = records.clone();
        state.generation += 1;
        tracing::debug!(
            keys = records.len(),
            generation = state.generation,
            "Public key cache refreshed"
        );

        Ok((records, state.generation))
    }
}

impl Default for PublicKeyCache {
    fn default() -> Self {
        Self::new()
    }
}

fn find<'a>(records: &'a [PublicKeyRecord], key_id: &str) -> Option<&'a PublicKeyRecord> {
    records.iter().find(|record| record.id == key_id)
}
