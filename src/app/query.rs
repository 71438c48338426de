use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::{App, Plugin, PluginError};

/// Defaults applied to every query made through the [`QueryClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QueryPluginOptions {
    /// How long a fetched value is served from cache. 0 always refetches.
    pub stale_time_secs: u64,
    /// Extra attempts after a failed fetch.
    pub retry: u32,
}

impl QueryPluginOptions {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }
}

struct CachedEntry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

/// Keyed cache of fetched values.
#[derive(Clone)]
pub struct QueryClient {
    options: QueryPluginOptions,
    cache: Arc<Mutex<HashMap<String, CachedEntry>>>,
}

impl QueryClient {
    pub fn new(options: QueryPluginOptions) -> Self {
        Self {
            options,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn options(&self) -> &QueryPluginOptions {
        &self.options
    }

    /// Serve `key` from cache while fresh, otherwise run `fetcher`, retrying
    /// up to `retry` more times. The last error is returned as is.
    pub async fn fetch<T, E, F, Fut>(&self, key: &str, mut fetcher: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.fresh::<T>(key) {
            tracing::trace!(key, "Query served from cache");
            return Ok(value);
        }

        let mut attempt = 0;
        let value = loop {
            match fetcher().await {
                Ok(value) => break value,
                Err(err) if attempt < self.options.retry => {
                    attempt += 1;
                    tracing::warn!(key, attempt, error = %err, "Query failed, retrying");
                }
                Err(err) => return Err(err),
            }
        };

        self.set_query_data(key, value.clone());
        Ok(value)
    }

    /// Seed or overwrite the cached value for `key`.
    pub fn set_query_data<T>(&self, key: &str, value: T)
    where
        T: Send + Sync + 'static,
    {
        let entry = CachedEntry {
            value: Arc::new(value),
            fetched_at: Instant::now(),
        };
        self.lock().insert(key.to_string(), entry);
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    fn fresh<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        let cache = self.lock();
        let entry = cache.get(key)?;
        if entry.fetched_at.elapsed() >= self.options.stale_time() {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedEntry>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("options", &self.options)
            .field("cached", &self.lock().len())
            .finish()
    }
}

/// Installs a [`QueryClient`] built from [`QueryPluginOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryPlugin;

impl Plugin for QueryPlugin {
    const NAME: &'static str = "query";
    type Options = QueryPluginOptions;

    fn requires(&self) -> &'static [&'static str] {
        &["router"]
    }

    fn install(self, app: &mut App, options: QueryPluginOptions) -> Result<(), PluginError> {
        tracing::trace!(?options, "Installing query client");
        app.provide(QueryClient::new(options));
        Ok(())
    }
}
