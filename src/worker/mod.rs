//! The offline-cache worker controller.
//!
//! [`WorkerController`] is the explicit form of a service worker script
//! that registers `install` and `fetch` handlers: the two handlers become
//! the [`on_install`](WorkerController::on_install) and
//! [`on_fetch`](WorkerController::on_fetch) methods, and the ambient
//! platform facilities (cache storage, network) become injected
//! capabilities. The hosting runtime is expected to call `on_install`
//! once, and `on_fetch` for every intercepted request after activation.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::WorkerConfig;
use crate::http::{Request, Response, StatusCode};
use crate::net::{FetchError, NetworkFetcher};
use crate::store::{CacheStore, StoreError};

/// Lifecycle state of a worker instance.
///
/// A worker only ever moves forward: once `Active`, it stays active until
/// the deployment replaces it with a new worker version entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Manifest population has not completed successfully.
    Installing,
    /// Install finished; fetch interception is live.
    Active,
}

/// Errors that abort installation.
///
/// Installation is all-or-nothing: the first failing asset stops the pass
/// and the worker never reaches [`WorkerState::Active`]. Entries written
/// before the failure may remain in the bucket; they are harmless because
/// an uninstalled worker version is never promoted to serve traffic.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to fetch {path:?} during install: {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },

    #[error("pre-cache fetch of {path:?} returned non-success status {status}")]
    BadStatus { path: String, status: StatusCode },

    #[error("cache storage failed during install: {0}")]
    Store(#[from] StoreError),
}

/// Errors that fail an intercepted fetch.
///
/// A network failure on a cache miss is handed back untranslated, exactly
/// as if no worker were present. There is no synthetic fallback response.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("network fetch failed: {0}")]
    Network(#[from] FetchError),

    #[error("cache lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// A cache-first offline worker.
///
/// On install, every path in the configured manifest is fetched and stored
/// in the configured cache bucket. On fetch, the bucket is consulted by
/// exact key first and the network is the fallback; miss responses are
/// never written back, so the bucket holds exactly the manifest for the
/// worker's whole lifetime.
///
/// # Examples
///
/// ```rust,no_run
/// use precache::config::WorkerConfig;
/// use precache::http::Request;
/// use precache::net::TcpFetcher;
/// use precache::store::MemoryStore;
/// use precache::worker::WorkerController;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let worker = WorkerController::new(
///     WorkerConfig::hub(),
///     MemoryStore::new(),
///     TcpFetcher::new("127.0.0.1:8000"),
/// );
///
/// worker.on_install().await?;
/// let response = worker.on_fetch(&Request::get("/hub/static/logo.svg")).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
pub struct WorkerController<S, N> {
    config: WorkerConfig,
    store: S,
    fetcher: N,
    activated: AtomicBool,
}

impl<S: CacheStore, N: NetworkFetcher> WorkerController<S, N> {
    /// Creates a controller from a deployment config and its injected
    /// storage and network capabilities.
    pub fn new(config: WorkerConfig, store: S, fetcher: N) -> Self {
        Self {
            config,
            store,
            fetcher,
            activated: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        if self.activated.load(Ordering::Acquire) {
            WorkerState::Active
        } else {
            WorkerState::Installing
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// The injected cache store. Mainly useful for introspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handles the install lifecycle event.
    ///
    /// Opens (creating if absent) the configured cache bucket, then
    /// fetches and stores every manifest path in declaration order. The
    /// caller must treat the returned future like `waitUntil`: the worker
    /// is installed only once it resolves `Ok`.
    ///
    /// # Errors
    ///
    /// The first asset that fails to fetch, returns a non-2xx status, or
    /// fails to store aborts the pass; the state stays
    /// [`WorkerState::Installing`] so the hosting runtime can retry a
    /// fresh install later.
    pub async fn on_install(&self) -> Result<(), InstallError> {
        let bucket = self.config.cache_name();
        self.store.open(bucket).await?;

        for path in self.config.manifest() {
            let request = Request::get(path.clone());
            let response =
                self.fetcher
                    .fetch(&request)
                    .await
                    .map_err(|source| InstallError::Fetch {
                        path: path.clone(),
                        source,
                    })?;

            if !response.is_success() {
                warn!(path = %path, status = %response.status(), "pre-cache fetch rejected");
                return Err(InstallError::BadStatus {
                    path: path.clone(),
                    status: response.status(),
                });
            }

            self.store.put(bucket, request.cache_key(), response).await?;
            debug!(path = %path, bucket = %bucket, "asset pre-cached");
        }

        self.activated.store(true, Ordering::Release);
        info!(
            bucket = %bucket,
            assets = self.config.manifest().len(),
            "worker installed"
        );
        Ok(())
    }

    /// Handles an intercepted fetch event.
    ///
    /// Cache-first: an exact-key hit is served straight from the bucket
    /// without touching the network. On a miss the request is delegated to
    /// the network fetcher exactly once and its outcome — success or
    /// failure — is returned as-is. Miss responses are not cached.
    pub async fn on_fetch(&self, request: &Request) -> Result<Response, ServeError> {
        let key = request.cache_key();

        if let Some(cached) = self.store.lookup(self.config.cache_name(), &key).await? {
            debug!(key = %key, "serving from cache");
            return Ok(cached);
        }

        debug!(key = %key, "cache miss, falling back to network");
        Ok(self.fetcher.fetch(request).await?)
    }
}
