//! # precache
//!
//! A cache-first offline worker: a fixed manifest of assets is pre-cached
//! into a named bucket at install time, and every intercepted request is
//! answered from that bucket when possible, falling back to the network
//! otherwise. Miss responses are never cached, so the bucket holds exactly
//! the manifest for the worker's lifetime.
//!
//! Storage and network are capability traits ([`CacheStore`],
//! [`NetworkFetcher`]), so the controller runs the same against the
//! shipped in-memory store and TCP fetcher or against test doubles.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use precache::{MemoryStore, Request, TcpFetcher, WorkerConfig, WorkerController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let worker = WorkerController::new(
//!         WorkerConfig::root(),
//!         MemoryStore::new(),
//!         TcpFetcher::new("127.0.0.1:8000"),
//!     );
//!
//!     worker.on_install().await?;
//!     let response = worker.on_fetch(&Request::get("/logo.svg")).await?;
//!     println!("{}", response.status());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod http;
pub mod net;
pub mod store;
pub mod worker;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use config::WorkerConfig;
pub use http::{CacheKey, Headers, Method, Request, Response, StatusCode};
pub use net::{FetchError, NetworkFetcher, TcpFetcher};
pub use store::{CacheStore, MemoryStore, StoreError};
pub use worker::{InstallError, ServeError, WorkerController, WorkerState};
