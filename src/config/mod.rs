//! Worker configuration: cache bucket name plus asset manifest.
//!
//! The two shipped deployments serve the same logic with different
//! manifests, so each is just a [`WorkerConfig`] instance. Configs also
//! round-trip through JSON so a deployment can keep its manifest in a
//! file instead of code.

use serde::{Deserialize, Serialize};

/// Name of the cache bucket both shipped deployments use. Bumping the
/// version suffix is how a new deployment invalidates old entries.
pub const DEFAULT_CACHE_NAME: &str = "nukelab-cache-v1";

/// Configuration for one worker deployment.
///
/// # Examples
///
/// ```
/// use precache::config::WorkerConfig;
///
/// let cfg = WorkerConfig::root();
/// assert_eq!(cfg.cache_name(), "nukelab-cache-v1");
/// assert_eq!(cfg.manifest().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    cache_name: String,
    manifest: Vec<String>,
}

impl WorkerConfig {
    /// Creates a config from a cache bucket name and a manifest of
    /// origin-relative asset paths. Manifest order is preserved.
    pub fn new(
        cache_name: impl Into<String>,
        manifest: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            cache_name: cache_name.into(),
            manifest: manifest.into_iter().map(Into::into).collect(),
        }
    }

    /// The deployment serving assets from the origin root.
    pub fn root() -> Self {
        Self::new(
            DEFAULT_CACHE_NAME,
            ["/", "/manifest.json", "/logo.svg", "/logo.png"],
        )
    }

    /// The deployment serving assets from under the `/hub/static` prefix.
    pub fn hub() -> Self {
        Self::new(
            DEFAULT_CACHE_NAME,
            [
                "/",
                "/hub/static/manifest.json",
                "/hub/static/logo.svg",
                "/hub/static/logo.png",
            ],
        )
    }

    /// Parses a config from a JSON document of the form
    /// `{"cache_name": "...", "manifest": ["/", ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Asset paths pre-fetched at install time, in declaration order.
    pub fn manifest(&self) -> &[String] {
        &self.manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_variants_share_cache_name() {
        assert_eq!(WorkerConfig::root().cache_name(), WorkerConfig::hub().cache_name());
    }

    #[test]
    fn variants_differ_only_in_manifest() {
        let root = WorkerConfig::root();
        let hub = WorkerConfig::hub();
        assert_eq!(root.manifest()[0], "/");
        assert_eq!(hub.manifest()[1], "/hub/static/manifest.json");
        assert_ne!(root.manifest(), hub.manifest());
    }

    #[test]
    fn json_round_trip() {
        let cfg = WorkerConfig::new("test-cache-v2", ["/", "/app.css"]);
        let json = serde_json::to_string(&cfg).unwrap();
        let back = WorkerConfig::from_json_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn json_literal_parses() {
        let cfg = WorkerConfig::from_json_str(
            r#"{"cache_name":"c1","manifest":["/","/logo.png"]}"#,
        )
        .unwrap();
        assert_eq!(cfg.cache_name(), "c1");
        assert_eq!(cfg.manifest(), ["/", "/logo.png"]);
    }
}
