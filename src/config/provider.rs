//! Reloadable configuration snapshots

use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::core::types::Result;
use super::removal::RemovalConfig;

/// Hands out immutable configuration snapshots
///
/// A session captures the snapshot current at its creation, so `reload` only
/// affects sessions created afterwards.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    current: RwLock<Arc<RemovalConfig>>,
}

impl ConfigProvider {
    /// Create a provider serving the given configuration
    pub fn new(config: RemovalConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<RemovalConfig> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the served configuration
    pub fn reload(&self, config: RemovalConfig) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(config);
        log::info!("Removal config reloaded");
    }

    /// Reload from a JSON document on disk; the old snapshot stays on error
    pub fn reload_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let config = RemovalConfig::load_from_path(path)?;
        self.reload(config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemovalMode;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_survives_reload() {
        let provider = ConfigProvider::new(RemovalConfig::default());
        let before = provider.snapshot();

        let mut updated = RemovalConfig::default();
        updated.leaf_removal_mode = RemovalMode::Aggressive;
        provider.reload(updated);

        assert_eq!(before.leaf_removal_mode, RemovalMode::Smart);
        assert_eq!(provider.snapshot().leaf_removal_mode, RemovalMode::Aggressive);
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("removal.json");
        std::fs::write(&path, "{ broken").expect("write failed");

        let provider = ConfigProvider::new(RemovalConfig::default());
        assert!(provider.reload_from_path(&path).is_err());
        assert_eq!(*provider.snapshot(), RemovalConfig::default());

        std::fs::write(&path, r#"{ "leaf-removal-batch-size": 5 }"#).expect("write failed");
        provider.reload_from_path(&path).expect("reload failed");
        assert_eq!(provider.snapshot().leaf_removal_batch_size, 5);
    }
}
