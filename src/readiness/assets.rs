//! Execution context backed by an asset directory that is filled asynchronously.
use super::{Capability, ExecutionContext};
use crate::config::{load_config, Configuration, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Asset file standing in for each library capability.
fn asset_rel(capability: Capability) -> Option<&'static str> {
    match capability {
        Capability::GridWidget => Some("vendor/handsontable.min.js"),
        Capability::ModalToolkit => Some("vendor/bootstrap.bundle.min.js"),
        Capability::DialogLibrary => Some("vendor/sweetalert2.all.min.js"),
        Capability::Configuration => None,
    }
}

/// Capabilities are present once their asset file exists and is non-empty.
/// The configuration is read from `config.json` on first successful load and
/// then frozen.
#[derive(Debug)]
pub struct AssetDirContext {
    root: PathBuf,
    configuration: Option<Arc<Configuration>>,
}

impl AssetDirContext {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            configuration: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative asset paths for the library capabilities, in check order.
    pub fn asset_paths() -> Vec<&'static str> {
        Capability::REQUIRED
            .into_iter()
            .filter_map(asset_rel)
            .collect()
    }
}

impl ExecutionContext for AssetDirContext {
    fn is_present(&self, capability: Capability) -> bool {
        let Some(rel) = asset_rel(capability) else {
            return self.configuration.is_some();
        };
        std::fs::metadata(self.root.join(rel))
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    fn configuration(&mut self) -> Option<Arc<Configuration>> {
        if let Some(config) = &self.configuration {
            return Some(config.clone());
        }
        let path = self.root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return None;
        }
        match load_config(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "configuration loaded");
                let config = Arc::new(config);
                self.configuration = Some(config.clone());
                Some(config)
            }
            Err(err) => {
                tracing::error!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "configuration unusable"
                );
                None
            }
        }
    }

    fn install_configuration(&mut self, config: Configuration) -> Arc<Configuration> {
        let config = Arc::new(config);
        self.configuration = Some(config.clone());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fallback_config;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write asset");
    }

    #[test]
    fn empty_asset_files_do_not_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "vendor/handsontable.min.js", "");
        let context = AssetDirContext::new(dir.path().to_path_buf());
        assert!(!context.is_present(Capability::GridWidget));

        write(dir.path(), "vendor/handsontable.min.js", "/* grid */");
        assert!(context.is_present(Capability::GridWidget));
    }

    #[test]
    fn configuration_is_frozen_after_first_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = fallback_config();
        config.ai.max_context_items = 3;
        write(
            dir.path(),
            CONFIG_FILE_NAME,
            &serde_json::to_string(&config).expect("serialize"),
        );

        let mut context = AssetDirContext::new(dir.path().to_path_buf());
        let first = context.configuration().expect("configuration");
        assert_eq!(first.ai.max_context_items, 3);

        write(dir.path(), CONFIG_FILE_NAME, "{}");
        let second = context.configuration().expect("configuration");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn malformed_configuration_counts_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), CONFIG_FILE_NAME, "{ nope");
        let mut context = AssetDirContext::new(dir.path().to_path_buf());
        assert!(context.configuration().is_none());
    }
}
