use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use object_store::ObjectStore;
use object_store::local::LocalFileSystem;

/// Default backend base URL for a local deployment.
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Returns the base path for session and artifact storage.
#[must_use]
pub fn get_base_path() -> PathBuf {
    dotenvy::dotenv().ok();

    #[cfg(target_os = "linux")]
    let base_path_unwrap = PathBuf::from("/workspace/fedsync");

    #[cfg(target_os = "windows")]
    let base_path_unwrap = PathBuf::from(r"C:\fedsync");

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    let base_path_unwrap = PathBuf::from(".fedsync");

    std::env::var("FEDSYNC_HOME").map_or_else(|_| base_path_unwrap, PathBuf::from)
}

/// Global object store for downloaded model artifacts, lazily initialized.
pub static OBJECT_STORE: LazyLock<Arc<dyn ObjectStore>> = LazyLock::new(|| {
    let base_path = get_base_path().join("artifacts");

    std::fs::create_dir_all(&base_path).expect("Failed to create artifact store directory");

    Arc::new(LocalFileSystem::new_with_prefix(&base_path).expect("Failed to create object store"))
});

pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::from_env().expect("Failed to create config"));

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Coordination backend base URL
    pub backend_url: String,

    /// Base directory for session and artifact storage
    pub base_path: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `FEDSYNC_BACKEND_URL`: backend base URL (default: `http://127.0.0.1:8000`)
    /// - `FEDSYNC_HOME`: base directory for session and artifact storage
    ///
    /// # Errors
    ///
    /// Returns an error if `FEDSYNC_BACKEND_URL` is set but not an HTTP URL.
    fn from_env() -> anyhow::Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        let backend_url = std::env::var("FEDSYNC_BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());

        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            anyhow::bail!("FEDSYNC_BACKEND_URL must be an http(s) URL, got '{backend_url}'");
        }

        // Query paths are joined onto the base without a separator
        let backend_url = backend_url.trim_end_matches('/').to_string();

        Ok(Self {
            backend_url,
            base_path: get_base_path(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_url_passes_from_env_check() {
        assert!(DEFAULT_BACKEND_URL.starts_with("http://"));
        assert!(!DEFAULT_BACKEND_URL.ends_with('/'));
    }
}
