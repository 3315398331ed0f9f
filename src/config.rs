// Settings module: everything configurable comes from environment
// variables (a `.env` file is honored by `main`). Only the folder id is
// required; the rest has working defaults.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::TokenCache;

/// Production endpoint of the remote file store. Overridable via
/// `DRIVE_API_BASE_URL` so tests can point the client at a local server.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

const DEFAULT_MENU_DELAY_MS: u64 = 1000;

/// Runtime settings for one session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Identifier of the folder whose files are listed and tagged.
    pub folder_id: String,
    pub api_base_url: String,
    /// Location of the externally provisioned token cache file.
    pub token_cache: PathBuf,
    /// Pause between menu iterations, to stay under the provider rate limit.
    pub menu_delay: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let folder_id = std::env::var("DRIVE_FOLDER_ID")
            .context("DRIVE_FOLDER_ID is not set; point it at the folder to manage")?;
        let folder_id = folder_id.trim().to_string();
        if folder_id.is_empty() {
            bail!("DRIVE_FOLDER_ID is set but empty");
        }

        let api_base_url = std::env::var("DRIVE_API_BASE_URL")
            .map(|url| normalize_base_url(&url))
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let token_cache = std::env::var("DRIVE_TOKEN_CACHE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| TokenCache::default_path());

        let menu_delay = match std::env::var("DRIVE_MENU_DELAY_MS") {
            Ok(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("DRIVE_MENU_DELAY_MS is not a number: {raw:?}"))?;
                Duration::from_millis(ms)
            }
            Err(_) => Duration::from_millis(DEFAULT_MENU_DELAY_MS),
        };

        Ok(Settings {
            folder_id,
            api_base_url,
            token_cache,
            menu_delay,
        })
    }
}

/// URLs are joined with `format!("{base}/files")`, so a trailing slash in
/// the override would produce double slashes.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_override_loses_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:9001/drive/v3/ "),
            "http://localhost:9001/drive/v3"
        );
        assert_eq!(
            normalize_base_url(DEFAULT_API_BASE_URL),
            DEFAULT_API_BASE_URL
        );
    }
}
