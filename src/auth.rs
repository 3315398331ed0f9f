// Credential module: the OAuth2 dance (consent, acquisition, refresh) is
// owned by an external tool; this program only consumes the resulting
// token. `TokenCache` reads that token from a JSON file on disk and hands
// it out as an opaque capability, so the rest of the crate never touches
// the filesystem for credentials.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("token cache not found at {0} (provision a token there first)")]
    Missing(PathBuf),
    #[error("failed to read token cache {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("token cache {path} is not valid token JSON: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("token cache {0} holds an empty access token")]
    EmptyToken(PathBuf),
}

/// Opaque capability token authorizing calls against the remote store.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn secret(&self) -> &str {
        &self.0
    }
}

// Keep the token out of logs and error chains.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Source of the capability token. Injected into the HTTP client so tests
/// and future auth schemes can swap the implementation.
pub trait CredentialProvider {
    fn access_token(&self) -> Result<AccessToken, CredentialError>;
}

/// Shape of the cached token file. Extra fields (refresh token, expiry)
/// written by the provisioning tool are ignored here.
#[derive(Deserialize)]
struct CachedToken {
    access_token: String,
}

/// File-backed token cache, by default under the user's home directory.
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: PathBuf) -> Self {
        TokenCache { path }
    }

    /// Default cache location: `~/.drivetags/token.json`.
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".drivetags").join("token.json")
    }
}

impl CredentialProvider for TokenCache {
    /// Re-reads the file on every call so an externally refreshed token is
    /// picked up without restarting the program.
    fn access_token(&self) -> Result<AccessToken, CredentialError> {
        let data = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CredentialError::Missing(self.path.clone())
            } else {
                CredentialError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;
        let cached: CachedToken =
            serde_json::from_str(&data).map_err(|e| CredentialError::Malformed {
                path: self.path.clone(),
                source: e,
            })?;
        if cached.access_token.trim().is_empty() {
            return Err(CredentialError::EmptyToken(self.path.clone()));
        }
        Ok(AccessToken(cached.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_token_from_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, r#"{{"access_token": "tok-123", "refresh_token": "r"}}"#).unwrap();

        let cache = TokenCache::new(path);
        let token = cache.access_token().unwrap();
        assert_eq!(token.secret(), "tok-123");
    }

    #[test]
    fn missing_cache_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("absent.json"));
        assert!(matches!(
            cache.access_token(),
            Err(CredentialError::Missing(_))
        ));
    }

    #[test]
    fn malformed_cache_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();
        let cache = TokenCache::new(path);
        assert!(matches!(
            cache.access_token(),
            Err(CredentialError::Malformed { .. })
        ));
    }

    #[test]
    fn empty_token_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, r#"{"access_token": "  "}"#).unwrap();
        let cache = TokenCache::new(path);
        assert!(matches!(
            cache.access_token(),
            Err(CredentialError::EmptyToken(_))
        ));
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let token = AccessToken("very-secret".into());
        assert!(!format!("{:?}", token).contains("very-secret"));
    }
}
