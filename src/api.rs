// API client module: a small blocking HTTP client that talks to the
// remote file store, plus the `FileStore` trait the tag manager is
// generic over. Only three calls exist: list the folder, read one file's
// property bag, write it back.

use crate::auth::{CredentialError, CredentialProvider};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

pub use reqwest::StatusCode;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One file as returned by the remote store. The `"tags"` entry of
/// `properties` holds the encoded tag list (see `tags`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Opaque provider-assigned identifier.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    files: Vec<FileRecord>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PropertiesOnly {
    #[serde(default)]
    properties: HashMap<String, String>,
}

#[derive(Serialize)]
struct PropertiesPatch<'a> {
    properties: &'a HashMap<String, String>,
}

/// Remote operations the tag manager needs. `DriveClient` is the real
/// implementation; tests inject an in-memory double.
pub trait FileStore {
    /// All files directly under `folder_id`, across every result page.
    fn list_files(&self, folder_id: &str) -> StoreResult<Vec<FileRecord>>;

    /// The file's full property bag, fetch restricted to that field.
    fn get_properties(&self, file_id: &str) -> StoreResult<HashMap<String, String>>;

    /// Replace the file's property bag with `properties`.
    fn update_properties(
        &self,
        file_id: &str,
        properties: &HashMap<String, String>,
    ) -> StoreResult<()>;
}

// Borrowed stores work too, so callers can keep hold of the concrete
// store while a manager uses it.
impl<S: FileStore + ?Sized> FileStore for &S {
    fn list_files(&self, folder_id: &str) -> StoreResult<Vec<FileRecord>> {
        (**self).list_files(folder_id)
    }

    fn get_properties(&self, file_id: &str) -> StoreResult<HashMap<String, String>> {
        (**self).get_properties(file_id)
    }

    fn update_properties(
        &self,
        file_id: &str,
        properties: &HashMap<String, String>,
    ) -> StoreResult<()> {
        (**self).update_properties(file_id, properties)
    }
}

const PAGE_SIZE: &str = "100";
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, properties)";

/// Blocking client for a Drive-v3-shaped API. Holds the base URL and the
/// credential provider supplying the bearer token per request.
pub struct DriveClient {
    client: Client,
    base_url: String,
    credentials: Box<dyn CredentialProvider>,
}

impl DriveClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Box<dyn CredentialProvider>,
    ) -> StoreResult<Self> {
        let client = Client::builder().build()?;
        Ok(DriveClient {
            client,
            base_url: base_url.into(),
            credentials,
        })
    }

    /// Token is re-read per request so an externally refreshed cache takes
    /// effect mid-session.
    fn bearer(&self) -> StoreResult<String> {
        Ok(self.credentials.access_token()?.secret().to_string())
    }

    fn check(res: Response) -> StoreResult<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().unwrap_or_default();
        Err(StoreError::Api { status, body })
    }
}

impl FileStore for DriveClient {
    fn list_files(&self, folder_id: &str) -> StoreResult<Vec<FileRecord>> {
        let url = format!("{}/files", self.base_url);
        let query = format!("'{}' in parents", folder_id);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self.client.get(&url).bearer_auth(self.bearer()?).query(&[
                ("q", query.as_str()),
                ("pageSize", PAGE_SIZE),
                ("fields", LIST_FIELDS),
            ]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }
            let res = Self::check(req.send()?)?;
            let page: FileListPage = res.json()?;
            debug!(page_files = page.files.len(), "fetched listing page");
            files.extend(page.files);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(files)
    }

    fn get_properties(&self, file_id: &str) -> StoreResult<HashMap<String, String>> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        let res = self
            .client
            .get(&url)
            .bearer_auth(self.bearer()?)
            .query(&[("fields", "properties")])
            .send()?;
        let parsed: PropertiesOnly = Self::check(res)?.json()?;
        Ok(parsed.properties)
    }

    fn update_properties(
        &self,
        file_id: &str,
        properties: &HashMap<String, String>,
    ) -> StoreResult<()> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        let res = self
            .client
            .patch(&url)
            .bearer_auth(self.bearer()?)
            .query(&[("fields", "properties")])
            .json(&PropertiesPatch { properties })
            .send()?;
        Self::check(res)?;
        Ok(())
    }
}
