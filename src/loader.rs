//! Reading schema documents.
//!
//! A document source is either a local path or, with the `remote` feature,
//! an `http(s)://` URL. Raw JSON is read first and deserialized into a
//! [`SchemaDocument`] as a separate step so the linter can validate the
//! structure in between.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::LoadError;
use crate::types::SchemaDocument;

#[cfg(feature = "remote")]
const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Where a schema document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Url(String),
}

impl DocumentSource {
    /// Classify a CLI argument: `http://` and `https://` prefixes mean a URL.
    pub fn parse(source: &str) -> Self {
        if is_url(source) {
            DocumentSource::Url(source.to_string())
        } else {
            DocumentSource::File(PathBuf::from(source))
        }
    }

    pub fn read_json(&self) -> Result<Value, LoadError> {
        match self {
            DocumentSource::File(path) => load_json(path),
            #[cfg(feature = "remote")]
            DocumentSource::Url(url) => load_json_url(url),
            // Without an HTTP client a URL can only be a missing file.
            #[cfg(not(feature = "remote"))]
            DocumentSource::Url(url) => Err(LoadError::FileNotFound {
                path: PathBuf::from(url),
            }),
        }
    }
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read and parse a JSON file.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::ReadError {
            path: path.to_path_buf(),
            source,
        },
    })?;
    load_json_str(&content)
}

pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Fetch a JSON body with a blocking GET.
///
/// Transport failures, non-2xx statuses and undecodable bodies all surface
/// as `LoadError::NetworkError`.
#[cfg(feature = "remote")]
pub fn load_json_url(url: &str) -> Result<Value, LoadError> {
    let fetch_failed = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .and_then(|client| client.get(url).send())
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(fetch_failed)
}

/// Read raw JSON from a path or URL given as one string.
pub fn load_json_auto(source: &str) -> Result<Value, LoadError> {
    DocumentSource::parse(source).read_json()
}

/// Deserialize a [`SchemaDocument`] from already-parsed JSON.
pub fn parse_document(value: Value) -> Result<SchemaDocument, LoadError> {
    serde_json::from_value(value).map_err(|source| LoadError::InvalidDocument { source })
}

pub fn load_document(path: &Path) -> Result<SchemaDocument, LoadError> {
    parse_document(load_json(path)?)
}

/// Load a document from a path or URL; see [`DocumentSource::parse`].
pub fn load_document_auto(source: &str) -> Result<SchemaDocument, LoadError> {
    parse_document(load_json_auto(source)?)
}
