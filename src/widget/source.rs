//! Where the activity document is read from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use super::WidgetError;
use crate::http_client::HttpClient;

/// Default location of the activity document, relative to the site root.
pub const DEFAULT_DATA_PATH: &str = "data/github_activity.json";

/// A single readable copy of the activity document.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Human-readable location, used in diagnostics.
    fn location(&self) -> String;

    /// Read the raw document body.
    async fn read(&self) -> Result<String, WidgetError>;
}

/// Activity document served over HTTP.
pub struct HttpSource {
    client: HttpClient,
    url: Url,
}

impl HttpSource {
    pub fn new(client: HttpClient, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ActivitySource for HttpSource {
    fn location(&self) -> String {
        self.url.to_string()
    }

    async fn read(&self) -> Result<String, WidgetError> {
        let response = self
            .client
            .get(self.url.as_str())
            .await
            .map_err(|e| WidgetError::unavailable(self.location(), e))?;

        if !response.is_success() {
            return Err(WidgetError::unavailable(
                self.location(),
                format!("HTTP {}", response.status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| WidgetError::unavailable(self.location(), e))
    }
}

/// Activity document on the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ActivitySource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<String, WidgetError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| WidgetError::unavailable(self.location(), e))
    }
}

/// Pick a source for a site root that is either an `http(s)` URL or a directory.
///
/// URLs resolve `data_path` the way a browser resolves a relative fetch.
pub fn source_for_site(
    site: &str,
    data_path: &str,
    client: &HttpClient,
) -> Result<Box<dyn ActivitySource>, url::ParseError> {
    if site.starts_with("http://") || site.starts_with("https://") {
        let url = Url::parse(site)?.join(data_path)?;
        Ok(Box::new(HttpSource::new(client.clone(), url)))
    } else {
        Ok(Box::new(FileSource::new(Path::new(site).join(data_path))))
    }
}
