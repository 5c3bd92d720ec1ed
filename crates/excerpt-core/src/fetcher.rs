use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Resolves a source reference to its raw text.
///
/// The include pipeline calls this exactly once per distinct reference in a
/// document; implementations need not cache.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Fetch the full text behind `reference`.
    async fn resolve(&self, reference: &str) -> Result<String>;
}

#[async_trait]
impl<T: SourceResolver + ?Sized> SourceResolver for std::sync::Arc<T> {
    async fn resolve(&self, reference: &str) -> Result<String> {
        self.as_ref().resolve(reference).await
    }
}

/// Where relative references are resolved from.
#[derive(Debug, Clone)]
enum Base {
    Dir(PathBuf),
    Url(Url),
}

/// Resolver for local files and `http(s)` URLs
pub struct Fetcher {
    client: Client,
    base: Base,
}

impl Fetcher {
    /// Creates a new fetcher resolving relative paths from the working directory
    pub fn new() -> Result<Self> {
        Self::with_options(Duration::from_secs(30), default_user_agent())
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_options(timeout, default_user_agent())
    }

    /// Creates a new fetcher with explicit client settings
    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            base: Base::Dir(PathBuf::from(".")),
        })
    }

    /// Resolve relative references against a directory (usually the host document's)
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base = Base::Dir(dir.into());
        self
    }

    /// Resolve relative references against a URL (usually the host document's)
    pub fn with_base_url(mut self, base: &str) -> Result<Self> {
        let url = Url::parse(base)
            .map_err(|e| Error::InvalidReference(format!("invalid base URL '{base}': {e}")))?;
        self.base = Base::Url(url);
        Ok(self)
    }

    /// Fetches a URL, mapping 404 to [`Error::NotFound`]
    pub async fn fetch_url(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!("Resource not found at '{url}'")));
            }

            return match response.error_for_status() {
                Err(err) => Err(Error::Network(err)),
                Ok(_) => Err(Error::Other(format!("Unexpected status {status} for '{url}'"))),
            };
        }

        let content = response.text().await?;
        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }

    /// Reads a local file relative to the base directory
    pub async fn read_file(&self, path: &Path) -> Result<String> {
        let full = match &self.base {
            Base::Dir(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        };

        match tokio::fs::read_to_string(&full).await {
            Ok(content) => {
                debug!("Read {} bytes from {}", content.len(), full.display());
                Ok(content)
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound(format!(
                "No such file '{}'",
                full.display()
            ))),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn locate(&self, reference: &str) -> Result<Location> {
        if reference.trim().is_empty() {
            return Err(Error::InvalidReference("empty source reference".into()));
        }

        if let Some(url) = absolute_url(reference) {
            return match url.scheme() {
                "http" | "https" => Ok(Location::Remote(url)),
                "file" => url.to_file_path().map(Location::Local).map_err(|()| {
                    Error::InvalidReference(format!("'{reference}' is not a local file URL"))
                }),
                other => Err(Error::InvalidReference(format!(
                    "unsupported scheme '{other}' in '{reference}'"
                ))),
            };
        }

        match &self.base {
            Base::Url(base) => base.join(reference).map(Location::Remote).map_err(|e| {
                Error::InvalidReference(format!("cannot resolve '{reference}' against {base}: {e}"))
            }),
            Base::Dir(_) => Ok(Location::Local(PathBuf::from(reference))),
        }
    }
}

#[async_trait]
impl SourceResolver for Fetcher {
    async fn resolve(&self, reference: &str) -> Result<String> {
        match self.locate(reference)? {
            Location::Remote(url) => self.fetch_url(url.as_str()).await,
            Location::Local(path) => self.read_file(&path).await,
        }
    }
}

enum Location {
    Remote(Url),
    Local(PathBuf),
}

fn default_user_agent() -> &'static str {
    concat!("excerpt/", env!("CARGO_PKG_VERSION"))
}

/// Parse `reference` as an absolute URL, leaving Windows drive paths alone.
fn absolute_url(reference: &str) -> Option<Url> {
    let url = Url::parse(reference).ok()?;
    (url.scheme().len() > 1).then_some(url)
}
