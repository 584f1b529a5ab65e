//! Document acquisition from local files and HTTP(S) locators.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::header::COOKIE;
use tracing::instrument;

use crate::config::FetchConfig;
use crate::error::SourceError;

/// Where an exam report comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    /// `http://` and `https://` locators (any case) are remote; anything
    /// else is a path.
    pub fn parse(locator: &str) -> Self {
        if has_scheme(locator, "https://") || has_scheme(locator, "http://") {
            Source::Remote(locator.to_string())
        } else {
            Source::Local(PathBuf::from(locator))
        }
    }
}

fn has_scheme(locator: &str, scheme: &str) -> bool {
    locator
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(path) => write!(f, "{}", path.display()),
            Source::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Loads the raw markup of an exam report.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    async fn load(&self, source: &Source) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

/// Reads reports saved to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl FileLoader {
    async fn read(&self, path: &std::path::Path) -> Result<String> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(path.display().to_string()).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        Ok(decode(bytes, &path.display().to_string()))
    }
}

#[async_trait]
impl SourceLoader for FileLoader {
    async fn load(&self, source: &Source) -> Result<String> {
        match source {
            Source::Local(path) => self.read(path).await,
            Source::Remote(url) => anyhow::bail!("file loader cannot fetch {url}"),
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Fetches reports over HTTP(S), sending the configured session cookie.
pub struct HttpLoader {
    client: reqwest::Client,
    cookie: Option<String>,
    timeout_secs: u64,
}

impl HttpLoader {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            cookie: config.cookie.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        } else {
            tracing::debug!("no session cookie configured");
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        Ok(decode(bytes.to_vec(), url))
    }
}

#[async_trait]
impl SourceLoader for HttpLoader {
    async fn load(&self, source: &Source) -> Result<String> {
        match source {
            Source::Remote(url) => self.fetch(url).await,
            Source::Local(path) => anyhow::bail!("HTTP loader cannot read {}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Routes each source to the file or HTTP loader.
pub struct DocumentLoader {
    file: FileLoader,
    http: HttpLoader,
}

impl DocumentLoader {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            file: FileLoader,
            http: HttpLoader::new(config)?,
        })
    }
}

#[async_trait]
impl SourceLoader for DocumentLoader {
    async fn load(&self, source: &Source) -> Result<String> {
        match source {
            Source::Local(_) => self.file.load(source).await,
            Source::Remote(_) => self.http.load(source).await,
        }
    }
}

/// Load every source, at most `parallelism` at a time. Results keep input
/// order; the first failure aborts the whole load.
pub async fn load_all(
    loader: &dyn SourceLoader,
    sources: &[Source],
    parallelism: usize,
) -> Result<Vec<String>> {
    stream::iter(sources.iter().map(|source| async move {
        tracing::debug!(%source, "loading document");
        loader
            .load(source)
            .await
            .with_context(|| format!("failed to load {source}"))
    }))
    .buffered(parallelism.max(1))
    .try_collect()
    .await
}

fn decode(bytes: Vec<u8>, origin: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("{origin} is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
