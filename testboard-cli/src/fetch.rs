//! Loading sheet exports from local files or HTTP URLs.

use reqwest::Client;
use testboard_core::TestboardError;

use crate::CliResult;

/// Whether `source` should be fetched over HTTP.
pub(crate) fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads CSV exports from disk or the network.
pub(crate) struct SourceLoader {
    client: Client,
}

impl SourceLoader {
    /// Build a loader with a fresh HTTP client.
    pub(crate) fn new() -> CliResult<Self> {
        let client = Client::builder().user_agent("testboard-cli").build()?;
        Ok(Self { client })
    }

    /// Load CSV text from a path or URL.
    pub(crate) async fn load(&self, source: &str) -> CliResult<String> {
        if is_remote(source) {
            self.fetch(source).await
        } else {
            log::debug!("reading {source}");
            tokio::fs::read_to_string(source)
                .await
                .map_err(|err| format!("failed to read {source}: {err}").into())
        }
    }

    /// Load two sources concurrently.
    pub(crate) async fn load_pair(&self, first: &str, second: &str) -> CliResult<(String, String)> {
        let (first, second) = tokio::join!(self.load(first), self.load(second));
        Ok((first?, second?))
    }

    async fn fetch(&self, url: &str) -> CliResult<String> {
        log::debug!("fetching {url}");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Box::new(TestboardError::Fetch {
                status: response.status().as_u16(),
                url: url.to_string(),
            }));
        }
        Ok(response.text().await?)
    }
}
