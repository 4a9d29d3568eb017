//! Board data loading.
//!
//! One request per run: the board never re-fetches. A local file with the
//! same JSON shape can stand in for the endpoint.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::model::Dataset;

/// Where the tickets and users come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http { url: String, timeout: Duration },
    File(PathBuf),
}

impl DataSource {
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Self {
        DataSource::Http {
            url: endpoint.url.trim().to_string(),
            timeout: Duration::from_secs(endpoint.timeout_secs),
        }
    }

    /// Short description for logs and error envelopes.
    pub fn origin(&self) -> String {
        match self {
            DataSource::Http { url, .. } => url.clone(),
            DataSource::File(path) => path.display().to_string(),
        }
    }

    pub async fn load(&self) -> Result<Dataset> {
        let result = match self {
            DataSource::Http { url, timeout } => fetch(url, *timeout).await,
            DataSource::File(path) => read_file(path).await,
        };
        match &result {
            Ok(dataset) => info!(
                origin = %self.origin(),
                tickets = dataset.tickets.len(),
                users = dataset.users.len(),
                "board data loaded"
            ),
            Err(err) => warn!(origin = %self.origin(), error = %err, "board data load failed"),
        }
        result
    }
}

/// Load the dataset on a private current-thread runtime.
pub fn load_data(source: &DataSource) -> Result<Dataset> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(source.load())
}

async fn fetch(url: &str, timeout: Duration) -> Result<Dataset> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| Error::Fetch {
            url: url.to_string(),
            source,
        })?;

    debug!(url, timeout_ms = timeout.as_millis() as u64, "fetching board data");
    let response = client.get(url).send().await.map_err(|source| Error::Fetch {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|source| Error::Fetch {
        url: url.to_string(),
        source,
    })?;
    decode(&body, url)
}

async fn read_file(path: &std::path::Path) -> Result<Dataset> {
    let body = tokio::fs::read(path).await?;
    decode(&body, &path.display().to_string())
}

/// Parse the `{ tickets, users }` payload.
pub fn decode(body: &[u8], origin: &str) -> Result<Dataset> {
    serde_json::from_slice(body).map_err(|err| Error::Decode {
        origin: origin.to_string(),
        message: err.to_string(),
    })
}
