use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::model::{PxQueryRequest, QueryResponse, TableMetadata};

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// Anything that went wrong between sending a request and holding a decoded body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server responded with status: {status}")]
    Status { status: u16 },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// StatfinClient – one PxWeb table
// ---------------------------------------------------------------------------

/// Blocking HTTP client bound to a single PxWeb table URL.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct StatfinClient {
    http: reqwest::blocking::Client,
    table_url: String,
}

impl StatfinClient {
    pub fn new(table_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let table_url = table_url.into();
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kuntastat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Transport {
                url: table_url.clone(),
                source,
            })?;
        Ok(StatfinClient { http, table_url })
    }

    /// `GET` the table metadata (variable codes and their value texts).
    pub fn fetch_metadata(&self) -> Result<TableMetadata, FetchError> {
        let request = self.http.get(&self.table_url);
        self.send(request)
    }

    /// `POST` a query and return the tabular response.
    pub fn query(&self, body: &PxQueryRequest) -> Result<QueryResponse, FetchError> {
        log::debug!(
            "POST {} {}",
            self.table_url,
            serde_json::to_string(body).unwrap_or_default()
        );
        let request = self.http.post(&self.table_url).json(body);
        self.send(request)
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<T, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: self.table_url.clone(),
            source,
        };
        let resp = request.send().map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let text = resp.text().map_err(transport)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_server::{self, Reply};

    #[test]
    fn non_success_status_is_a_fetch_error() {
        let server = test_server::serve_once(Reply::status(503, "unavailable"));
        let client = StatfinClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_metadata().unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503 }));
        assert_eq!(err.to_string(), "server responded with status: 503");
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let server = test_server::serve_once(Reply::json("{\"data\": 12"));
        let client = StatfinClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_metadata().unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let client =
            StatfinClient::new(test_server::closed_url(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_metadata().unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
