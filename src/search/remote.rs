//! HTTP search source for a PostgREST-style RPC endpoint.
//!
//! Issues `POST {base}/rest/v1/rpc/{function}` with `{"search_term": ...}` and
//! decodes the JSON array it returns. Requests carry the anon key both as
//! `apikey` and as a bearer token when one is configured.

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::source::{SearchError, SearchSource};
use crate::config::RemoteConfig;

pub struct RpcSearchClient<R> {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    _record: PhantomData<fn() -> R>,
}

impl<R> RpcSearchClient<R> {
    pub fn new(config: &RemoteConfig) -> Result<Self, SearchError> {
        let base = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SearchError::NotConfigured)?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("typeahead/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: rpc_endpoint(base, &config.rpc_function),
            api_key: config.api_key.clone(),
            _record: PhantomData,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, term: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "search_term": term }));
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key).bearer_auth(key);
        }
        req
    }
}

impl<R> SearchSource for RpcSearchClient<R>
where
    R: DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Record = R;

    async fn search(&self, term: &str) -> Result<Vec<R>, SearchError> {
        debug!(endpoint = %self.endpoint, term = term, "rpc_request");
        let response = self
            .build_request(term)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        decode_rows(&body)
    }
}

fn rpc_endpoint(base: &str, function: &str) -> String {
    format!(
        "{}/rest/v1/rpc/{}",
        base.trim_end_matches('/'),
        function.trim_matches('/')
    )
}

/// Decode an RPC body; `null` means no rows.
fn decode_rows<R: DeserializeOwned>(body: &str) -> Result<Vec<R>, SearchError> {
    let rows: Option<Vec<R>> =
        serde_json::from_str(body).map_err(|e| SearchError::Decode(e.to_string()))?;
    Ok(rows.unwrap_or_default())
}
