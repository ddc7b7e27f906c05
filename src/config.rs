//! Runtime configuration read from the environment (and `.env`).

use std::time::Duration;

use crate::search::controller::{ControllerConfig, DEFAULT_MAX_QUERY_CHARS};

/// Default RPC function backing film search.
pub const DEFAULT_RPC_FUNCTION: &str = "search_films";

/// Where and how to reach the remote search endpoint.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub base_url: Option<String>,
    /// Anon key sent as `apikey` and bearer token.
    pub api_key: Option<String>,
    pub rpc_function: String,
    pub request_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            rpc_function: DEFAULT_RPC_FUNCTION.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeaheadConfig {
    pub controller: ControllerConfig,
    pub remote: RemoteConfig,
}

impl TypeaheadConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(ms) = var("TYPEAHEAD_DEBOUNCE_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            cfg.controller.debounce = Duration::from_millis(ms);
        }

        cfg.controller.max_query_chars = var("TYPEAHEAD_MAX_QUERY_CHARS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_QUERY_CHARS);

        cfg.remote.base_url = var("TYPEAHEAD_API_URL").filter(|v| !v.trim().is_empty());
        cfg.remote.api_key = var("TYPEAHEAD_API_KEY").filter(|v| !v.trim().is_empty());

        if let Some(name) = var("TYPEAHEAD_RPC_FUNCTION").filter(|v| !v.trim().is_empty()) {
            cfg.remote.rpc_function = name;
        }

        if let Some(ms) =
            var("TYPEAHEAD_REQUEST_TIMEOUT_MS").and_then(|v| v.trim().parse::<u64>().ok())
        {
            cfg.remote.request_timeout = Duration::from_millis(ms);
        }

        cfg
    }
}
