//! The remote lookup consumed by the controller.

use std::future::Future;
use std::sync::Arc;

/// Failure of a single remote lookup.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search endpoint not configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Anything that can answer a search term with a list of records.
///
/// Calls may resolve in any order relative to each other; callers must not
/// assume the last call issued is the last to finish.
pub trait SearchSource: Send + Sync + 'static {
    type Record: Clone + Send + Sync + 'static;

    fn search(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Self::Record>, SearchError>> + Send;
}

impl<S: SearchSource> SearchSource for Arc<S> {
    type Record = S::Record;

    fn search(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Self::Record>, SearchError>> + Send {
        (**self).search(term)
    }
}
