//! Search layer facade.
//!
//! - **[`controller`]**: debounce-and-query state machine with stale-response filtering.
//! - **[`source`]**: the `SearchSource` trait the controller consumes, and its error type.
//! - **[`remote`]**: reqwest-backed `SearchSource` for the film search RPC.

pub mod controller;
pub mod remote;
pub mod source;

pub use controller::{ControllerConfig, QueryToken, SearchController, SearchState, Snapshot, Step};
pub use source::{SearchError, SearchSource};
