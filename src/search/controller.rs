//! Debounce-and-query coordination.
//!
//! [`SearchController`] owns the raw input, runs it through a [`Debouncer`]
//! and turns every settled, non-blank value into exactly one remote lookup.
//! Each lookup is tagged with a [`QueryToken`]; only the response carrying the
//! latest token may change [`SearchState`], so lookups resolving out of order
//! can never show results for a query the user has already moved past.
//!
//! The controller is driven from a single task: [`SearchController::set_input`]
//! for keystrokes and [`SearchController::step`] for everything that happens
//! later (a value settling, a response arriving). Every change is published as
//! a [`Snapshot`] on a `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use super::source::{SearchError, SearchSource};
use crate::debounce::{DEFAULT_DELAY, Debouncer};

/// Default cap on the raw query, in characters.
pub const DEFAULT_MAX_QUERY_CHARS: usize = 200;

/// Identity of one dispatched lookup. Tokens only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

impl QueryToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState<R> {
    /// Nothing to search for.
    Idle,
    /// Waiting on the latest dispatched lookup.
    Searching,
    /// Latest lookup matched at least one record.
    HasResults(Vec<R>),
    /// Latest lookup succeeded with zero matches.
    Empty,
    /// Latest lookup failed; the message is for diagnostics only.
    Failed { message: String },
}

impl<R> Default for SearchState<R> {
    fn default() -> Self {
        SearchState::Idle
    }
}

impl<R> SearchState<R> {
    pub fn records(&self) -> &[R] {
        match self {
            SearchState::HasResults(records) => records,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Searching)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Searching => "searching",
            SearchState::HasResults(_) => "results",
            SearchState::Empty => "empty",
            SearchState::Failed { .. } => "failed",
        }
    }
}

/// What subscribers see after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R> {
    pub raw: String,
    pub state: SearchState<R>,
}

impl<R> Default for Snapshot<R> {
    fn default() -> Self {
        Self {
            raw: String::new(),
            state: SearchState::Idle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// How long input must stay unchanged before it is searched.
    pub debounce: Duration,
    /// Raw input longer than this is truncated. Zero disables the cap.
    pub max_query_chars: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DELAY,
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
        }
    }
}

/// The event applied by one call to [`SearchController::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A settled term was sent to the source.
    Dispatched { token: QueryToken, term: String },
    /// A settled term was already covered by the latest lookup.
    Skipped { term: String },
    /// The input settled on blank text.
    Cleared,
    /// The latest lookup answered and the state moved on.
    Resolved { token: QueryToken },
    /// A superseded lookup answered and was dropped.
    Stale { token: QueryToken },
    /// A lookup task ended without producing a response.
    Lost,
}

type Outcome<R> = (QueryToken, String, Result<Vec<R>, SearchError>);

pub struct SearchController<S: SearchSource> {
    source: Arc<S>,
    config: ControllerConfig,
    raw: String,
    debouncer: Debouncer<String>,
    state: SearchState<S::Record>,
    minted: u64,
    latest: Option<QueryToken>,
    /// Trimmed term of the latest lookup that is pending or succeeded.
    active_term: Option<String>,
    in_flight: JoinSet<Outcome<S::Record>>,
    tx: watch::Sender<Snapshot<S::Record>>,
}

impl<S: SearchSource> SearchController<S> {
    pub fn new(source: S, config: ControllerConfig) -> Self {
        Self::with_shared(Arc::new(source), config)
    }

    pub fn with_shared(source: Arc<S>, config: ControllerConfig) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self {
            source,
            debouncer: Debouncer::new(String::new(), config.debounce),
            config,
            raw: String::new(),
            state: SearchState::Idle,
            minted: 0,
            latest: None,
            active_term: None,
            in_flight: JoinSet::new(),
            tx,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn state(&self) -> &SearchState<S::Record> {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot<S::Record> {
        Snapshot {
            raw: self.raw.clone(),
            state: self.state.clone(),
        }
    }

    /// Receive a fresh [`Snapshot`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S::Record>> {
        self.tx.subscribe()
    }

    /// Lookups dispatched but not yet answered, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether a keystroke is still waiting to settle.
    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn set_debounce(&mut self, delay: Duration) {
        self.config.debounce = delay;
        self.debouncer.set_delay(delay);
    }

    /// Replace the raw input, as on every keystroke.
    ///
    /// Blank input goes to [`SearchState::Idle`] immediately: the pending
    /// keystroke is dropped and any outstanding lookup is forgotten.
    pub fn set_input(&mut self, raw: impl Into<String>) {
        let raw = clamp_chars(raw.into(), self.config.max_query_chars);
        if raw == self.raw {
            return;
        }
        self.raw = raw;

        if self.raw.trim().is_empty() {
            self.debouncer.settle_now(self.raw.clone());
            self.go_idle();
        } else {
            self.debouncer.observe(self.raw.clone());
        }
        self.publish();
    }

    /// Wait for the next settle or response and apply it.
    ///
    /// Returns `None` once nothing is pending. Cancel-safe, so it can sit in
    /// a `select!` next to an input source.
    pub async fn step(&mut self) -> Option<Step> {
        let step = tokio::select! {
            settled = self.debouncer.next_settled(), if self.debouncer.is_pending() => {
                self.on_settled(settled)
            }
            Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                self.on_joined(joined)
            }
            else => return None,
        };
        self.publish();
        Some(step)
    }

    /// Apply steps until nothing is pending.
    pub async fn run_until_quiet(&mut self) -> Vec<Step> {
        let mut steps = Vec::new();
        while let Some(step) = self.step().await {
            steps.push(step);
        }
        steps
    }

    /// Drop the pending keystroke and abort every outstanding lookup.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
        self.latest = None;
        self.in_flight.abort_all();
        debug!("controller_shutdown");
    }

    fn on_settled(&mut self, settled: String) -> Step {
        let term = settled.trim();
        if term.is_empty() {
            self.go_idle();
            return Step::Cleared;
        }
        if self.active_term.as_deref() == Some(term) {
            debug!(term = term, "query_unchanged");
            return Step::Skipped {
                term: term.to_string(),
            };
        }
        let term = term.to_string();
        self.dispatch(term)
    }

    fn dispatch(&mut self, term: String) -> Step {
        self.minted += 1;
        let token = QueryToken(self.minted);
        self.latest = Some(token);
        self.active_term = Some(term.clone());
        self.state = SearchState::Searching;

        let source = Arc::clone(&self.source);
        let query = term.clone();
        self.in_flight.spawn(async move {
            let result = source.search(&query).await;
            (token, query, result)
        });
        info!(token = token.get(), term = %term, "query_dispatch");
        Step::Dispatched { token, term }
    }

    fn on_joined(&mut self, joined: Result<Outcome<S::Record>, JoinError>) -> Step {
        let step = match joined {
            Ok((token, term, result)) => self.on_response(token, &term, result),
            Err(err) => {
                warn!(error = %err, "query_task_lost");
                Step::Lost
            }
        };

        // With nothing left in flight, the latest lookup can no longer answer.
        if self.in_flight.is_empty() && self.state.is_loading() {
            warn!("query_unanswered");
            self.latest = None;
            self.active_term = None;
            self.state = SearchState::Failed {
                message: "lookup ended without a response".to_string(),
            };
        }
        step
    }

    fn on_response(
        &mut self,
        token: QueryToken,
        term: &str,
        result: Result<Vec<S::Record>, SearchError>,
    ) -> Step {
        if self.latest != Some(token) {
            debug!(token = token.get(), term = term, "query_stale");
            return Step::Stale { token };
        }
        self.latest = None;

        self.state = match result {
            Ok(records) if records.is_empty() => {
                info!(token = token.get(), term = term, "query_empty");
                SearchState::Empty
            }
            Ok(records) => {
                info!(
                    token = token.get(),
                    term = term,
                    count = records.len(),
                    "query_resolved"
                );
                SearchState::HasResults(records)
            }
            Err(err) => {
                warn!(token = token.get(), term = term, error = %err, "query_failed");
                self.active_term = None;
                SearchState::Failed {
                    message: err.to_string(),
                }
            }
        };
        Step::Resolved { token }
    }

    fn go_idle(&mut self) {
        if let Some(token) = self.latest.take() {
            debug!(token = token.get(), "query_abandoned");
        }
        self.active_term = None;
        self.state = SearchState::Idle;
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

/// Truncate `s` to at most `max` characters; `0` means no limit.
fn clamp_chars(mut s: String, max: usize) -> String {
    if max == 0 {
        return s;
    }
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
    s
}
