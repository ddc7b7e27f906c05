#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use typeahead_search::model::types::Film;
use typeahead_search::search::{SearchError, SearchSource};

/// Captures tracing output for tests.
pub struct TestTracing {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Captured lines that mention `needle`.
    pub fn lines_with(&self, needle: &str) -> Vec<String> {
        self.output()
            .lines()
            .filter(|l| l.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

struct TestWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn film(id: i64, title: &str) -> Film {
    Film {
        film_id: id,
        film_title: title.to_string(),
        opening_crawl: String::new(),
        director: "George Lucas".into(),
        producer: "Gary Kurtz".into(),
        release_date: "1977-05-25".into(),
        image_url: format!("https://example.com/films/{id}.jpg"),
        character_names: Some(vec!["Luke Skywalker".into()]),
        planet_names: None,
        starship_names: None,
    }
}

#[derive(Clone)]
enum Reply {
    Films(Vec<Film>),
    Fail(String),
}

/// Source answering from a per-term script after a simulated latency.
/// Unscripted terms answer with no rows immediately.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<HashMap<String, (Duration, Reply)>>,
    calls: Mutex<Vec<String>>,
    completed: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn films(&self, term: &str, latency_ms: u64, films: Vec<Film>) {
        self.script.lock().unwrap().insert(
            term.to_string(),
            (Duration::from_millis(latency_ms), Reply::Films(films)),
        );
    }

    pub fn fail(&self, term: &str, latency_ms: u64, message: &str) {
        self.script.lock().unwrap().insert(
            term.to_string(),
            (
                Duration::from_millis(latency_ms),
                Reply::Fail(message.to_string()),
            ),
        );
    }

    /// Terms the controller asked for, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Terms whose simulated request ran to completion.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

impl SearchSource for ScriptedSource {
    type Record = Film;

    fn search(&self, term: &str) -> impl Future<Output = Result<Vec<Film>, SearchError>> + Send {
        self.calls.lock().unwrap().push(term.to_string());
        let entry = self.script.lock().unwrap().get(term).cloned();
        let (latency, reply) = entry.unwrap_or((Duration::ZERO, Reply::Films(Vec::new())));
        let completed = Arc::clone(&self.completed);
        let term = term.to_string();
        async move {
            tokio::time::sleep(latency).await;
            completed.lock().unwrap().push(term);
            match reply {
                Reply::Films(films) => Ok(films),
                Reply::Fail(message) => Err(SearchError::Transport(message)),
            }
        }
    }
}
