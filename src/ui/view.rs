//! Pure projection from controller state to what the screen shows.

use crate::model::types::Film;
use crate::search::controller::SearchState;

pub const PLACEHOLDER: &str = "Type to search...";
pub const LOADING_TEXT: &str = "Searching...";
pub const NOTHING_FOUND_TEXT: &str = "Nothing found";
pub const NOT_AVAILABLE: &str = "N/A";

/// Exactly one of these is on screen at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a, R> {
    InputOnly,
    Loading,
    /// `failed` only changes the status hint; the body is the same notice.
    NothingFound { failed: bool },
    Results(&'a [R]),
}

impl<'a, R> View<'a, R> {
    pub fn project(raw: &str, state: &'a SearchState<R>) -> Self {
        if raw.is_empty() {
            return View::InputOnly;
        }
        match state {
            SearchState::Idle => View::InputOnly,
            SearchState::Searching => View::Loading,
            SearchState::Empty => View::NothingFound { failed: false },
            SearchState::Failed { .. } => View::NothingFound { failed: true },
            SearchState::HasResults(records) => View::Results(records),
        }
    }
}

/// Stable identity of a rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Id(String),
    Position(usize),
}

/// Display fields of one result, ready for plain or styled rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
    pub image_url: Option<String>,
}

impl Card {
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.fields.len() + 2);
        out.push(self.title.clone());
        for (label, value) in &self.fields {
            out.push(format!("{label}: {value}"));
        }
        if let Some(url) = &self.image_url {
            out.push(format!("Image: {url}"));
        }
        out
    }
}

pub trait ResultItem {
    fn item_key(&self) -> Option<String>;
    fn card(&self) -> Card;
}

/// Pair each record with its key, falling back to its position.
pub fn keyed<R: ResultItem>(records: &[R]) -> Vec<(ItemKey, &R)> {
    records
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let key = r.item_key().map_or(ItemKey::Position(idx), ItemKey::Id);
            (key, r)
        })
        .collect()
}

/// Index to select after the list changed: the previously selected key if it
/// is still present, otherwise the first item.
pub fn reselect(keys: &[ItemKey], previous: Option<&ItemKey>) -> Option<usize> {
    if keys.is_empty() {
        return None;
    }
    previous
        .and_then(|prev| keys.iter().position(|k| k == prev))
        .or(Some(0))
}

fn join_or_na(names: Option<&[String]>) -> String {
    match names {
        Some(names) if !names.is_empty() => names.join(", "),
        _ => NOT_AVAILABLE.to_string(),
    }
}

impl ResultItem for Film {
    fn item_key(&self) -> Option<String> {
        Some(self.film_id.to_string())
    }

    fn card(&self) -> Card {
        let title = match self.release_year() {
            Some(year) => format!("{} ({year})", self.film_title),
            None => self.film_title.clone(),
        };
        Card {
            title,
            fields: vec![
                ("Director", self.director.clone()),
                ("Producer", self.producer.clone()),
                ("Characters", join_or_na(self.character_names.as_deref())),
                ("Planets", join_or_na(self.planet_names.as_deref())),
                ("Starships", join_or_na(self.starship_names.as_deref())),
            ],
            image_url: Some(self.image_url.clone()).filter(|u| !u.is_empty()),
        }
    }
}
