//! Records returned by the film search RPC.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Film {
    pub film_id: i64,
    pub film_title: String,
    #[serde(default)]
    pub opening_crawl: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub producer: String,
    /// ISO date, e.g. `1977-05-25`.
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub character_names: Option<Vec<String>>,
    #[serde(default)]
    pub planet_names: Option<Vec<String>>,
    #[serde(default)]
    pub starship_names: Option<Vec<String>>,
}

impl Film {
    /// Year part of `release_date`; accepts plain dates and RFC 3339 timestamps.
    pub fn release_year(&self) -> Option<i32> {
        let raw = self.release_date.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.year());
        }
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rpc_row_with_null_lists() {
        let row = serde_json::json!({
            "film_id": 1,
            "film_title": "A New Hope",
            "opening_crawl": "It is a period of civil war.",
            "director": "George Lucas",
            "producer": "Gary Kurtz, Rick McCallum",
            "release_date": "1977-05-25",
            "image_url": "https://example.com/4.jpg",
            "character_names": ["Luke Skywalker", "Leia Organa"],
            "planet_names": null
        });
        let film: Film = serde_json::from_value(row).unwrap();
        assert_eq!(film.film_title, "A New Hope");
        assert_eq!(film.planet_names, None);
        assert_eq!(film.starship_names, None);
        assert_eq!(film.character_names.as_ref().map(Vec::len), Some(2));
        assert_eq!(film.release_year(), Some(1977));
    }

    #[test]
    fn release_year_handles_timestamps_and_garbage() {
        let mut film: Film = serde_json::from_value(serde_json::json!({
            "film_id": 2,
            "film_title": "The Empire Strikes Back",
            "release_date": "1980-05-17T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(film.release_year(), Some(1980));

        film.release_date = "soon".into();
        assert_eq!(film.release_year(), None);
    }
}
