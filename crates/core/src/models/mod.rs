//! Shared view models.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

mod filters;

pub use filters::{FilterKey, FilterSet};

/// Number of games requested per page.
pub const PAGE_SIZE: u32 = 28;

/// Placeholder used when a record carries no usable title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Placeholder used when a record carries no description.
pub const NO_DESCRIPTION: &str = "No description available";
/// Label shown for absent scalar values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Minimal `{id, name}` pair used for genres, platforms, developers and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Upstream identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl NamedRef {
    /// Build a pair from its parts.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Normalized game record shared by list cards and the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Upstream identifier.
    pub id: i64,
    /// Display title, never empty.
    pub title: String,
    /// Metacritic score in `0..=100`.
    pub metacritic: Option<u8>,
    /// ISO release date as published upstream.
    pub released: Option<String>,
    /// Cover image URL.
    pub cover_image_url: Option<String>,
    /// Genres in source order.
    pub genres: Vec<NamedRef>,
    /// Platforms in source order.
    pub platforms: Vec<NamedRef>,
    /// Developers in source order.
    pub developers: Vec<NamedRef>,
    /// Tags in source order.
    pub tags: Vec<NamedRef>,
    /// Long description, or [`NO_DESCRIPTION`].
    pub description: String,
    /// Trailer clip URL, empty when absent.
    pub trailer_url: String,
}

impl Game {
    /// Release date formatted for display, or `N/A`.
    ///
    /// Dates that do not parse as ISO are shown verbatim.
    pub fn release_label(&self) -> String {
        match self.released.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| date.format("%b %-d, %Y").to_string())
                .unwrap_or_else(|_| raw.to_string()),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Score formatted for display, or `N/A`.
    pub fn score_label(&self) -> String {
        self.metacritic
            .map(|score| score.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Whether a trailer clip is available.
    pub fn has_trailer(&self) -> bool {
        !self.trailer_url.is_empty()
    }
}

/// Comma-joined names, or `N/A` for an empty list.
pub fn joined_names(items: &[NamedRef]) -> String {
    if items.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One page of list results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePage {
    /// Games with a score, in upstream order.
    pub games: Vec<Game>,
    /// Whether upstream reported a following page.
    pub has_next: bool,
}

/// Choices offered by the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    /// Genre choices.
    pub genres: Vec<NamedRef>,
    /// Platform choices.
    pub platforms: Vec<NamedRef>,
    /// Developer choices, restricted to developers with scored games.
    pub developers: Vec<NamedRef>,
}

impl Taxonomy {
    /// Whether every list is empty.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.platforms.is_empty() && self.developers.is_empty()
    }
}

/// The last `count` calendar years, newest first.
pub fn recent_years(count: usize) -> Vec<i32> {
    let current = Local::now().year();
    (0..count as i32).map(|offset| current - offset).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Game {
        Game {
            id: 1,
            title: "Sample".to_string(),
            metacritic: Some(97),
            released: Some("2015-05-19".to_string()),
            cover_image_url: None,
            genres: vec![NamedRef::new(4, "Action")],
            platforms: Vec::new(),
            developers: vec![NamedRef::new(9, "CD PROJEKT RED"), NamedRef::new(10, "Other")],
            tags: Vec::new(),
            description: NO_DESCRIPTION.to_string(),
            trailer_url: String::new(),
        }
    }

    #[test]
    fn labels_fall_back_to_not_available() {
        let mut game = sample();
        assert_eq!(game.release_label(), "May 19, 2015");
        assert_eq!(game.score_label(), "97");

        game.released = None;
        game.metacritic = None;
        assert_eq!(game.release_label(), NOT_AVAILABLE);
        assert_eq!(game.score_label(), NOT_AVAILABLE);

        game.released = Some("TBA".to_string());
        assert_eq!(game.release_label(), "TBA");
    }

    #[test]
    fn joins_names_in_source_order() {
        let game = sample();
        assert_eq!(joined_names(&game.developers), "CD PROJEKT RED, Other");
        assert_eq!(joined_names(&game.platforms), NOT_AVAILABLE);
    }

    #[test]
    fn recent_years_descend_from_current_year() {
        let years = recent_years(25);
        assert_eq!(years.len(), 25);
        assert_eq!(years[0], Local::now().year());
        assert!(years.windows(2).all(|pair| pair[0] == pair[1] + 1));
    }
}
