use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// Scalar filter dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    /// Release year.
    Year,
    /// Genre id or slug.
    Genre,
    /// Platform id.
    Platform,
    /// Developer id or slug.
    Developer,
}

impl FilterKey {
    /// All scalar keys in display order.
    pub const ALL: [FilterKey; 4] = [
        FilterKey::Year,
        FilterKey::Genre,
        FilterKey::Platform,
        FilterKey::Developer,
    ];

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Year => "Year",
            FilterKey::Genre => "Genre",
            FilterKey::Platform => "Platform",
            FilterKey::Developer => "Developer",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Active constraints on the game list.
///
/// Each scalar field is either absent or a single non-empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Release year, e.g. `2015`.
    pub year: Option<String>,
    /// Genre id or slug.
    pub genre: Option<String>,
    /// Platform id.
    pub platform: Option<String>,
    /// Developer id or slug.
    pub developer: Option<String>,
    /// Tag ids or slugs.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Free-text search.
    pub search: Option<String>,
}

impl FilterSet {
    /// Current value for a scalar key.
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Select `value` for `key`, or clear it when it is already selected.
    ///
    /// A blank value clears the key.
    pub fn toggle(&mut self, key: FilterKey, value: &str) {
        let value = value.trim();
        let slot = self.slot_mut(key);
        if value.is_empty() || slot.as_deref() == Some(value) {
            *slot = None;
        } else {
            *slot = Some(value.to_string());
        }
    }

    /// Add the tag, or remove it when already present.
    pub fn toggle_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    /// Set the search text; blank text removes the constraint.
    pub fn set_search(&mut self, text: &str) {
        let text = text.trim();
        self.search = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
    }

    /// Whether no constraint is active.
    pub fn is_empty(&self) -> bool {
        FilterKey::ALL.iter().all(|key| self.get(*key).is_none())
            && self.tags.is_empty()
            && self.search.is_none()
    }

    /// Remove every constraint.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// One-line summary of the active constraints.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = FilterKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|value| format!("{key}: {value}")))
            .collect();
        if !self.tags.is_empty() {
            let tags = self.tags.iter().cloned().collect::<Vec<_>>().join(",");
            parts.push(format!("Tags: {tags}"));
        }
        if let Some(search) = &self.search {
            parts.push(format!("Search: \"{search}\""));
        }
        if parts.is_empty() {
            "Top rated".to_string()
        } else {
            parts.join(" · ")
        }
    }

    fn slot(&self, key: FilterKey) -> &Option<String> {
        match key {
            FilterKey::Year => &self.year,
            FilterKey::Genre => &self.genre,
            FilterKey::Platform => &self.platform,
            FilterKey::Developer => &self.developer,
        }
    }

    fn slot_mut(&mut self, key: FilterKey) -> &mut Option<String> {
        match key {
            FilterKey::Year => &mut self.year,
            FilterKey::Genre => &mut self.genre,
            FilterKey::Platform => &mut self.platform,
            FilterKey::Developer => &mut self.developer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_absent_or_same_value() {
        let mut filters = FilterSet::default();
        filters.toggle(FilterKey::Platform, "4");
        let before = filters.clone();

        for key in FilterKey::ALL {
            for value in ["2015", "4", "action"] {
                if before.get(key).is_some_and(|current| current != value) {
                    continue;
                }
                let mut toggled = before.clone();
                toggled.toggle(key, value);
                toggled.toggle(key, value);
                assert_eq!(toggled, before, "{key} / {value}");
            }
        }
    }

    #[test]
    fn toggling_a_different_value_replaces_then_clears() {
        let mut filters = FilterSet::default();
        filters.toggle(FilterKey::Platform, "4");

        filters.toggle(FilterKey::Platform, "187");
        assert_eq!(filters.get(FilterKey::Platform), Some("187"));

        filters.toggle(FilterKey::Platform, "187");
        assert_eq!(filters.get(FilterKey::Platform), None);
        assert!(filters.is_empty());
    }

    #[test]
    fn selecting_another_value_replaces() {
        let mut filters = FilterSet::default();
        filters.toggle(FilterKey::Genre, "4");
        filters.toggle(FilterKey::Genre, "51");
        assert_eq!(filters.get(FilterKey::Genre), Some("51"));

        filters.toggle(FilterKey::Genre, "  ");
        assert_eq!(filters.get(FilterKey::Genre), None);
        assert!(filters.is_empty());
    }

    #[test]
    fn tags_toggle_independently() {
        let mut filters = FilterSet::default();
        filters.toggle_tag("singleplayer");
        filters.toggle_tag("rpg");
        filters.toggle_tag("singleplayer");
        assert_eq!(filters.tags.iter().collect::<Vec<_>>(), vec!["rpg"]);
        assert!(!filters.is_empty());
    }

    #[test]
    fn blank_search_clears_constraint() {
        let mut filters = FilterSet::default();
        filters.set_search("  witcher  ");
        assert_eq!(filters.search.as_deref(), Some("witcher"));
        filters.set_search("   ");
        assert_eq!(filters.search, None);
    }

    #[test]
    fn describes_active_constraints() {
        let mut filters = FilterSet::default();
        assert_eq!(filters.describe(), "Top rated");
        filters.toggle(FilterKey::Year, "2015");
        filters.set_search("zelda");
        assert_eq!(filters.describe(), "Year: 2015 · Search: \"zelda\"");
    }
}
