#![allow(missing_docs)]

//! Upstream payload shapes.
//!
//! Every field is optional and decoded leniently: a `null`, a missing key or
//! a value of the wrong type all become `None`, and list elements that do not
//! decode are skipped. Nothing here is shown to users directly; records go
//! through [`normalize`](super::normalize::normalize) first.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Paginated list envelope returned by the list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct RawPage<T: DeserializeOwned> {
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Option<Vec<T>>,
    #[serde(default, deserialize_with = "lenient")]
    pub next: Option<String>,
}

impl<T: DeserializeOwned> RawPage<T> {
    /// Whether upstream advertised a following page.
    pub fn has_next(&self) -> bool {
        self.next
            .as_deref()
            .map(|next| !next.trim().is_empty())
            .unwrap_or(false)
    }

    /// Consume the envelope, yielding its results.
    pub fn into_results(self) -> Vec<T> {
        self.results.unwrap_or_default()
    }
}

/// A game record as served by the list and lookup endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawGame {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub metacritic: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub released: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub background_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub platforms: Option<Vec<RawPlatformEntry>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub genres: Option<Vec<RawNamed>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub developers: Option<Vec<RawNamed>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Option<Vec<RawNamed>>,
    #[serde(default, deserialize_with = "lenient")]
    pub description_raw: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub clip: Option<RawClip>,
}

impl RawGame {
    /// Whether the record carries a score. Unscored records never reach a list.
    pub fn has_score(&self) -> bool {
        self.metacritic.is_some()
    }
}

/// `{id, name}` record with any number of extra upstream fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNamed {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// Platform reference: nested under `platform` on game records, flat in the
/// taxonomy listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPlatformEntry {
    Nested { platform: RawNamed },
    Flat(RawNamed),
}

impl RawPlatformEntry {
    /// The platform reference regardless of nesting.
    pub fn named(&self) -> &RawNamed {
        match self {
            RawPlatformEntry::Nested { platform } => platform,
            RawPlatformEntry::Flat(named) => named,
        }
    }
}

/// Trailer clip reference.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawClip {
    #[serde(default, deserialize_with = "lenient")]
    pub clip: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}
