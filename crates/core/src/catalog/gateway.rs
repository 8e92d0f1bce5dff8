use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    models::{FilterSet, Game, GamePage, NamedRef, Taxonomy, PAGE_SIZE},
};

use super::{
    normalize::{named, normalize},
    raw::{RawGame, RawPage, RawPlatformEntry},
    CatalogError, CatalogTransport, HttpTransport, Query,
};

const SCORE_ORDERING: &str = "-metacritic";
const SCORED_DEVELOPERS: &str = "1,100";

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("failed to compile whitespace regex"));

/// One method per upstream query shape.
///
/// `try_*` methods report failures; the plain variants log them and return
/// an empty result instead, so callers never see an error.
#[derive(Clone)]
pub struct CatalogGateway {
    transport: Arc<dyn CatalogTransport>,
}

impl CatalogGateway {
    /// Wrap an existing transport.
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self { transport }
    }

    /// Build a gateway talking HTTP to the configured endpoint.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Highest-scored games, one page at a time.
    pub async fn try_fetch_top_rated(&self, page: u32) -> Result<GamePage, CatalogError> {
        self.fetch_list(list_query(page)).await
    }

    /// Like [`Self::try_fetch_top_rated`], degrading to an empty page.
    pub async fn fetch_top_rated(&self, page: u32) -> GamePage {
        self.try_fetch_top_rated(page)
            .await
            .unwrap_or_else(|err| degraded("top rated games", err))
    }

    /// Highest-scored games matching `filters`.
    pub async fn try_fetch_filtered(
        &self,
        filters: &FilterSet,
        page: u32,
    ) -> Result<GamePage, CatalogError> {
        self.fetch_list(filter_query(filters, page)).await
    }

    /// Like [`Self::try_fetch_filtered`], degrading to an empty page.
    pub async fn fetch_filtered(&self, filters: &FilterSet, page: u32) -> GamePage {
        self.try_fetch_filtered(filters, page)
            .await
            .unwrap_or_else(|err| degraded("filtered games", err))
    }

    /// Top-rated list when no filter is active, filtered list otherwise.
    pub async fn try_fetch_page(
        &self,
        filters: &FilterSet,
        page: u32,
    ) -> Result<GamePage, CatalogError> {
        if filters.is_empty() {
            self.try_fetch_top_rated(page).await
        } else {
            self.try_fetch_filtered(filters, page).await
        }
    }

    /// Genre, platform and developer choices, fetched concurrently.
    ///
    /// Fails as a whole when any of the three lookups fails.
    pub async fn try_fetch_filter_taxonomy(&self) -> Result<Taxonomy, CatalogError> {
        let (genres, platforms, developers) = tokio::try_join!(
            self.fetch_named("genres", Query::new(), named),
            self.fetch_named("platforms", Query::new(), |raw: &RawPlatformEntry| {
                named(raw.named())
            }),
            self.fetch_named(
                "developers",
                vec![("metacritic", SCORED_DEVELOPERS.to_string())],
                named,
            ),
        )?;
        Ok(Taxonomy {
            genres,
            platforms,
            developers,
        })
    }

    /// Like [`Self::try_fetch_filter_taxonomy`], degrading to empty lists.
    pub async fn fetch_filter_taxonomy(&self) -> Taxonomy {
        self.try_fetch_filter_taxonomy()
            .await
            .unwrap_or_else(|err| degraded("filter taxonomy", err))
    }

    /// Full record for a single game.
    pub async fn try_fetch_game_by_id(&self, id: i64) -> Result<Game, CatalogError> {
        let raw: RawGame = self.get(&format!("games/{id}"), Query::new()).await?;
        Ok(normalize(&raw))
    }

    /// Like [`Self::try_fetch_game_by_id`], yielding `None` on failure.
    pub async fn fetch_game_by_id(&self, id: i64) -> Option<Game> {
        match self.try_fetch_game_by_id(id).await {
            Ok(game) => Some(game),
            Err(err) => {
                warn!(id, %err, "game lookup failed");
                None
            }
        }
    }

    async fn fetch_list(&self, query: Query) -> Result<GamePage, CatalogError> {
        let page: RawPage<RawGame> = self.get("games", query).await?;
        let has_next = page.has_next();
        let raw = page.into_results();
        let total = raw.len();
        let games: Vec<Game> = raw
            .iter()
            .filter(|game| game.has_score())
            .map(normalize)
            .collect();
        debug!(total, kept = games.len(), has_next, "games page received");
        Ok(GamePage { games, has_next })
    }

    async fn fetch_named<T>(
        &self,
        path: &str,
        query: Query,
        map: impl Fn(&T) -> Option<NamedRef>,
    ) -> Result<Vec<NamedRef>, CatalogError>
    where
        T: DeserializeOwned,
    {
        let page: RawPage<T> = self.get(path, query).await?;
        Ok(page.into_results().iter().filter_map(map).collect())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T, CatalogError> {
        let body = self.transport.get_json(path, &query).await?;
        serde_json::from_value(body).map_err(|source| CatalogError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

fn degraded<T: Default>(what: &str, err: CatalogError) -> T {
    warn!(%err, "failed to fetch {what}; showing empty result");
    T::default()
}

fn list_query(page: u32) -> Query {
    vec![
        ("ordering", SCORE_ORDERING.to_string()),
        ("page_size", PAGE_SIZE.to_string()),
        ("page", page.max(1).to_string()),
    ]
}

/// Query for a filtered list; unset dimensions are left out entirely.
pub(crate) fn filter_query(filters: &FilterSet, page: u32) -> Query {
    let mut query = list_query(page);
    if let Some(year) = &filters.year {
        query.push(("dates", format!("{year}-01-01,{year}-12-31")));
    }
    if let Some(genre) = &filters.genre {
        query.push(("genres", slug(genre)));
    }
    if let Some(platform) = &filters.platform {
        query.push(("platforms", platform.trim().to_string()));
    }
    if let Some(developer) = &filters.developer {
        query.push(("developers", slug(developer)));
    }
    if !filters.tags.is_empty() {
        let tags = filters.tags.iter().cloned().collect::<Vec<_>>();
        query.push(("tags", tags.join(",")));
    }
    if let Some(search) = &filters.search {
        query.push(("search", search_terms(search)));
    }
    query
}

/// Lowercase with whitespace runs replaced by `-`. Numeric ids pass through.
fn slug(value: &str) -> String {
    WHITESPACE_RE
        .replace_all(value.trim(), "-")
        .to_lowercase()
}

/// Collapse whitespace runs into the `+` join token the search syntax expects.
fn search_terms(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), "+").into_owned()
}
