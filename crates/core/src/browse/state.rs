use crate::{
    catalog::{CatalogError, CatalogGateway},
    models::{FilterKey, FilterSet, Game, GamePage},
};

/// A fetch the view should run, identified by a monotonically increasing ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Sequence number; only the newest ticket's response is applied.
    pub ticket: u64,
    /// Filters captured when the request was issued.
    pub filters: FilterSet,
    /// Page captured when the request was issued.
    pub page: u32,
}

impl FetchRequest {
    /// Run the request against the gateway.
    pub async fn run(&self, gateway: &CatalogGateway) -> Result<GamePage, CatalogError> {
        gateway.try_fetch_page(&self.filters, self.page).await
    }
}

/// What the list view currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// A request is in flight.
    pub loading: bool,
    /// Games of the last applied response.
    pub games: Vec<Game>,
    /// Whether a following page exists.
    pub has_next: bool,
    /// Why the last applied request failed, if it did.
    pub error: Option<String>,
}

/// Active filters, current page and displayed results for the list view.
#[derive(Debug, Clone)]
pub struct BrowseState {
    filters: FilterSet,
    page: u32,
    results: ResultSet,
    latest_ticket: u64,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseState {
    /// Fresh state: no filters, first page, nothing loaded.
    pub fn new() -> Self {
        Self {
            filters: FilterSet::default(),
            page: 1,
            results: ResultSet::default(),
            latest_ticket: 0,
        }
    }

    /// Active filters.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Displayed results.
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Reload the current filters and page.
    pub fn refresh(&mut self) -> FetchRequest {
        self.issue()
    }

    /// Toggle `value` for `key` and restart from the first page.
    pub fn set_filter(&mut self, key: FilterKey, value: &str) -> FetchRequest {
        self.filters.toggle(key, value);
        self.restart()
    }

    /// Toggle a tag constraint and restart from the first page.
    pub fn toggle_tag(&mut self, tag: &str) -> FetchRequest {
        self.filters.toggle_tag(tag);
        self.restart()
    }

    /// Replace the search text and restart from the first page.
    pub fn set_search(&mut self, text: &str) -> FetchRequest {
        self.filters.set_search(text);
        self.restart()
    }

    /// Drop every constraint and restart from the first page.
    pub fn clear_filters(&mut self) -> FetchRequest {
        self.filters.clear();
        self.restart()
    }

    /// Whether forward navigation is offered.
    pub fn can_go_next(&self) -> bool {
        !self.results.loading && self.results.has_next
    }

    /// Whether backward navigation is offered.
    pub fn can_go_prev(&self) -> bool {
        !self.results.loading && self.page > 1
    }

    /// Advance one page, keeping filters.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if !self.can_go_next() {
            return None;
        }
        self.page += 1;
        Some(self.issue())
    }

    /// Go back one page, keeping filters.
    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        if !self.can_go_prev() {
            return None;
        }
        self.page -= 1;
        Some(self.issue())
    }

    /// Whether `ticket` belongs to the newest request.
    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest_ticket
    }

    /// Apply a response. Returns `false` when the ticket is stale and the
    /// response was discarded.
    ///
    /// A failed request shows an empty list, with the reason kept in
    /// [`ResultSet::error`].
    pub fn resolve(&mut self, ticket: u64, result: Result<GamePage, CatalogError>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.results = match result {
            Ok(page) => ResultSet {
                loading: false,
                games: page.games,
                has_next: page.has_next,
                error: None,
            },
            Err(err) => ResultSet {
                loading: false,
                games: Vec::new(),
                has_next: false,
                error: Some(err.to_string()),
            },
        };
        true
    }

    fn restart(&mut self) -> FetchRequest {
        self.page = 1;
        self.issue()
    }

    fn issue(&mut self) -> FetchRequest {
        self.latest_ticket += 1;
        self.results.loading = true;
        FetchRequest {
            ticket: self.latest_ticket,
            filters: self.filters.clone(),
            page: self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NamedRef;

    fn game(id: i64, score: u8) -> Game {
        Game {
            id,
            title: format!("Game {id}"),
            metacritic: Some(score),
            released: None,
            cover_image_url: None,
            genres: vec![NamedRef::new(4, "Action")],
            platforms: Vec::new(),
            developers: Vec::new(),
            tags: Vec::new(),
            description: String::new(),
            trailer_url: String::new(),
        }
    }

    fn page(ids: &[i64], has_next: bool) -> GamePage {
        GamePage {
            games: ids.iter().map(|id| game(*id, 90)).collect(),
            has_next,
        }
    }

    fn loaded_on_page_three() -> BrowseState {
        let mut state = BrowseState::new();
        let request = state.refresh();
        state.resolve(request.ticket, Ok(page(&[1], true)));
        let request = state.next_page().expect("page 2");
        state.resolve(request.ticket, Ok(page(&[2], true)));
        let request = state.next_page().expect("page 3");
        state.resolve(request.ticket, Ok(page(&[3], true)));
        assert_eq!(state.page(), 3);
        state
    }

    #[test]
    fn changing_a_filter_resets_the_page() {
        let mut state = loaded_on_page_three();
        let request = state.set_filter(FilterKey::Genre, "4");
        assert_eq!(state.page(), 1);
        assert_eq!(request.page, 1);
        assert_eq!(request.filters.get(FilterKey::Genre), Some("4"));
        assert!(state.results().loading);
    }

    #[test]
    fn search_edits_and_tag_toggles_also_reset_the_page() {
        let mut state = loaded_on_page_three();
        assert_eq!(state.set_search("zelda").page, 1);

        let mut state = loaded_on_page_three();
        assert_eq!(state.toggle_tag("rpg").page, 1);

        let mut state = loaded_on_page_three();
        assert_eq!(state.clear_filters().page, 1);
    }

    #[test]
    fn toggling_the_same_filter_twice_restores_filters() {
        let mut state = BrowseState::new();
        state.set_filter(FilterKey::Year, "2015");
        let before = state.filters().clone();

        state.set_filter(FilterKey::Developer, "9023");
        state.set_filter(FilterKey::Developer, "9023");
        assert_eq!(state.filters(), &before);
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut state = BrowseState::new();
        let first = state.set_filter(FilterKey::Year, "2015");
        let second = state.set_filter(FilterKey::Year, "2016");
        assert!(second.ticket > first.ticket);

        assert!(state.resolve(second.ticket, Ok(page(&[2016], false))));
        assert!(!state.resolve(first.ticket, Ok(page(&[2015], true))));

        assert_eq!(state.results().games[0].id, 2016);
        assert!(!state.results().has_next);
        assert!(!state.results().loading);
    }

    #[test]
    fn older_response_arriving_first_does_not_clear_loading() {
        let mut state = BrowseState::new();
        let first = state.refresh();
        let second = state.set_search("witcher");

        assert!(!state.resolve(first.ticket, Ok(page(&[1], true))));
        assert!(state.results().loading);
        assert!(state.results().games.is_empty());

        assert!(state.resolve(second.ticket, Ok(page(&[2], false))));
        assert!(!state.results().loading);
    }

    #[test]
    fn paging_follows_has_next_and_first_page() {
        let mut state = BrowseState::new();
        assert!(state.prev_page().is_none());

        let request = state.refresh();
        assert!(state.next_page().is_none(), "no paging while loading");
        state.resolve(request.ticket, Ok(page(&[1], false)));
        assert!(state.next_page().is_none());

        let request = state.refresh();
        state.resolve(request.ticket, Ok(page(&[1], true)));
        let next = state.next_page().expect("next page offered");
        assert_eq!(next.page, 2);
        state.resolve(next.ticket, Ok(page(&[2], false)));

        let prev = state.prev_page().expect("previous page offered");
        assert_eq!(prev.page, 1);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn paging_keeps_filters() {
        let mut state = BrowseState::new();
        let request = state.set_filter(FilterKey::Platform, "4");
        state.resolve(request.ticket, Ok(page(&[1], true)));

        let next = state.next_page().expect("next page offered");
        assert_eq!(next.filters.get(FilterKey::Platform), Some("4"));
    }

    #[test]
    fn failures_show_empty_results_with_reason() {
        let mut state = BrowseState::new();
        let request = state.refresh();
        let err = CatalogError::Status {
            status: 502,
            path: "games".to_string(),
        };

        assert!(state.resolve(request.ticket, Err(err)));
        let results = state.results();
        assert!(results.games.is_empty());
        assert!(!results.has_next);
        assert!(results.error.as_deref().unwrap_or_default().contains("502"));
    }
}
