use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::config::Config;
use crate::data_models::{QueryMap, SearchResponse, SearchType};
use crate::errors::{EmptyTermError, FetchError, FetchResult};
use crate::navigator::{HOME_PATH, Location, Navigator, SEARCH_PATH};
use crate::pagination::{self, NextPolicy};
use crate::query_state::{QueryState, TYPE_KEY};
use crate::renderer::{ResultsPage, SearchPage};
use crate::search_client::SearchBackend;

#[derive(Debug, Clone)]
pub enum SearchStatus {
    /// No searchable term in the URL.
    Idle,
    Loading,
    Loaded(SearchResponse),
    Failed(Arc<FetchError>),
}

impl SearchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchStatus::Loading)
    }

    pub fn response(&self) -> Option<&SearchResponse> {
        match self {
            SearchStatus::Loaded(response) => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            SearchStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Snapshot handed to the view.
#[derive(Debug, Clone)]
pub struct SearchView {
    pub query: QueryState,
    pub status: SearchStatus,
}

/// State of the search box shared by the home page and the header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchForm {
    pub selected_type: SearchType,
    /// Initial value of the input, the term currently in the URL.
    pub input: String,
}

impl SearchForm {
    fn sync(&mut self, raw: &QueryMap, query: &QueryState) {
        self.input = query.term.clone();
        // keep the user's pick when the URL carries no (valid) type
        if let Some(search_type) = raw
            .get(TYPE_KEY)
            .and_then(|value| SearchType::from_query_value(value))
        {
            self.selected_type = search_type;
        }
    }
}

/// Tags one in-flight request with the state it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    query: QueryState,
}

impl RequestTicket {
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct ControllerState {
    /// Last query observed through `location_changed`.
    query: Option<QueryState>,
    generation: u64,
    status: SearchStatus,
    form: SearchForm,
    /// Pushes issued through this controller, and how many of them
    /// `location_changed` has already handled.
    pushes: u64,
    handled_pushes: u64,
}

/// Drives a search page from the navigator's URL.
///
/// User actions only push a new URL. Fetching happens in reaction to a
/// location change (`location_changed` + `fetch`, or `listen`), and only the
/// latest request may commit its outcome.
pub struct SearchController<B, N> {
    backend: B,
    navigator: N,
    next_policy: NextPolicy,
    state: Mutex<ControllerState>,
}

impl<B, N> SearchController<B, N>
where
    B: SearchBackend,
    N: Navigator,
{
    pub fn new(backend: B, navigator: N) -> Self {
        SearchController {
            backend,
            navigator,
            next_policy: NextPolicy::default(),
            state: Mutex::new(ControllerState {
                query: None,
                generation: 0,
                status: SearchStatus::Idle,
                form: SearchForm::default(),
                pushes: 0,
                handled_pushes: 0,
            }),
        }
    }

    pub fn with_config(backend: B, navigator: N, config: &Config) -> Self {
        Self::new(backend, navigator).with_next_policy(config.next_policy())
    }

    pub fn with_next_policy(mut self, policy: NextPolicy) -> Self {
        self.next_policy = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn next_policy(&self) -> NextPolicy {
        self.next_policy
    }

    pub fn view(&self) -> SearchView {
        let state = self.lock_state();
        SearchView {
            query: state.query.clone().unwrap_or_default(),
            status: state.status.clone(),
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.lock_state().status.clone()
    }

    pub fn form(&self) -> SearchForm {
        self.lock_state().form.clone()
    }

    /// What the search page should display right now.
    pub fn page(&self) -> SearchPage {
        let view = self.view();
        match view.status {
            SearchStatus::Idle => SearchPage::Idle,
            SearchStatus::Loading => SearchPage::Loading,
            SearchStatus::Failed(err) => SearchPage::Failed {
                message: err.to_string(),
            },
            SearchStatus::Loaded(response) if response.is_empty() => SearchPage::NoResults,
            SearchStatus::Loaded(response) => SearchPage::Results(ResultsPage::new(
                &view.query,
                &response.results,
                response.total,
                self.next_policy,
            )),
        }
    }

    /// Query state decoded from the navigator's current URL.
    pub fn current_query_state(&self) -> QueryState {
        QueryState::parse(&self.navigator.current_query())
    }

    /// Reacts to the navigator's current URL. Returns a ticket when a request
    /// must be issued for it.
    ///
    /// An unchanged query is ignored. The one exception is a failed search
    /// that was pushed again since the last call, so re-submitting it retries
    /// while repeated calls without a navigation do not. A blank term goes
    /// back to `Idle`. Either way any request still in flight becomes stale.
    pub fn location_changed(&self) -> Option<RequestTicket> {
        let raw = self.navigator.current_query();
        let query = QueryState::parse(&raw);

        let mut state = self.lock_state();
        state.form.sync(&raw, &query);

        let navigated = state.pushes != state.handled_pushes;
        state.handled_pushes = state.pushes;

        let retry = navigated && matches!(state.status, SearchStatus::Failed(_));
        if state.query.as_ref() == Some(&query) && !retry {
            return None;
        }

        state.generation += 1;
        state.query = Some(query.clone());
        if !query.is_searchable() {
            state.status = SearchStatus::Idle;
            return None;
        }

        state.status = SearchStatus::Loading;
        log::info!(
            "searching {} for {:?} start={} (request #{})",
            query.search_type,
            query.term,
            query.offset,
            state.generation
        );
        Some(RequestTicket {
            generation: state.generation,
            query,
        })
    }

    /// Issues the request for `ticket` and commits the outcome if the ticket
    /// is still current. Returns whether it was committed.
    pub async fn fetch(&self, ticket: RequestTicket) -> bool {
        let query = &ticket.query;
        let outcome = self
            .backend
            .search(&query.term, query.search_type, query.offset)
            .await;
        self.commit(&ticket, outcome)
    }

    /// `location_changed` followed by `fetch` when needed.
    pub async fn refresh(&self) -> bool {
        match self.location_changed() {
            Some(ticket) => self.fetch(ticket).await,
            None => false,
        }
    }

    fn commit(&self, ticket: &RequestTicket, outcome: FetchResult<SearchResponse>) -> bool {
        let current = self.current_query_state();

        let mut state = self.lock_state();
        if state.generation != ticket.generation || current != ticket.query {
            log::debug!(
                "discarding stale response for request #{} ({} {:?} start={})",
                ticket.generation,
                ticket.query.search_type,
                ticket.query.term,
                ticket.query.offset
            );
            return false;
        }

        state.status = match outcome {
            Ok(response) => {
                log::info!(
                    "request #{} loaded {} of {} results",
                    ticket.generation,
                    response.results.len(),
                    response.total
                );
                SearchStatus::Loaded(response)
            }
            Err(err) => {
                log::error!("request #{} failed: {:#}", ticket.generation, err);
                SearchStatus::Failed(Arc::new(err))
            }
        };
        true
    }

    /// Pushes `query` as the new search URL.
    pub fn navigate(&self, query: &QueryState) {
        self.navigator.push(SEARCH_PATH, query.to_query());
        self.lock_state().pushes += 1;
    }

    /// Search box submit. Uses the form's selected type and starts at the
    /// first page.
    pub fn submit_search(&self, input: &str) -> Result<QueryState, EmptyTermError> {
        let term = input.trim();
        if term.is_empty() {
            log::debug!("ignoring empty search submission");
            return Err(EmptyTermError);
        }

        let search_type = {
            let mut state = self.lock_state();
            state.form.input = term.to_string();
            state.form.selected_type
        };
        let query = QueryState::new(term, search_type);
        self.navigate(&query);
        Ok(query)
    }

    /// Type toggle. Re-runs the current search with the new type when the URL
    /// holds one, otherwise only updates the form.
    pub fn select_type(&self, search_type: SearchType) -> Option<QueryState> {
        self.lock_state().form.selected_type = search_type;

        let current = self.current_query_state();
        if !current.is_searchable() || current.search_type == search_type {
            return None;
        }
        let query = current.with_type(search_type);
        self.navigate(&query);
        Some(query)
    }

    pub fn next_page(&self) -> Option<QueryState> {
        let current = self.current_query_state();
        if !current.is_searchable() {
            return None;
        }

        let offset = pagination::next(current.offset);
        if offset == current.offset {
            return None;
        }
        if self.next_policy == NextPolicy::GuardByTotal {
            let state = self.lock_state();
            let total = state
                .status
                .response()
                .filter(|_| state.query.as_ref() == Some(&current))
                .map(|response| response.total);
            if total.is_some_and(|total| offset >= total) {
                return None;
            }
        }

        let query = current.with_offset(offset);
        self.navigate(&query);
        Some(query)
    }

    /// No-op on the first page.
    pub fn previous_page(&self) -> Option<QueryState> {
        let current = self.current_query_state();
        if !current.is_searchable() || !pagination::can_go_previous(current.offset) {
            return None;
        }
        let query = current.with_offset(pagination::previous(current.offset));
        self.navigate(&query);
        Some(query)
    }

    /// Logo click.
    pub fn go_home(&self) {
        self.navigator.push(HOME_PATH, QueryMap::new());
        self.lock_state().pushes += 1;
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B, N> SearchController<B, N>
where
    B: SearchBackend + 'static,
    N: Navigator + 'static,
{
    /// Follows location changes until the sender side goes away, issuing one
    /// spawned request per change. Handles the current location first.
    pub async fn listen(self: Arc<Self>, mut changes: watch::Receiver<Location>) {
        // the first refresh covers whatever was pushed before listening
        changes.borrow_and_update();
        self.spawn_refresh();
        while changes.changed().await.is_ok() {
            self.spawn_refresh();
        }
        log::debug!("location channel closed, search controller stops listening");
    }

    fn spawn_refresh(self: &Arc<Self>) {
        if let Some(ticket) = self.location_changed() {
            let controller = Arc::clone(self);
            tokio::spawn(async move {
                controller.fetch(ticket).await;
            });
        }
    }
}
