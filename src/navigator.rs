use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::Url;
use tokio::sync::watch;

use crate::data_models::QueryMap;

pub const HOME_PATH: &str = "/";
pub const SEARCH_PATH: &str = "/search";

/// Placeholder origin used to lean on `Url` for path/query encoding.
const LOCAL_ORIGIN: &str = "http://localhost";

/// A route: path plus decoded query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub query: QueryMap,
}

impl Location {
    pub fn new(pathname: impl Into<String>, query: QueryMap) -> Self {
        Location {
            pathname: pathname.into(),
            query,
        }
    }

    pub fn home() -> Self {
        Location::new(HOME_PATH, QueryMap::new())
    }

    /// Parses a relative href such as `/search?term=rust&type=news`.
    /// Repeated keys keep their last value.
    pub fn parse(href: &str) -> Option<Location> {
        let url = Url::parse(LOCAL_ORIGIN).ok()?.join(href).ok()?;
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Some(Location::new(url.path(), query))
    }

    /// Relative href with a percent-encoded query string.
    pub fn href(&self) -> String {
        let Ok(mut url) = Url::parse(LOCAL_ORIGIN) else {
            return self.pathname.clone();
        };
        url.set_path(&self.pathname);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::home()
    }
}

/// Reads and replaces the current route without a full reload.
pub trait Navigator: Send + Sync {
    fn current_query(&self) -> QueryMap;

    fn push(&self, pathname: &str, query: QueryMap);
}

/// In-process navigator keeping a history stack and broadcasting every push.
pub struct MemoryNavigator {
    history: Mutex<Vec<Location>>,
    location_tx: watch::Sender<Location>,
}

impl MemoryNavigator {
    pub fn new(initial: Location) -> Self {
        let (location_tx, _) = watch::channel(initial.clone());
        MemoryNavigator {
            history: Mutex::new(vec![initial]),
            location_tx,
        }
    }

    /// Starts at `href`, or at the home page when it does not parse.
    pub fn at(href: &str) -> Self {
        MemoryNavigator::new(Location::parse(href).unwrap_or_default())
    }

    pub fn location(&self) -> Location {
        self.location_tx.borrow().clone()
    }

    /// Every location visited so far, oldest first.
    pub fn history(&self) -> Vec<Location> {
        self.lock_history().clone()
    }

    /// Pops the current entry. Returns false when already at the first entry.
    pub fn back(&self) -> bool {
        let previous = {
            let mut history = self.lock_history();
            if history.len() < 2 {
                return false;
            }
            history.pop();
            history.last().cloned()
        };
        if let Some(location) = previous {
            log::debug!("navigating back to {}", location.href());
            self.location_tx.send_replace(location);
        }
        true
    }

    /// Receiver notified on every push (and back), identical or not.
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location_tx.subscribe()
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<Location>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        MemoryNavigator::new(Location::home())
    }
}

impl Navigator for MemoryNavigator {
    fn current_query(&self) -> QueryMap {
        self.location_tx.borrow().query.clone()
    }

    fn push(&self, pathname: &str, query: QueryMap) {
        let location = Location::new(pathname, query);
        log::debug!("navigating to {}", location.href());
        self.lock_history().push(location.clone());
        self.location_tx.send_replace(location);
    }
}
