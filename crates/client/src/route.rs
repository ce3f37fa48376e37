use std::{collections::VecDeque, fmt};

use crate::query::{CATEGORY_FILTERS, FilterSchema, ITEM_FILTERS, ListState, TRANSACTION_FILTERS};

/// A navigable location. List routes carry their page and filters, so a
/// location string alone reproduces the view.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Route {
    #[default]
    Dashboard,
    Transactions(ListState),
    Categories(ListState),
    Items(ListState),
    Analytics,
}

impl Route {
    /// Parses `/path?query`. Unknown paths resolve to the dashboard.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let path = path.trim_matches('/');

        match path {
            "transactions" => Route::Transactions(ListState::parse(&TRANSACTION_FILTERS, query)),
            "category" => Route::Categories(ListState::parse(&CATEGORY_FILTERS, query)),
            "items" => Route::Items(ListState::parse(&ITEM_FILTERS, query)),
            "analytics" => Route::Analytics,
            _ => Route::Dashboard,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Transactions(_) => "/transactions",
            Route::Categories(_) => "/category",
            Route::Items(_) => "/items",
            Route::Analytics => "/analytics",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Transactions(_) => "Transactions",
            Route::Categories(_) => "Categories",
            Route::Items(_) => "Items",
            Route::Analytics => "Analytics",
        }
    }

    pub fn list_state(&self) -> Option<&ListState> {
        match self {
            Route::Transactions(state) | Route::Categories(state) | Route::Items(state) => {
                Some(state)
            }
            Route::Dashboard | Route::Analytics => None,
        }
    }

    pub fn schema(&self) -> Option<&'static FilterSchema> {
        match self {
            Route::Transactions(_) => Some(&TRANSACTION_FILTERS),
            Route::Categories(_) => Some(&CATEGORY_FILTERS),
            Route::Items(_) => Some(&ITEM_FILTERS),
            Route::Dashboard | Route::Analytics => None,
        }
    }

    /// Same route with another list state. Routes without a list are
    /// returned unchanged.
    pub fn with_list_state(&self, state: ListState) -> Self {
        match self {
            Route::Transactions(_) => Route::Transactions(state),
            Route::Categories(_) => Route::Categories(state),
            Route::Items(_) => Route::Items(state),
            Route::Dashboard | Route::Analytics => self.clone(),
        }
    }

    /// Whether both routes show the same screen, whatever the list state.
    pub fn same_screen(&self, other: &Route) -> bool {
        self.path() == other.path()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())?;
        if let Some(state) = self.list_state() {
            write!(f, "?{}", state.serialize())?;
        }
        Ok(())
    }
}

/// Most routes `back` can return to; older ones are forgotten.
pub const HISTORY_LIMIT: usize = 50;

/// Back-navigable stack of visited routes.
#[derive(Clone, Debug, Default)]
pub struct History {
    current: Route,
    previous: VecDeque<Route>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            previous: VecDeque::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Navigates to `route`; returns false when it is already current.
    pub fn push(&mut self, route: Route) -> bool {
        if self.current == route {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, route);
        if self.previous.len() == HISTORY_LIMIT {
            self.previous.pop_front();
        }
        self.previous.push_back(previous);
        true
    }

    /// Replaces the current entry without growing the stack.
    pub fn replace(&mut self, route: Route) {
        self.current = route;
    }

    pub fn can_go_back(&self) -> bool {
        !self.previous.is_empty()
    }

    pub fn back(&mut self) -> Option<&Route> {
        self.current = self.previous.pop_back()?;
        Some(&self.current)
    }

    pub fn len(&self) -> usize {
        self.previous.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterValue;

    #[test]
    fn parse_and_display_round_trip() {
        for raw in [
            "/",
            "/analytics",
            "/items?page=2",
            "/category?page=1&searchQuery=food",
            "/transactions?page=3&categoryId=4&sortOrder=desc&transactionType=expense",
        ] {
            let route = Route::parse(raw);
            assert_eq!(Route::parse(&route.to_string()), route, "location {raw}");
        }
    }

    #[test]
    fn list_routes_always_show_their_page() {
        assert_eq!(Route::parse("/transactions").to_string(), "/transactions?page=1");
        assert_eq!(Route::parse("/items/?page=x").to_string(), "/items?page=1");
    }

    #[test]
    fn unknown_path_is_dashboard() {
        assert_eq!(Route::parse("/nope?page=2"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
    }

    #[test]
    fn transactions_query_is_filtered_by_schema() {
        let route = Route::parse("/transactions?categoryId=9&searchQuery=x&color=red");
        let state = route.list_state().unwrap();
        assert_eq!(state.filters().get("categoryId"), Some(&FilterValue::Integer(9)));
        assert!(!state.filters().contains("color"));
    }

    #[test]
    fn history_back_and_duplicates() {
        let mut history = History::default();
        assert!(history.back().is_none());
        assert!(history.push(Route::parse("/items")));
        assert!(!history.push(Route::parse("/items?page=1")));
        assert!(history.push(Route::parse("/items?page=2")));
        assert_eq!(history.len(), 3);
        assert_eq!(history.back().map(ToString::to_string).as_deref(), Some("/items?page=1"));
        assert_eq!(history.back(), Some(&Route::Dashboard));
        assert!(!history.can_go_back());
    }

    #[test]
    fn history_forgets_the_oldest_routes() {
        let mut history = History::new(Route::Dashboard);
        for page in 1..=(HISTORY_LIMIT as u32 + 10) {
            history.push(Route::Transactions(ListState::new().with_page(page)));
        }
        assert_eq!(history.len(), HISTORY_LIMIT + 1);

        let mut last = None;
        while let Some(route) = history.back() {
            last = Some(route.clone());
        }
        // The dashboard and the first pages fell off the bottom.
        assert_eq!(
            last,
            Some(Route::Transactions(ListState::new().with_page(10)))
        );
    }
}
