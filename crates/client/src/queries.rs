//! Cached read queries: each one derives a cache key from the resource and
//! its list state, and loads through the shared [`QueryCache`].

use std::sync::Arc;

use api_types::{
    category::{Category, CategoryListParams},
    comment::Comment,
    item::{Item, ItemListParams},
    page::Page,
    stats::{BehaviorInsights, CategorySpending, MonthlyTrend},
    transaction::{SortBy, SortOrder, Transaction, TransactionListParams},
    user::User,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    cache::{QueryCache, QueryKey},
    client::Client,
    error::FetchError,
    query::ListState,
    resource::Resource,
};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const DEFAULT_ITEMS_PAGE_SIZE: u64 = 5;
pub const CATEGORY_SPENDING_LIMIT: u32 = 10;
pub const MONTHLY_TRENDS_MONTHS: u32 = 6;
/// Enough categories to fill a picker in one request.
pub const ALL_CATEGORIES_LIMIT: u64 = 100;

type QueryResult<T> = Result<Arc<T>, FetchError>;

/// Cache key of one list view.
pub fn list_key(resource: Resource, state: &ListState) -> QueryKey {
    QueryKey::with_params(resource, state.to_pairs())
}

/// Maps the location-side filters of a transactions view onto the API's
/// query parameters.
pub fn transaction_params(state: &ListState, page_size: u64) -> TransactionListParams {
    let filters = state.filters();
    let date = |name: &str| {
        filters
            .text(name)
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    };

    TransactionListParams {
        skip: state.skip(page_size),
        limit: page_size,
        transaction_type: filters.text("transactionType").and_then(|raw| raw.parse().ok()),
        category_id: filters.integer("categoryId"),
        payment_method: filters.text("paymentMethod").and_then(|raw| raw.parse().ok()),
        start_date: date("startDate"),
        end_date: date("endDate"),
        min_amount: filters.number("minAmount"),
        max_amount: filters.number("maxAmount"),
        search_query: filters.text("searchQuery").map(str::to_string),
        sort_by: match filters.text("sortBy") {
            Some("date") => Some(SortBy::Date),
            Some("amount") => Some(SortBy::Amount),
            _ => None,
        },
        sort_order: match filters.text("sortOrder") {
            Some("asc") => Some(SortOrder::Asc),
            Some("desc") => Some(SortOrder::Desc),
            _ => None,
        },
    }
}

pub fn all_categories_key() -> QueryKey {
    QueryKey::new(Resource::Categories).param("limit", ALL_CATEGORIES_LIMIT)
}

pub fn comments_key(item_id: Uuid) -> QueryKey {
    QueryKey::new(Resource::Comments).param("itemId", item_id)
}

pub fn category_spending_key() -> QueryKey {
    QueryKey::new(Resource::CategorySpending).param("limit", CATEGORY_SPENDING_LIMIT)
}

pub fn monthly_trends_key() -> QueryKey {
    QueryKey::new(Resource::MonthlyTrends).param("months", MONTHLY_TRENDS_MONTHS)
}

pub fn category_params(state: &ListState, page_size: u64) -> CategoryListParams {
    CategoryListParams {
        skip: state.skip(page_size),
        limit: page_size,
        search_query: state.filters().text("searchQuery").map(str::to_string),
    }
}

#[derive(Debug, Clone)]
pub struct QueryClient {
    client: Client,
    cache: Arc<QueryCache>,
    page_size: u64,
    items_page_size: u64,
}

impl QueryClient {
    pub fn new(client: Client, cache: Arc<QueryCache>) -> Self {
        Self {
            client,
            cache,
            page_size: DEFAULT_PAGE_SIZE,
            items_page_size: DEFAULT_ITEMS_PAGE_SIZE,
        }
    }

    pub fn with_page_sizes(mut self, page_size: u64, items_page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self.items_page_size = items_page_size.max(1);
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn items_page_size(&self) -> u64 {
        self.items_page_size
    }

    pub async fn transactions(&self, state: &ListState) -> QueryResult<Page<Transaction>> {
        let params = transaction_params(state, self.page_size);
        self.cache
            .fetch(list_key(Resource::Transactions, state), || {
                self.client.transactions_list(&params)
            })
            .await
    }

    pub async fn categories(&self, state: &ListState) -> QueryResult<Page<Category>> {
        let params = category_params(state, self.page_size);
        self.cache
            .fetch(list_key(Resource::Categories, state), || {
                self.client.categories_list(&params)
            })
            .await
    }

    /// Every category, for pickers and name lookups.
    pub async fn all_categories(&self) -> QueryResult<Page<Category>> {
        let params = CategoryListParams {
            skip: 0,
            limit: ALL_CATEGORIES_LIMIT,
            search_query: None,
        };
        self.cache
            .fetch(all_categories_key(), || self.client.categories_list(&params))
            .await
    }

    pub async fn items(&self, state: &ListState) -> QueryResult<Page<Item>> {
        let params = ItemListParams {
            skip: state.skip(self.items_page_size),
            limit: self.items_page_size,
        };
        self.cache
            .fetch(list_key(Resource::Items, state), || {
                self.client.items_list(&params)
            })
            .await
    }

    pub async fn comments(&self, item_id: Uuid) -> QueryResult<Page<Comment>> {
        self.cache
            .fetch(comments_key(item_id), || self.client.comments_list(item_id))
            .await
    }

    pub async fn category_spending(&self) -> QueryResult<Vec<CategorySpending>> {
        self.cache
            .fetch(category_spending_key(), || self.client.category_spending(CATEGORY_SPENDING_LIMIT))
            .await
    }

    pub async fn monthly_trends(&self) -> QueryResult<Vec<MonthlyTrend>> {
        self.cache
            .fetch(monthly_trends_key(), || self.client.monthly_trends(MONTHLY_TRENDS_MONTHS))
            .await
    }

    pub async fn behavior_insights(&self) -> QueryResult<BehaviorInsights> {
        self.cache
            .fetch(QueryKey::new(Resource::BehaviorInsights), || {
                self.client.behavior_insights()
            })
            .await
    }

    pub async fn current_user(&self) -> QueryResult<User> {
        self.cache
            .fetch(QueryKey::new(Resource::CurrentUser), || {
                self.client.current_user()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use api_types::transaction::{PaymentMethod, TransactionType};

    use super::*;
    use crate::query::TRANSACTION_FILTERS;

    #[test]
    fn location_filters_map_to_api_params() {
        let state = ListState::parse(
            &TRANSACTION_FILTERS,
            "page=3&transactionType=income&paymentMethod=card&startDate=2024-01-01\
             &minAmount=5&searchQuery=rent&sortBy=amount&sortOrder=asc",
        );
        let params = transaction_params(&state, 20);
        assert_eq!(params.skip, 40);
        assert_eq!(params.limit, 20);
        assert_eq!(params.transaction_type, Some(TransactionType::Income));
        assert_eq!(params.payment_method, Some(PaymentMethod::Card));
        assert_eq!(params.start_date.map(|d| d.to_string()).as_deref(), Some("2024-01-01"));
        assert_eq!(params.min_amount, Some(5.0));
        assert_eq!(params.search_query.as_deref(), Some("rent"));
        assert_eq!(params.sort_by, Some(SortBy::Amount));
        assert_eq!(params.sort_order, Some(SortOrder::Asc));
        assert_eq!(params.category_id, None);
    }

    #[test]
    fn api_params_are_snake_case_on_the_wire() {
        let state = ListState::parse(&TRANSACTION_FILTERS, "categoryId=4&sortOrder=desc");
        let query = serde_urlencoded::to_string(transaction_params(&state, 10)).unwrap();
        assert_eq!(query, "skip=0&limit=10&category_id=4&sort_order=desc");
    }

    #[test]
    fn list_key_covers_page_and_filters() {
        let a = ListState::parse(&TRANSACTION_FILTERS, "page=1&categoryId=4");
        let b = a.with_page(2);
        assert_ne!(list_key(Resource::Transactions, &a), list_key(Resource::Transactions, &b));
        assert_eq!(
            list_key(Resource::Transactions, &a),
            list_key(Resource::Transactions, &ListState::parse(&TRANSACTION_FILTERS, "categoryId=4&page=1"))
        );
    }
}
