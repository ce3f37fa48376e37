//! Wire types exchanged with the budget REST API.
//!
//! Field names follow the server's snake_case JSON. Query-string names used by
//! the client-side location (camelCase) live in `budget_client`, not here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod serde_time;

pub mod page {
    use super::*;

    /// A normalized page of results: the items of the requested window plus the
    /// total number of matching rows on the server.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Page<T> {
        pub items: Vec<T>,
        pub total: u64,
    }

    impl<T> Page<T> {
        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }

    impl<T> Default for Page<T> {
        fn default() -> Self {
            Self {
                items: Vec::new(),
                total: 0,
            }
        }
    }

    /// Every list shape the server has been seen returning.
    ///
    /// Transactions and categories answer `{items, total}`, items and comments
    /// answer `{data, count}`, and older category endpoints answer a bare array.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum ListEnvelope<T> {
        Items { items: Vec<T>, total: u64 },
        Data { data: Vec<T>, count: u64 },
        Bare(Vec<T>),
    }

    impl<T> From<ListEnvelope<T>> for Page<T> {
        fn from(envelope: ListEnvelope<T>) -> Self {
            match envelope {
                ListEnvelope::Items { items, total } => Page { items, total },
                ListEnvelope::Data { data, count } => Page {
                    items: data,
                    total: count,
                },
                ListEnvelope::Bare(items) => {
                    let total = items.len() as u64;
                    Page { items, total }
                }
            }
        }
    }

    impl<T> ListEnvelope<T> {
        /// Normalizes the answer to a `skip`/`limit` request.
        ///
        /// A bare array carries no total. It counts the rows before the
        /// window plus its own, and a full window adds one more so the next
        /// page stays reachable.
        pub fn into_page(self, skip: u64, limit: u64) -> Page<T> {
            match self {
                ListEnvelope::Bare(items) => {
                    let len = items.len() as u64;
                    let more = u64::from(limit > 0 && len == limit);
                    Page {
                        items,
                        total: skip + len + more,
                    }
                }
                envelope => envelope.into(),
            }
        }
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        Income,
        Expense,
    }

    impl TransactionType {
        pub const ALL: [TransactionType; 2] = [Self::Income, Self::Expense];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    impl std::str::FromStr for TransactionType {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "income" => Ok(Self::Income),
                "expense" => Ok(Self::Expense),
                other => Err(format!("unknown transaction type \"{other}\"")),
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Cash,
        Card,
    }

    impl PaymentMethod {
        pub const ALL: [PaymentMethod; 2] = [Self::Cash, Self::Card];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Cash => "cash",
                Self::Card => "card",
            }
        }
    }

    impl std::str::FromStr for PaymentMethod {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "cash" => Ok(Self::Cash),
                "card" => Ok(Self::Card),
                other => Err(format!("unknown payment method \"{other}\"")),
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortBy {
        Date,
        Amount,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortOrder {
        Asc,
        Desc,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: i64,
        pub amount: f64,
        pub transaction_type: TransactionType,
        pub category_id: i64,
        /// Calendar date of the transaction. The server may send a full
        /// timestamp; only the date part is kept.
        #[serde(with = "serde_time::date")]
        pub transaction_date: NaiveDate,
        #[serde(default)]
        pub payment_method: Option<PaymentMethod>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default, with = "serde_time::timestamp_opt")]
        pub created_at: Option<DateTime<Utc>>,
        #[serde(default, with = "serde_time::timestamp_opt")]
        pub updated_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub category: Option<crate::category::Category>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionCreate {
        pub amount: f64,
        pub transaction_type: TransactionType,
        pub category_id: i64,
        pub transaction_date: NaiveDate,
        pub payment_method: Option<PaymentMethod>,
        pub description: Option<String>,
    }

    /// Partial update. Unset fields are omitted from the JSON body so the
    /// server leaves them untouched.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transaction_type: Option<TransactionType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transaction_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub payment_method: Option<PaymentMethod>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    impl From<TransactionCreate> for TransactionUpdate {
        fn from(create: TransactionCreate) -> Self {
            Self {
                amount: Some(create.amount),
                transaction_type: Some(create.transaction_type),
                category_id: Some(create.category_id),
                transaction_date: Some(create.transaction_date),
                payment_method: create.payment_method,
                description: create.description,
            }
        }
    }

    /// Query parameters of `GET transactions/`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize)]
    pub struct TransactionListParams {
        pub skip: u64,
        pub limit: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transaction_type: Option<TransactionType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub payment_method: Option<PaymentMethod>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub min_amount: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub max_amount: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub search_query: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub sort_by: Option<SortBy>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub sort_order: Option<SortOrder>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default, with = "serde_time::timestamp_opt")]
        pub created_at: Option<DateTime<Utc>>,
        #[serde(default, with = "serde_time::timestamp_opt")]
        pub updated_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    impl From<CategoryCreate> for CategoryUpdate {
        fn from(create: CategoryCreate) -> Self {
            Self {
                name: Some(create.name),
                description: create.description,
            }
        }
    }

    /// Query parameters of `GET categories/`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize)]
    pub struct CategoryListParams {
        pub skip: u64,
        pub limit: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub search_query: Option<String>,
    }
}

pub mod item {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Item {
        pub id: Uuid,
        pub title: String,
        #[serde(default)]
        pub description: Option<String>,
        /// Tags in the order the server returns them.
        #[serde(default)]
        pub tags: Vec<String>,
        #[serde(default)]
        pub owner_id: Option<Uuid>,
    }

    /// Query parameters of `GET items/`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize)]
    pub struct ItemListParams {
        pub skip: u64,
        pub limit: u64,
    }
}

pub mod comment {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Comment {
        pub id: Uuid,
        pub item_id: Uuid,
        pub author_id: Uuid,
        #[serde(default)]
        pub author_name: Option<String>,
        pub content: String,
        #[serde(with = "serde_time::timestamp")]
        pub created_at: DateTime<Utc>,
        #[serde(with = "serde_time::timestamp")]
        pub updated_at: DateTime<Utc>,
    }

    impl Comment {
        /// Only the author may edit or delete a comment.
        pub fn is_authored_by(&self, user_id: Uuid) -> bool {
            self.author_id == user_id
        }

        pub fn is_edited(&self) -> bool {
            self.created_at != self.updated_at
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CommentCreate {
        pub item_id: Uuid,
        pub content: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CommentUpdate {
        pub content: String,
    }

    /// Query parameters of `GET comments/`.
    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct CommentListParams {
        pub item_id: Uuid,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct User {
        pub id: Uuid,
        pub email: String,
        #[serde(default)]
        pub full_name: Option<String>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategorySpending {
        pub category_id: i64,
        pub category_name: String,
        pub total_amount: f64,
        pub transaction_count: u64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MonthlyTrend {
        pub year: i32,
        pub month: u32,
        pub income: f64,
        pub expense: f64,
        /// `income - expense`, computed by the server.
        pub net: f64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ActivityTrend {
        Increasing,
        Decreasing,
        Stable,
    }

    impl ActivityTrend {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Increasing => "increasing",
                Self::Decreasing => "decreasing",
                Self::Stable => "stable",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BehaviorInsights {
        pub total_items: u64,
        pub total_comments: u64,
        pub average_items_per_day: f64,
        /// Hour of day, 0-23.
        pub most_active_hour: u8,
        /// Day of week, 0 = Monday.
        pub most_active_day: u8,
        pub activity_trend: ActivityTrend,
        #[serde(default)]
        pub top_tags: Vec<String>,
        #[serde(default)]
        pub predicted_next_tags: Vec<String>,
    }

    const DAYS_OF_WEEK: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    impl BehaviorInsights {
        pub fn most_active_day_name(&self) -> Option<&'static str> {
            DAYS_OF_WEEK.get(usize::from(self.most_active_day)).copied()
        }

        /// Renders the most active hour as a one-hour window, e.g. `14:00 - 15:00`.
        pub fn most_active_window(&self) -> String {
            let start = self.most_active_hour;
            format!("{start}:00 - {}:00", u16::from(start) + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        comment::Comment,
        page::{ListEnvelope, Page},
        stats::BehaviorInsights,
        transaction::{Transaction, TransactionType, TransactionUpdate},
    };

    #[test]
    fn envelope_items_total() {
        let raw = r#"{"items":[1,2],"total":7}"#;
        let page: Page<u32> = serde_json::from_str::<ListEnvelope<u32>>(raw).unwrap().into();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, 7);
    }

    #[test]
    fn envelope_data_count() {
        let raw = r#"{"data":[3],"count":11}"#;
        let page: Page<u32> = serde_json::from_str::<ListEnvelope<u32>>(raw).unwrap().into();
        assert_eq!(page.items, vec![3]);
        assert_eq!(page.total, 11);
    }

    #[test]
    fn envelope_bare_array_counts_its_items() {
        let page: Page<u32> = serde_json::from_str::<ListEnvelope<u32>>("[4,5,6]")
            .unwrap()
            .into();
        assert_eq!(page.total, 3);
    }

    #[test]
    fn full_bare_window_leaves_room_for_a_next_page() {
        let envelope = || serde_json::from_str::<ListEnvelope<u32>>("[4,5,6]").unwrap();

        // Page 2 of size 3 came back full: more may follow.
        assert_eq!(envelope().into_page(3, 3).total, 7);
        // A short window is the last one.
        assert_eq!(envelope().into_page(3, 5).total, 6);

        let counted = serde_json::from_str::<ListEnvelope<u32>>(r#"{"items":[1],"total":9}"#)
            .unwrap()
            .into_page(0, 1);
        assert_eq!(counted.total, 9);
    }

    #[test]
    fn transaction_date_accepts_timestamps() {
        let raw = r#"{
            "id": 1,
            "amount": 12.5,
            "transaction_type": "expense",
            "category_id": 2,
            "transaction_date": "2024-03-09T10:15:00",
            "payment_method": null
        }"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.transaction_date.to_string(), "2024-03-09");
        assert!(tx.payment_method.is_none());
        assert!(tx.description.is_none());
    }

    #[test]
    fn transaction_update_omits_unset_fields() {
        let update = TransactionUpdate {
            amount: Some(3.0),
            ..TransactionUpdate::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"amount":3.0}"#);
    }

    #[test]
    fn comment_edited_when_timestamps_differ() {
        let raw = r#"{
            "id": "5f0c6a52-8f5e-4d4b-9a53-0d7c4f7c1a11",
            "item_id": "8d1f2f0e-0a0b-4c1e-9a0a-3f2b1c0d9e8f",
            "author_id": "0c9b8a7f-6e5d-4c3b-2a19-080706050403",
            "content": "hi",
            "created_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-01T10:05:00"
        }"#;
        let comment: Comment = serde_json::from_str(raw).unwrap();
        assert!(comment.is_edited());
    }

    #[test]
    fn insights_labels() {
        let insights = BehaviorInsights {
            total_items: 1,
            total_comments: 0,
            average_items_per_day: 0.5,
            most_active_hour: 23,
            most_active_day: 6,
            activity_trend: super::stats::ActivityTrend::Stable,
            top_tags: vec![],
            predicted_next_tags: vec![],
        };
        assert_eq!(insights.most_active_window(), "23:00 - 24:00");
        assert_eq!(insights.most_active_day_name(), Some("Sunday"));
    }
}
