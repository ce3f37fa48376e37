//! Client core for the budget service: a typed REST client, a keyed query
//! cache, filter/pagination state mirrored into a location string, and the
//! dialog mutation flow.

pub mod cache;
pub mod client;
pub mod error;
pub mod forms;
pub mod mutation;
pub mod queries;
pub mod query;
pub mod resource;
pub mod route;

pub use cache::{CachedEntry, QueryCache, QueryKey};
pub use client::{Client, ClientBuilder};
pub use error::{ClientError, FetchError, FieldError, ValidationErrors};
pub use mutation::{DialogState, MutationDialog, MutationStatus, Notice, NoticeLevel, Settlement};
pub use queries::QueryClient;
pub use query::{FilterSet, FilterValue, FormValue, ListState, sanitize};
pub use resource::Resource;
pub use route::{History, Route};
