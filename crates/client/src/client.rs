use std::time::Duration;

use api_types::{
    category::{Category, CategoryCreate, CategoryListParams, CategoryUpdate},
    comment::{Comment, CommentCreate, CommentListParams, CommentUpdate},
    item::{Item, ItemListParams},
    page::{ListEnvelope, Page},
    stats::{BehaviorInsights, CategorySpending, MonthlyTrend},
    transaction::{Transaction, TransactionCreate, TransactionListParams, TransactionUpdate},
    user::User,
};
use reqwest::{
    Method, RequestBuilder, Response, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ClientError;

type Result<T> = std::result::Result<T, ClientError>;

const NO_QUERY: &[(&str, &str)] = &[];

/// `{"detail": "..."}` or `{"detail": [{"msg": "..."}, ...]}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldDetail>),
}

#[derive(Debug, Deserialize)]
struct FieldDetail {
    msg: String,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        match self.detail {
            ErrorDetail::Message(msg) => Some(msg),
            ErrorDetail::Fields(fields) => fields.into_iter().next().map(|field| field.msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|token| !token.trim().is_empty());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Client> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url =
            Url::parse(&raw).map_err(|err| ClientError::InvalidUrl(format!("{raw}: {err}")))?;

        let mut headers = HeaderMap::new();
        if let Some(token) = self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| ClientError::Server(format!("invalid token: {err}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut http = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(Client {
            base_url,
            http: http.build()?,
        })
    }
}

/// Thin typed wrapper over the budget REST API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.into(),
            token: None,
            timeout: None,
        }
    }

    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::InvalidUrl(format!("{path}: {err}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        debug!(%method, path, "api request");

        let res = build(self.http.request(method.clone(), url)).send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let message = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message);
        warn!(%method, path, status = status.as_u16(), ?message, "api request failed");
        Err(ClientError::from_status(status.as_u16(), message))
    }

    async fn get<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.send(Method::GET, path, |req| req.query(query)).await?;
        Ok(res.json::<T>().await?)
    }

    async fn list<Q, T>(&self, path: &str, query: &Q) -> Result<Page<T>>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let envelope = self.get::<Q, ListEnvelope<T>>(path, query).await?;
        Ok(envelope.into())
    }

    /// Like `list`, for endpoints paged by `skip`/`limit`.
    async fn list_window<Q, T>(&self, path: &str, query: &Q, skip: u64, limit: u64) -> Result<Page<T>>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let envelope = self.get::<Q, ListEnvelope<T>>(path, query).await?;
        Ok(envelope.into_page(skip, limit))
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.send(method, path, |req| req.json(body)).await?;
        Ok(res.json::<T>().await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, |req| req).await?;
        Ok(())
    }

    pub async fn transactions_list(
        &self,
        params: &TransactionListParams,
    ) -> Result<Page<Transaction>> {
        self.list_window("transactions/", params, params.skip, params.limit)
            .await
    }

    pub async fn transaction_get(&self, id: i64) -> Result<Transaction> {
        self.get(&format!("transactions/{id}"), NO_QUERY).await
    }

    pub async fn transaction_create(&self, payload: &TransactionCreate) -> Result<Transaction> {
        self.send_json(Method::POST, "transactions/", payload).await
    }

    pub async fn transaction_update(
        &self,
        id: i64,
        payload: &TransactionUpdate,
    ) -> Result<Transaction> {
        self.send_json(Method::PATCH, &format!("transactions/{id}"), payload)
            .await
    }

    pub async fn transaction_delete(&self, id: i64) -> Result<()> {
        self.delete(&format!("transactions/{id}")).await
    }

    pub async fn category_spending(&self, limit: u32) -> Result<Vec<CategorySpending>> {
        self.get(
            "transactions/statistics/category-spending",
            &[("limit", limit)],
        )
        .await
    }

    pub async fn monthly_trends(&self, months: u32) -> Result<Vec<MonthlyTrend>> {
        self.get("transactions/statistics/monthly-trends", &[("months", months)])
            .await
    }

    pub async fn categories_list(&self, params: &CategoryListParams) -> Result<Page<Category>> {
        self.list_window("categories/", params, params.skip, params.limit)
            .await
    }

    pub async fn category_create(&self, payload: &CategoryCreate) -> Result<Category> {
        self.send_json(Method::POST, "categories/", payload).await
    }

    pub async fn category_update(&self, id: i64, payload: &CategoryUpdate) -> Result<Category> {
        self.send_json(Method::PATCH, &format!("categories/{id}"), payload)
            .await
    }

    pub async fn category_delete(&self, id: i64) -> Result<()> {
        self.delete(&format!("categories/{id}")).await
    }

    pub async fn items_list(&self, params: &ItemListParams) -> Result<Page<Item>> {
        self.list_window("items/", params, params.skip, params.limit)
            .await
    }

    pub async fn item_get(&self, id: Uuid) -> Result<Item> {
        self.get(&format!("items/{id}"), NO_QUERY).await
    }

    pub async fn comments_list(&self, item_id: Uuid) -> Result<Page<Comment>> {
        self.list("comments/", &CommentListParams { item_id }).await
    }

    pub async fn comment_create(&self, payload: &CommentCreate) -> Result<Comment> {
        self.send_json(Method::POST, "comments/", payload).await
    }

    pub async fn comment_update(&self, id: Uuid, payload: &CommentUpdate) -> Result<Comment> {
        self.send_json(Method::PATCH, &format!("comments/{id}"), payload)
            .await
    }

    pub async fn comment_delete(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("comments/{id}")).await
    }

    pub async fn behavior_insights(&self) -> Result<BehaviorInsights> {
        self.get("analytics/behavior-insights", NO_QUERY).await
    }

    pub async fn current_user(&self) -> Result<User> {
        self.get("users/me", NO_QUERY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = Client::new("http://localhost:8000/api/v1").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/api/v1/");
        assert_eq!(
            client.endpoint("/transactions/7").unwrap().as_str(),
            "http://localhost:8000/api/v1/transactions/7"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            Client::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn error_body_takes_first_validation_message() {
        let raw = r#"{"detail":[{"loc":["body","amount"],"msg":"must be positive"},{"msg":"x"}]}"#;
        let body: ErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("must be positive"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Category not found"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Category not found"));
    }
}
