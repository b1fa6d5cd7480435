pub mod error;
pub mod users;

use error::{ApiError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
pub use users::{ApiResponse, Info, User, UserQuery};

/// Client for a paginated user list endpoint.
///
/// The base URL is fixed at construction. Every call is a single GET with no
/// shared mutable state, so one client can serve any number of concurrent
/// requests.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|e| {
            debug!(base_url = base_url.as_ref(), error = %e, "Invalid base URL");
            ApiError::InvalidUrl(e)
        })?;

        let client = Client::builder()
            .user_agent(format!("userlist/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL a request for `query` is sent to: the base URL with its query
    /// replaced by `page={page}&results={results}`.
    pub fn request_url(&self, query: UserQuery) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(&query.query_string()));
        url
    }

    /// Fetches one page of users and checks it against the response schema.
    pub async fn get_users(&self, query: UserQuery) -> Result<ApiResponse> {
        let response: ApiResponse = self.get_json(query).await?;

        if let Err(err) = response.validate() {
            debug!(page = query.page, results = query.results, error = %err, "Rejected user list response");
            return Err(err);
        }

        debug!(
            page = query.page,
            count = response.results.len(),
            "Fetched users"
        );
        Ok(response)
    }

    pub async fn get_users_page(&self, page: i64, results: i64) -> Result<ApiResponse> {
        self.get_users(UserQuery::new(page, results)).await
    }

    /// Issues the same request as [`ApiClient::get_users`] but decodes the
    /// body into any type, e.g. `serde_json::Value` for the raw payload.
    pub async fn get_json<T: DeserializeOwned>(&self, query: UserQuery) -> Result<T> {
        let url = self.request_url(query);

        debug!(url = %url, "Sending request");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            debug!(url = %url, error = %e, "Request failed");
            ApiError::RequestFailed(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| format!("Unexpected status: {}", status));
            debug!(url = %url, status = status.as_u16(), "Server returned an error status");
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            debug!(url = %url, error = %e, "Failed to read response body");
            ApiError::RequestFailed(e)
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            debug!(url = %url, error = %e, "Failed to parse JSON response");
            ApiError::JsonError(e)
        })
    }
}
