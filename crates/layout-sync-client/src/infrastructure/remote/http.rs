//! HTTP adapter for the remote account store.
//!
//! The store addresses documents with a selector path segment:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | write | `PUT {base}/Accounts/Account[id='{id}']` with the account as JSON |
//! | read by id | `GET {base}/Accounts/Account[id='{id}']?type=copy` |
//! | read by name | `GET {base}/Accounts/Account[firstName='{name}']?type=copy` |
//!
//! Reads answer with a JSON array; the first element is the account and an
//! empty array (or a 404) means "not found".
//!
//! Selector values are percent-encoded, so quotes and slashes in a name stay
//! inside the selector.

use std::time::Duration;

use async_trait::async_trait;
use layout_sync_core::Account;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::application::account_store::{AccountStore, StoreError};

/// [`AccountStore`] backed by the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpAccountStore {
    client: Client,
    base_url: String,
}

impl HttpAccountStore {
    /// Creates a store rooted at `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unreachable`] if the HTTP client cannot be built
    /// (for instance when the TLS backend fails to initialise).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn account_url(&self, field: &str, value: &str) -> String {
        let value = urlencoding::encode(value);
        format!("{}/Accounts/Account[{field}='{value}']", self.base_url)
    }

    async fn fetch_first(&self, url: String) -> Result<Option<Account>, StoreError> {
        debug!(%url, "fetching account");
        let response = self
            .client
            .get(&url)
            .query(&[("type", "copy")])
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let accounts: Vec<Account> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(accounts.into_iter().next())
    }
}

#[async_trait]
impl AccountStore for HttpAccountStore {
    async fn put_account(&self, account: &Account) -> Result<(), StoreError> {
        let url = self.account_url("id", &account.id);
        debug!(%url, layouts = account.layouts.len(), "writing account");
        let response = self
            .client
            .put(&url)
            .json(account)
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>, StoreError> {
        self.fetch_first(self.account_url("id", id)).await
    }

    async fn find_account_by_name(&self, name: &str) -> Result<Option<Account>, StoreError> {
        self.fetch_first(self.account_url("firstName", name)).await
    }
}

/// Passes successful responses through and turns the rest into
/// [`StoreError::Status`] carrying the response body.
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}
