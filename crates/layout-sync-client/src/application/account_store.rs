//! Port for the remote account store.
//!
//! The store keeps one JSON document per account and exposes idempotent
//! whole-document writes.  Deleting a layout is therefore expressed as a PUT
//! of the account without it; the core never issues a DELETE.

use async_trait::async_trait;
use layout_sync_core::Account;
use thiserror::Error;

/// Errors returned by [`AccountStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("remote store unreachable: {0}")]
    Unreachable(String),

    /// The store answered with a non-success status.
    #[error("remote store rejected request with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("invalid response from remote store: {0}")]
    InvalidResponse(String),
}

/// Remote persistence for whole account documents.
///
/// Implementations must make `put_account` idempotent: writing the same
/// document twice leaves the store in the same state as writing it once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Replaces the stored document for `account.id`.
    async fn put_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Fetches the account with identifier `id`, `None` if unknown.
    async fn get_account(&self, id: &str) -> Result<Option<Account>, StoreError>;

    /// Fetches the first account whose first name equals `name`.
    async fn find_account_by_name(&self, name: &str) -> Result<Option<Account>, StoreError>;
}
