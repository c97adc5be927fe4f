//! Adapters implementing the [`AccountStore`](crate::application::account_store::AccountStore) port.
//!
//! - **`http`** – the real remote store, spoken to with `reqwest`.
//! - **`memory`** – a map-backed store for `--offline` runs and tests.

pub mod http;
pub mod memory;

pub use http::HttpAccountStore;
pub use memory::InMemoryAccountStore;
