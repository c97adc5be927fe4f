//! Application layer: use cases over the active account.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (`layout-sync-core`: accounts, layouts, codecs) and the infrastructure
//! (HTTP, config files, terminal output).  Use cases here:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "save this
//!   grid arrangement as the default layout").
//! - **Depend on abstractions** ([`account_store::AccountStore`],
//!   [`layout_sync_core::Notifier`]) rather than concrete implementations.
//! - **Contain no network I/O of their own**; the only suspension point is the
//!   awaited store call inside a save job.
//!
//! # Sub-modules
//!
//! - **`session`** – holder of the single active [`layout_sync_core::Account`].
//!
//! - **`account_store`** – the remote persistence port and its error type.
//!
//! - **`save_coordinator`** – coalesced, single-flight, FIFO writes of the
//!   active account.
//!
//! - **`layout_repository`** – every structural change to layouts, with the
//!   single-default rule enforced before any write is queued.
//!
//! - **`manage_account`** – registration, sign-in (with hydration of legacy
//!   documents), sign-out and settings.

pub mod account_store;
pub mod layout_repository;
pub mod manage_account;
pub mod save_coordinator;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
