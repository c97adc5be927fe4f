//! Domain entities for saved grid layouts.
//!
//! This module contains pure business rules with no infrastructure
//! dependencies: no HTTP, no async runtime, no file system.  Code in the
//! application and infrastructure layers depends on it; it never depends on
//! them.

/// The account aggregate and its settings.
pub mod account;

/// Stock layout seeded on registration.
pub mod default_layout;

/// The `Layout` entity.
pub mod layout;

/// Notification port (`Toast`, `Notifier`).
pub mod notification;
