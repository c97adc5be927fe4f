//! Infrastructure layer for the layout-sync client.
//!
//! Contains the I/O-facing adapters: the remote account store (HTTP and
//! in-memory), toast sinks, and configuration file storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `layout_sync_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod notify;
pub mod remote;
pub mod storage;
