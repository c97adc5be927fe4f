//! Codecs for layout state and the import/export document.
//!
//! - **`state`** – projects opaque grid-state blobs onto a canonical shape so
//!   they can be compared without being fooled by key-order noise.
//! - **`safe_parse`** – turns a persisted `state` field that may be a JSON
//!   string back into structured data, never failing past its boundary.
//! - **`envelope`** – the `mediaSchedulerLayouts` export document.

pub mod envelope;
pub mod safe_parse;
pub mod state;
