//! # layout-sync-core
//!
//! Domain entities and codecs for saved data-grid layouts.
//!
//! A dashboard user arranges a data grid (column order, widths, visibility,
//! sort, filter, grouping) and saves the arrangement as a named *layout*.
//! Layouts live inside the user's *account* document, which is persisted as a
//! whole to a remote store.  This crate holds everything about that model that
//! does not need I/O:
//!
//! - **`domain`** – `Account`, `Layout`, settings, the stock default layout,
//!   and the `Notifier` port used to surface problems to the user.
//!
//! - **`codec`** – normalization/diffing of grid-state blobs, defensive
//!   decoding of string-encoded state, and the import/export envelope.
//!
//! The application crate (`layout-sync-client`) builds the repository, the
//! save coordinator and the remote store adapters on top of these types.

pub mod codec;
pub mod domain;

pub use codec::envelope::{
    parse_envelope, CandidateRejection, EnvelopeError, ExportedLayout, ImportCandidate,
    LayoutEnvelope, ENVELOPE_TYPE, ENVELOPE_VERSION,
};
pub use codec::safe_parse::safe_parse_state;
pub use codec::state::{are_different, column_order_changed, normalize, NormalizedLayoutState};
pub use domain::account::{
    Account, AccountSettings, GeneralSettings, GeneralSettingsPatch, SettingsPatch,
};
pub use domain::default_layout::{default_layout_state, seed_default_layout};
pub use domain::layout::{Layout, LayoutId};
pub use domain::notification::{Notifier, NullNotifier, Severity, Toast};
