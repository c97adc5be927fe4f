//! LayoutRepository: every structural change to the active account's layouts.
//!
//! The repository is the only writer of `Account::layouts`.  Each operation
//! runs to completion against the in-memory account, repairs the invariants,
//! and only then asks the [`SaveCoordinator`] for a write, so a queued job
//! always sees a consistent collection.
//!
//! # Invariants kept after every call
//!
//! - Exactly one layout is default whenever the collection is non-empty.
//! - Layout identifiers are unique within the account.
//! - `state_revision` increases iff the normalized state changed.
//!
//! # State isolation
//!
//! `state` is a `serde_json::Value`, an owned tree.  Storing a layout moves or
//! clones that tree, so no two layouts (and no caller) can share a sub-object
//! with the stored copy.
//!
//! # Persistence per operation
//!
//! | Operation | Write path |
//! |-----------|------------|
//! | `save_layout` | coalesced, reason `layouts` |
//! | `set_default_layout` | coalesced, reason `default` |
//! | `import_layouts_from_json` | coalesced, reason `import` (only if something was imported) |
//! | `repair_state_isolation` | coalesced, reason `repair` |
//! | `delete_layout` | immediate, awaited (`persist_now`) |

use std::sync::Arc;

use chrono::Utc;
use layout_sync_core::{
    are_different, parse_envelope, safe_parse_state, EnvelopeError, ImportCandidate, Layout,
    LayoutEnvelope, Notifier, Toast,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::save_coordinator::{SaveCoordinator, SaveError};
use super::session::ActiveAccount;

/// Errors returned by repository operations that can fail visibly.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no active account")]
    NoActiveAccount,

    #[error("layout not found: {0}")]
    LayoutNotFound(String),

    #[error("failed to serialize layout export: {0}")]
    Export(#[from] serde_json::Error),

    #[error("failed to persist account: {0}")]
    Persist(#[from] SaveError),
}

/// Errors that reject an import as a whole.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no active account")]
    NoActiveAccount,

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Layouts merged into the account.
    pub imported: usize,
    /// Entries rejected individually (missing name or state, not an object).
    pub skipped: usize,
}

pub struct LayoutRepository {
    active: Arc<ActiveAccount>,
    saves: Arc<SaveCoordinator>,
    notifier: Arc<dyn Notifier>,
}

impl LayoutRepository {
    pub fn new(
        active: Arc<ActiveAccount>,
        saves: Arc<SaveCoordinator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            active,
            saves,
            notifier,
        }
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    /// Snapshot of the active account's layouts, empty when signed out.
    pub fn layouts(&self) -> Vec<Layout> {
        self.active
            .with(|a| a.layouts.clone())
            .unwrap_or_default()
    }

    /// The default layout of the active account.
    pub fn default_layout(&self) -> Option<Layout> {
        self.active
            .with(|a| a.default_layout().cloned())
            .flatten()
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Inserts or replaces `layout` and queues a write.
    ///
    /// - An existing identifier replaces that entry in place.  Its revision is
    ///   bumped past the stored one when the normalized state changed;
    ///   otherwise the caller's revision is kept.
    /// - Any other identifier (including an empty one) is treated as a new
    ///   layout: a fresh, collision-free identifier is assigned and the layout
    ///   is appended.
    /// - `is_default = true` demotes every other layout.  If no layout ends up
    ///   default, the first one is promoted.
    ///
    /// Returns the stored layout so the caller can select it, or `None` (and
    /// does nothing) when no account is active.
    pub fn save_layout(&self, layout: Layout) -> Option<Layout> {
        let stored = self
            .active
            .with_mut(|account| {
                let mut layout = layout;
                layout.ensure_revision();

                let existing = (!layout.id.is_empty())
                    .then(|| account.position(&layout.id))
                    .flatten();
                match existing {
                    Some(idx) => {
                        let previous = &account.layouts[idx];
                        if are_different(&previous.state, &layout.state) {
                            layout.state_revision = Some(previous.revision() + 1);
                        }
                        account.layouts[idx] = layout.clone();
                    }
                    None => {
                        layout.id = account.mint_layout_id();
                        account.layouts.push(layout.clone());
                    }
                }

                if layout.is_default {
                    account.make_default(&layout.id);
                }
                account.repair_default();
                account.layout(&layout.id).cloned()
            })
            .flatten()?;

        debug!(
            layout = %stored.id,
            revision = stored.revision(),
            is_default = stored.is_default,
            "layout saved"
        );
        self.saves.enqueue("layouts");
        Some(stored)
    }

    /// Removes the layout `id` and writes the account immediately.
    ///
    /// If the removed layout was the default, the first remaining layout is
    /// promoted.  The write bypasses the coalescing window but still waits
    /// its turn behind any write already queued.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::NoActiveAccount`] / [`RepositoryError::LayoutNotFound`]
    ///   before anything changes.
    /// - [`RepositoryError::Persist`] if the write failed.  The layout stays
    ///   removed in memory and the next save carries the removal.
    pub async fn delete_layout(&self, id: &str) -> Result<Layout, RepositoryError> {
        let removed = self
            .active
            .with_mut(|account| {
                let idx = account.position(id)?;
                let removed = account.layouts.remove(idx);
                account.repair_default();
                Some(removed)
            })
            .ok_or(RepositoryError::NoActiveAccount)?
            .ok_or_else(|| RepositoryError::LayoutNotFound(id.to_string()))?;

        info!(layout = %removed.id, name = %removed.name, "layout deleted");
        self.saves.persist_now("delete").await?;
        Ok(removed)
    }

    /// Makes `id` the only default layout and queues a write.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NoActiveAccount`] or [`RepositoryError::LayoutNotFound`];
    /// nothing changes in either case.
    pub fn set_default_layout(&self, id: &str) -> Result<(), RepositoryError> {
        let found = self
            .active
            .with_mut(|account| account.make_default(id))
            .ok_or(RepositoryError::NoActiveAccount)?;
        if !found {
            return Err(RepositoryError::LayoutNotFound(id.to_string()));
        }
        debug!(layout = id, "default layout changed");
        self.saves.enqueue("default");
        Ok(())
    }

    /// Serializes the selected layouts (all when `ids` is `None`) into an
    /// export envelope.
    ///
    /// Unknown identifiers in `ids` are ignored.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NoActiveAccount`] when signed out.
    pub fn export_layouts(&self, ids: Option<&[String]>) -> Result<String, RepositoryError> {
        let json = self
            .active
            .with(|account| {
                let selected = account
                    .layouts
                    .iter()
                    .filter(|l| ids.map_or(true, |ids| ids.contains(&l.id)));
                let envelope = LayoutEnvelope::new(selected, Utc::now());
                debug!(count = envelope.count, "layouts exported");
                envelope.to_json()
            })
            .ok_or(RepositoryError::NoActiveAccount)??;
        Ok(json)
    }

    /// Merges the layouts of an export envelope into the active account.
    ///
    /// Entries are validated one by one: entries without a name or a state
    /// are skipped.  Identifiers that collide with existing layouts are
    /// replaced by fresh ones, and names and descriptions are truncated to
    /// their storage limits.  Merged layouts are appended; if that leaves
    /// several defaults, the first one encountered wins.
    ///
    /// # Errors
    ///
    /// A malformed document or wrong envelope shape imports nothing, raises
    /// an error toast and returns [`ImportError::Envelope`].
    pub fn import_layouts_from_json(&self, text: &str) -> Result<ImportReport, ImportError> {
        if !self.active.is_active() {
            return Err(ImportError::NoActiveAccount);
        }

        let entries = match parse_envelope(text) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("layout import rejected: {e}");
                self.notifier
                    .notify(Toast::error("Import", "Invalid layouts file."));
                return Err(e.into());
            }
        };

        let mut report = ImportReport::default();
        let mut candidates = Vec::with_capacity(entries.len());
        for (index, raw) in entries.iter().enumerate() {
            match ImportCandidate::from_value(raw) {
                Ok(candidate) => candidates.push(candidate),
                Err(reason) => {
                    debug!(index, %reason, "import entry skipped");
                    report.skipped += 1;
                }
            }
        }

        report.imported = self
            .active
            .with_mut(|account| {
                let count = candidates.len();
                for candidate in candidates {
                    let mut layout = candidate.into_layout();
                    if layout.id.is_empty() || account.contains_layout(&layout.id) {
                        layout.id = account.mint_layout_id();
                    }
                    account.layouts.push(layout);
                }
                account.repair_default();
                count
            })
            .ok_or(ImportError::NoActiveAccount)?;

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "layouts imported"
        );
        if report.imported > 0 {
            self.notifier.notify(Toast::success(
                "Import",
                format!("Imported {} layout(s).", report.imported),
            ));
            self.saves.enqueue("import");
        }
        Ok(report)
    }

    /// Normalizes every stored `state` to structured data and queues a write.
    ///
    /// States still held as JSON-encoded strings are decoded; undecodable
    /// ones become `null` (with an error toast).  Returns the number of
    /// states rewritten, or `None` when signed out.
    pub fn repair_state_isolation(&self) -> Option<usize> {
        let repaired = self.active.with_mut(|account| {
            let mut repaired = 0;
            for layout in &mut account.layouts {
                if layout.state.is_string() {
                    layout.state = safe_parse_state(&layout.state, self.notifier.as_ref())
                        .unwrap_or(Value::Null);
                    repaired += 1;
                }
            }
            repaired
        })?;

        debug!(repaired, "layout states repaired");
        self.saves.enqueue("repair");
        Some(repaired)
    }

    /// Backfills `state_revision = 0` on layouts that lack one.
    ///
    /// Returns the number of layouts changed.  Does not queue a write; the
    /// backfilled values travel with the next save.
    pub fn ensure_revisions(&self) -> usize {
        self.active
            .with_mut(|account| {
                account
                    .layouts
                    .iter_mut()
                    .map(Layout::ensure_revision)
                    .filter(|changed| *changed)
                    .count()
            })
            .unwrap_or(0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
