//! Account aggregate: the root document persisted to the remote store.
//!
//! An [`Account`] owns a collection of [`Layout`]s and the user's grid
//! settings.  The whole document is written back with a single idempotent PUT,
//! so every structural rule about layouts is enforced here before a write is
//! ever scheduled.
//!
//! # The single-default rule
//!
//! Whenever `layouts` is non-empty, exactly one layout has `is_default = true`.
//! [`Account::repair_default`] restores the rule after any mutation: it keeps
//! the first default it finds, demotes the rest, and promotes the first layout
//! when none is marked.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::layout::{Layout, LayoutId};

/// Root aggregate for one signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub layouts: Vec<Layout>,
    #[serde(default)]
    pub settings: AccountSettings,
}

/// Display and grid behaviour settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    #[serde(default = "default_true")]
    pub is_dark_mode: bool,
    #[serde(default)]
    pub general: GeneralSettings,
}

/// Grid feature toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    #[serde(default)]
    pub side_bar: bool,
    #[serde(default = "default_true")]
    pub column_hover_highlight: bool,
    #[serde(default)]
    pub pagination: bool,
    #[serde(default = "default_true")]
    pub resizable_columns: bool,
    #[serde(default = "default_true")]
    pub sorting: bool,
    #[serde(default = "default_true")]
    pub filter: bool,
    #[serde(default)]
    pub floating_filter: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            is_dark_mode: true,
            general: GeneralSettings::default(),
        }
    }
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            side_bar: false,
            column_hover_highlight: true,
            pagination: false,
            resizable_columns: true,
            sorting: true,
            filter: true,
            floating_filter: false,
        }
    }
}

/// Partial settings update.  `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub is_dark_mode: Option<bool>,
    #[serde(default)]
    pub general: GeneralSettingsPatch,
}

/// Partial update of [`GeneralSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettingsPatch {
    pub side_bar: Option<bool>,
    pub column_hover_highlight: Option<bool>,
    pub pagination: Option<bool>,
    pub resizable_columns: Option<bool>,
    pub sorting: Option<bool>,
    pub filter: Option<bool>,
    pub floating_filter: Option<bool>,
}

impl AccountSettings {
    /// Applies `patch` field by field, nested `general` included.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.is_dark_mode {
            self.is_dark_mode = v;
        }
        let g = &patch.general;
        let cur = &mut self.general;
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(v) = g.$field { cur.$field = v; })*
            };
        }
        merge!(
            side_bar,
            column_hover_highlight,
            pagination,
            resizable_columns,
            sorting,
            filter,
            floating_filter
        );
    }
}

impl Account {
    /// Creates an account with default settings and no layouts.
    pub fn new(id: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: None,
            layouts: Vec::new(),
            settings: AccountSettings::default(),
        }
    }

    /// Looks up a layout by identifier.
    pub fn layout(&self, id: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// Returns the position of the layout with identifier `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.layouts.iter().position(|l| l.id == id)
    }

    /// Returns the default layout, if any.
    pub fn default_layout(&self) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.is_default)
    }

    /// Layout identifiers in collection order.
    pub fn layout_ids(&self) -> Vec<LayoutId> {
        self.layouts.iter().map(|l| l.id.clone()).collect()
    }

    /// Returns `true` if `id` is already used by a layout in this account.
    pub fn contains_layout(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Mints an identifier that no layout in this account uses.
    pub fn mint_layout_id(&self) -> LayoutId {
        loop {
            let candidate = Uuid::new_v4().simple().to_string();
            if !self.contains_layout(&candidate) {
                return candidate;
            }
        }
    }

    /// Demotes every layout except `id`, which is promoted.
    ///
    /// Returns `false` (and changes nothing) when `id` is unknown.
    pub fn make_default(&mut self, id: &str) -> bool {
        if !self.contains_layout(id) {
            return false;
        }
        for layout in &mut self.layouts {
            layout.is_default = layout.id == id;
        }
        true
    }

    /// Restores the single-default rule.
    ///
    /// Keeps the first layout marked default, demotes any later ones, and
    /// promotes the first layout when none is marked.  Returns `true` when a
    /// flag was changed.
    pub fn repair_default(&mut self) -> bool {
        let mut changed = false;
        let mut seen = false;
        for layout in &mut self.layouts {
            if layout.is_default {
                if seen {
                    layout.is_default = false;
                    changed = true;
                }
                seen = true;
            }
        }
        if !seen {
            if let Some(first) = self.layouts.first_mut() {
                first.is_default = true;
                changed = true;
            }
        }
        changed
    }

    /// Number of layouts with `is_default = true`.
    pub fn default_count(&self) -> usize {
        self.layouts.iter().filter(|l| l.is_default).count()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
