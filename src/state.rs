// Shared state structs used by both the watcher and the popup side.
// Plain data only, so they can be built in tests without a host.

use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// One open tab as reported by the tab registry.
///
/// The popup only ever reads these; it never creates or destroys them.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: TabId,
    pub window_id: WindowId,
    pub title: Option<String>,
    pub url: String,
}

/// Filter passed to a tab registry query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabQuery {
    pub url: String,
}

/// Commands the popup sends to the environment. Recorded by the registry
/// so callers can inspect what was dispatched and in which order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TabCommand {
    Query { url: String },
    Activate { tab: TabId },
    FocusWindow { window: WindowId },
    Create { url: String },
    ClosePopup,
}

/// Signal delivered by the page whenever its body subtree changed.
///
/// A single batch may stand for any number of coalesced DOM changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationBatch {
    pub records: usize,
}

impl MutationBatch {
    pub fn new(records: usize) -> Self {
        Self { records }
    }
}
