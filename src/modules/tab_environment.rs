// Capability boundary between the popup logic and the browser.
// The popup only ever talks to the tab registry through this trait.

use async_trait::async_trait;

use crate::error::EnvError;
use crate::state::{TabId, TabQuery, TabRecord, WindowId};

/// What the popup needs from the browser.
///
/// The query is the only awaited call. The commands are one-way: a caller
/// is done once the command has been handed over, and an `Err` only means
/// the browser could not accept it.
#[async_trait]
pub trait TabEnvironment: Send + Sync {
    async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<TabRecord>, EnvError>;

    fn activate_tab(&self, tab: TabId) -> Result<(), EnvError>;

    fn focus_window(&self, window: WindowId) -> Result<(), EnvError>;

    fn create_tab(&self, url: &str) -> Result<(), EnvError>;

    /// Ends the popup context. Nothing runs in the popup afterwards.
    fn close_popup(&self);
}
