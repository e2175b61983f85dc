// Gemini tab titles library entry point.
// The content-side title watcher and the popup tab roster share nothing
// but the browser's tab registry.

// Core modules
pub mod error;
pub mod settings;

// Shared state
pub mod state;

// Pure logic modules (no host I/O)
pub mod modules;

// Host-side implementations
pub mod page;
pub mod registry;

pub use error::{EnvError, PatternError, SelectorError, SettingsError};
pub use modules::display_title::{compute_display_title, ELLIPSIS, MAX_TITLE_CHARS};
pub use modules::match_pattern::MatchPattern;
pub use modules::selector::ClassSelector;
pub use modules::tab_environment::TabEnvironment;
pub use modules::tab_roster::{Activation, RowKind, TabListView, TabRosterController, TabRow};
pub use modules::title_sync::{mutation_channel, HostDocument, SyncOutcome, TitleSyncWatcher};
pub use page::HtmlPage;
pub use registry::TabRegistry;
pub use settings::Settings;
pub use state::{MutationBatch, TabCommand, TabId, TabQuery, TabRecord, WindowId};
