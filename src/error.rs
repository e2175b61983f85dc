use thiserror::Error;

use crate::state::{TabId, WindowId};

/// Failure of a tab registry query or command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("no open tab with id {0}")]
    TabNotFound(TabId),
    #[error("no open window with id {0}")]
    WindowNotFound(WindowId),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("popup context already closed")]
    PopupClosed,
    #[error("tab registry unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("match pattern is missing '://': {0}")]
    MissingScheme(String),
    #[error("unsupported scheme in match pattern: {0}")]
    InvalidScheme(String),
    #[error("invalid host in match pattern: {0}")]
    InvalidHost(String),
    #[error("match pattern has no path: {0}")]
    MissingPath(String),
    #[error("invalid path in match pattern: {0}")]
    InvalidPath(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("only compound class selectors like '.a.b' are supported: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("invalid new tab url '{0}'")]
    InvalidUrl(String),
}
