// In-process tab registry: windows, tabs, the active tab of each window
// and which window has focus. Implements `TabEnvironment`, so the popup
// controller runs against it unchanged.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info};
use url::Url;

use crate::error::EnvError;
use crate::modules::match_pattern::MatchPattern;
use crate::modules::tab_environment::TabEnvironment;
use crate::state::{TabCommand, TabId, TabQuery, TabRecord, WindowId};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TabRegistry {
    // Creation order, which is also query order.
    tabs: Mutex<Vec<TabRecord>>,
    windows: Mutex<Vec<WindowId>>,
    active_tabs: DashMap<WindowId, TabId>,
    focused_window: Mutex<Option<WindowId>>,
    next_tab_id: AtomicU32,
    next_window_id: AtomicU32,
    popup_closed: AtomicBool,
    commands: Mutex<Vec<TabCommand>>,
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TabRegistry {
    pub fn new() -> Self {
        Self {
            tabs: Mutex::new(Vec::new()),
            windows: Mutex::new(Vec::new()),
            active_tabs: DashMap::new(),
            focused_window: Mutex::new(None),
            next_tab_id: AtomicU32::new(1),
            next_window_id: AtomicU32::new(1),
            popup_closed: AtomicBool::new(false),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Open a new, empty window. New windows take focus.
    pub fn open_window(&self) -> WindowId {
        let id = WindowId(self.next_window_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.windows).push(id);
        *lock(&self.focused_window) = Some(id);
        debug!("[Registry] Opened {}", id);
        id
    }

    /// Add a tab to `window`. The first tab of a window becomes its active tab.
    pub fn open_tab(&self, window: WindowId, url: &str, title: Option<&str>) -> TabId {
        {
            let mut windows = lock(&self.windows);
            if !windows.contains(&window) {
                windows.push(window);
            }
        }

        let id = TabId(self.next_tab_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.tabs).push(TabRecord {
            id,
            window_id: window,
            title: title.map(str::to_string),
            url: url.to_string(),
        });
        self.active_tabs.entry(window).or_insert(id);
        debug!("[Registry] Opened {} in {} at {}", id, window, url);
        id
    }

    pub fn close_tab(&self, id: TabId) -> Option<TabRecord> {
        let mut tabs = lock(&self.tabs);
        let index = tabs.iter().position(|t| t.id == id)?;
        let closed = tabs.remove(index);

        let window = closed.window_id;
        let was_active = self
            .active_tabs
            .get(&window)
            .map(|active| *active == id)
            .unwrap_or(false);
        if was_active {
            match tabs.iter().rev().find(|t| t.window_id == window) {
                Some(next) => {
                    self.active_tabs.insert(window, next.id);
                }
                None => {
                    self.active_tabs.remove(&window);
                }
            }
        }

        debug!("[Registry] Closed {}", id);
        Some(closed)
    }

    /// Title change reported by a page.
    pub fn set_title(&self, id: TabId, title: &str) -> Result<(), EnvError> {
        let mut tabs = lock(&self.tabs);
        let tab = tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(EnvError::TabNotFound(id))?;
        tab.title = Some(title.to_string());
        Ok(())
    }

    pub fn tab(&self, id: TabId) -> Option<TabRecord> {
        lock(&self.tabs).iter().find(|t| t.id == id).cloned()
    }

    pub fn tabs(&self) -> Vec<TabRecord> {
        lock(&self.tabs).clone()
    }

    pub fn active_tab(&self, window: WindowId) -> Option<TabId> {
        self.active_tabs.get(&window).map(|id| *id)
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        *lock(&self.focused_window)
    }

    /// A fresh popup context, e.g. the user clicked the toolbar icon again.
    pub fn open_popup(&self) {
        self.popup_closed.store(false, Ordering::SeqCst);
    }

    pub fn is_popup_closed(&self) -> bool {
        self.popup_closed.load(Ordering::SeqCst)
    }

    /// Every query and command received, oldest first.
    pub fn commands(&self) -> Vec<TabCommand> {
        lock(&self.commands).clone()
    }

    fn record(&self, command: TabCommand) -> Result<(), EnvError> {
        if self.is_popup_closed() {
            return Err(EnvError::PopupClosed);
        }
        lock(&self.commands).push(command);
        Ok(())
    }
}

#[async_trait]
impl TabEnvironment for TabRegistry {
    async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<TabRecord>, EnvError> {
        self.record(TabCommand::Query {
            url: query.url.clone(),
        })?;
        let pattern =
            MatchPattern::parse(&query.url).map_err(|_| EnvError::InvalidUrl(query.url.clone()))?;

        let matching: Vec<TabRecord> = lock(&self.tabs)
            .iter()
            .filter(|t| pattern.matches_str(&t.url))
            .cloned()
            .collect();
        debug!("[Registry] Query {} matched {} tab(s)", pattern, matching.len());
        Ok(matching)
    }

    fn activate_tab(&self, tab: TabId) -> Result<(), EnvError> {
        self.record(TabCommand::Activate { tab })?;
        let record = self.tab(tab).ok_or(EnvError::TabNotFound(tab))?;
        self.active_tabs.insert(record.window_id, tab);
        Ok(())
    }

    fn focus_window(&self, window: WindowId) -> Result<(), EnvError> {
        self.record(TabCommand::FocusWindow { window })?;
        if !lock(&self.windows).contains(&window) {
            return Err(EnvError::WindowNotFound(window));
        }
        *lock(&self.focused_window) = Some(window);
        Ok(())
    }

    fn create_tab(&self, url: &str) -> Result<(), EnvError> {
        self.record(TabCommand::Create {
            url: url.to_string(),
        })?;
        Url::parse(url).map_err(|_| EnvError::InvalidUrl(url.to_string()))?;

        let window = match self.focused_window() {
            Some(w) => w,
            None => self.open_window(),
        };
        let id = self.open_tab(window, url, None);
        self.active_tabs.insert(window, id);
        info!("[Registry] Created {} at {}", id, url);
        Ok(())
    }

    fn close_popup(&self) {
        if self.record(TabCommand::ClosePopup).is_ok() {
            self.popup_closed.store(true, Ordering::SeqCst);
            info!("[Registry] Popup closed");
        }
    }
}
