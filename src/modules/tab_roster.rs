// Popup tab roster: one snapshot of matching tabs per popup open.
//
// The list is built once in `load_tabs` and never refreshed. A tab that
// closes between render and click is still dispatched; the browser decides
// what happens to the command.

use std::sync::Arc;

use arc_swap::ArcSwap;
use log::{debug, info};

use crate::error::EnvError;
use crate::modules::tab_environment::TabEnvironment;
use crate::settings::Settings;
use crate::state::{TabId, TabQuery, TabRecord, WindowId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    NewTab,
    Empty,
    Tab { id: TabId, window_id: WindowId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRow {
    kind: RowKind,
    label: String,
    full_title: Option<String>,
}

impl TabRow {
    fn new_tab(label: &str) -> Self {
        Self {
            kind: RowKind::NewTab,
            label: label.to_string(),
            full_title: None,
        }
    }

    fn empty(label: &str) -> Self {
        Self {
            kind: RowKind::Empty,
            label: label.to_string(),
            full_title: None,
        }
    }

    fn tab(record: &TabRecord, fallback: &str) -> Self {
        let title = record.title.clone().unwrap_or_default();
        let label = if title.is_empty() {
            fallback.to_string()
        } else {
            title.clone()
        };
        Self {
            kind: RowKind::Tab {
                id: record.id,
                window_id: record.window_id,
            },
            label,
            full_title: Some(title),
        }
    }

    pub fn kind(&self) -> &RowKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Untruncated tab title for hover disclosure. Only tab rows have one,
    /// and it is `""` when the tab has no title.
    pub fn full_title(&self) -> Option<&str> {
        self.full_title.as_deref()
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            RowKind::NewTab => "tab-item new-chat",
            RowKind::Empty => "empty",
            RowKind::Tab { .. } => "tab-item",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabListView {
    rows: Vec<TabRow>,
}

impl TabListView {
    pub fn rows(&self) -> &[TabRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&TabRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(TabRow::label).collect()
    }

    /// Markup for the popup's list container.
    pub fn render_html(&self, container_id: &str) -> String {
        let mut html = format!("<ul id=\"{}\">", escape_html(container_id));
        for row in &self.rows {
            html.push_str(&format!("<li class=\"{}\"", row.css_class()));
            if let Some(full) = row.full_title() {
                html.push_str(&format!(" title=\"{}\"", escape_html(full)));
            }
            html.push('>');
            html.push_str(&escape_html(row.label()));
            html.push_str("</li>");
        }
        html.push_str("</ul>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Result of clicking a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    NewTab,
    SwitchedTo { tab: TabId, window: WindowId },
    Ignored,
}

pub struct TabRosterController<E> {
    env: Arc<E>,
    url_pattern: String,
    new_tab_url: String,
    new_tab_label: String,
    empty_label: String,
    fallback_title: String,
    list_container_id: String,
    view: ArcSwap<TabListView>,
}

impl<E: TabEnvironment> TabRosterController<E> {
    pub fn new(env: Arc<E>, settings: &Settings) -> Self {
        Self {
            env,
            url_pattern: settings.tab_url_pattern.clone(),
            new_tab_url: settings.new_tab_url.clone(),
            new_tab_label: settings.new_tab_label.clone(),
            empty_label: settings.empty_label.clone(),
            fallback_title: settings.fallback_title.clone(),
            list_container_id: settings.list_container_id.clone(),
            view: ArcSwap::from_pointee(TabListView::default()),
        }
    }

    /// The list as currently rendered.
    pub fn view(&self) -> Arc<TabListView> {
        self.view.load_full()
    }

    /// Current list rendered into the configured container.
    pub fn render_html(&self) -> String {
        self.view.load().render_html(&self.list_container_id)
    }

    /// Build the popup list: the new-tab row, then either one row per
    /// matching tab in query order or a single empty-state row.
    ///
    /// If the query fails the error is returned and the rendered list keeps
    /// only the new-tab row.
    pub async fn load_tabs(&self) -> Result<TabListView, EnvError> {
        let mut view = TabListView::default();
        view.rows.push(TabRow::new_tab(&self.new_tab_label));
        self.view.store(Arc::new(view.clone()));

        let query = TabQuery {
            url: self.url_pattern.clone(),
        };
        let tabs = self.env.query_tabs(&query).await?;

        if tabs.is_empty() {
            view.rows.push(TabRow::empty(&self.empty_label));
        } else {
            view.rows
                .extend(tabs.iter().map(|t| TabRow::tab(t, &self.fallback_title)));
        }

        info!("[TabRoster] Loaded {} matching tab(s), {} row(s)", tabs.len(), view.len());
        self.view.store(Arc::new(view.clone()));
        Ok(view)
    }

    /// Handle a click on row `index` of the rendered list.
    ///
    /// Commands are sent without waiting for or checking their outcome,
    /// then the popup is closed.
    pub fn activate(&self, index: usize) -> Activation {
        let view = self.view.load();
        let Some(row) = view.row(index) else {
            return Activation::Ignored;
        };

        match row.kind {
            RowKind::Empty => Activation::Ignored,
            RowKind::NewTab => {
                info!("[TabRoster] Opening new tab at {}", self.new_tab_url);
                if let Err(e) = self.env.create_tab(&self.new_tab_url) {
                    debug!("[TabRoster] create tab not accepted: {}", e);
                }
                self.env.close_popup();
                Activation::NewTab
            }
            RowKind::Tab { id, window_id } => {
                info!("[TabRoster] Switching to {} in {}", id, window_id);
                if let Err(e) = self.env.activate_tab(id) {
                    debug!("[TabRoster] activate {} not accepted: {}", id, e);
                }
                if let Err(e) = self.env.focus_window(window_id) {
                    debug!("[TabRoster] focus {} not accepted: {}", window_id, e);
                }
                self.env.close_popup();
                Activation::SwitchedTo {
                    tab: id,
                    window: window_id,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TabRegistry;
    use crate::state::TabCommand;
    use async_trait::async_trait;

    const GEMINI: &str = "https://gemini.google.com/app";

    fn controller(registry: &Arc<TabRegistry>) -> TabRosterController<TabRegistry> {
        TabRosterController::new(registry.clone(), &Settings::default())
    }

    #[tokio::test]
    async fn test_no_matching_tabs_renders_two_rows() {
        let registry = Arc::new(TabRegistry::new());
        let window = registry.open_window();
        registry.open_tab(window, "https://example.com/", Some("Elsewhere"));

        let view = controller(&registry).load_tabs().await.unwrap();

        assert_eq!(view.labels(), ["+ New Chat", "No matching tabs open"]);
        assert_eq!(view.rows()[0].css_class(), "tab-item new-chat");
        assert_eq!(view.rows()[1].css_class(), "empty");
    }

    #[tokio::test]
    async fn test_matching_tabs_in_query_order() {
        let registry = Arc::new(TabRegistry::new());
        let w1 = registry.open_window();
        let w2 = registry.open_window();
        registry.open_tab(w1, GEMINI, Some("Rust borrow checker"));
        registry.open_tab(w1, "https://example.com/", Some("Not listed"));
        registry.open_tab(w2, "https://gemini.google.com/app/2", None);
        registry.open_tab(w2, "https://gemini.google.com/app/3", Some(""));

        let view = controller(&registry).load_tabs().await.unwrap();

        assert_eq!(view.len(), 4);
        assert_eq!(view.labels(), ["+ New Chat", "Rust borrow checker", "Gemini", "Gemini"]);
        assert_eq!(view.rows()[1].full_title(), Some("Rust borrow checker"));
        assert_eq!(view.rows()[2].full_title(), Some(""));
        assert!(view.rows()[1..].iter().all(|r| r.css_class() == "tab-item"));
    }

    #[tokio::test]
    async fn test_full_title_is_kept_for_long_titles() {
        let registry = Arc::new(TabRegistry::new());
        let window = registry.open_window();
        let long = "A conversation title that is definitely longer than fifty characters";
        registry.open_tab(window, GEMINI, Some(long));

        let view = controller(&registry).load_tabs().await.unwrap();

        assert_eq!(view.rows()[1].full_title(), Some(long));
    }

    #[tokio::test]
    async fn test_activate_tab_row_sends_commands_in_order() {
        let registry = Arc::new(TabRegistry::new());
        let w1 = registry.open_window();
        let w2 = registry.open_window();
        registry.open_tab(w1, GEMINI, Some("First"));
        let target = registry.open_tab(w2, GEMINI, Some("Second"));
        let roster = controller(&registry);
        roster.load_tabs().await.unwrap();

        let activation = roster.activate(2);

        assert_eq!(activation, Activation::SwitchedTo { tab: target, window: w2 });
        let commands = registry.commands();
        assert_eq!(
            &commands[1..],
            [
                TabCommand::Activate { tab: target },
                TabCommand::FocusWindow { window: w2 },
                TabCommand::ClosePopup,
            ]
        );
        assert_eq!(registry.active_tab(w2), Some(target));
        assert_eq!(registry.focused_window(), Some(w2));
        assert!(registry.is_popup_closed());
    }

    #[tokio::test]
    async fn test_activate_new_tab_row() {
        let registry = Arc::new(TabRegistry::new());
        let roster = controller(&registry);
        roster.load_tabs().await.unwrap();

        assert_eq!(roster.activate(0), Activation::NewTab);
        let commands = registry.commands();
        assert_eq!(
            &commands[1..],
            [
                TabCommand::Create { url: "https://gemini.google.com/".into() },
                TabCommand::ClosePopup,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_row_and_out_of_range_are_ignored() {
        let registry = Arc::new(TabRegistry::new());
        let roster = controller(&registry);
        roster.load_tabs().await.unwrap();

        assert_eq!(roster.activate(1), Activation::Ignored);
        assert_eq!(roster.activate(7), Activation::Ignored);
        assert!(!registry.is_popup_closed());
        assert_eq!(registry.commands().len(), 1);
    }

    #[tokio::test]
    async fn test_tab_closed_after_render_still_dispatches() {
        let registry = Arc::new(TabRegistry::new());
        let window = registry.open_window();
        let tab = registry.open_tab(window, GEMINI, Some("Soon gone"));
        let roster = controller(&registry);
        roster.load_tabs().await.unwrap();

        registry.close_tab(tab);

        assert_eq!(roster.activate(1), Activation::SwitchedTo { tab, window });
        assert!(registry.commands().contains(&TabCommand::Activate { tab }));
        assert!(registry.is_popup_closed());
    }

    struct FailingEnv;

    #[async_trait]
    impl TabEnvironment for FailingEnv {
        async fn query_tabs(&self, _query: &TabQuery) -> Result<Vec<TabRecord>, EnvError> {
            Err(EnvError::Unavailable("tabs permission missing".into()))
        }
        fn activate_tab(&self, _tab: TabId) -> Result<(), EnvError> {
            Ok(())
        }
        fn focus_window(&self, _window: WindowId) -> Result<(), EnvError> {
            Ok(())
        }
        fn create_tab(&self, _url: &str) -> Result<(), EnvError> {
            Ok(())
        }
        fn close_popup(&self) {}
    }

    #[tokio::test]
    async fn test_query_failure_leaves_new_tab_row_only() {
        let roster = TabRosterController::new(Arc::new(FailingEnv), &Settings::default());

        let err = roster.load_tabs().await.unwrap_err();

        assert!(matches!(err, EnvError::Unavailable(_)));
        assert_eq!(roster.view().labels(), ["+ New Chat"]);
    }

    #[tokio::test]
    async fn test_controller_renders_into_configured_container() {
        let registry = Arc::new(TabRegistry::new());
        let settings = Settings {
            list_container_id: "myList".into(),
            ..Settings::default()
        };
        let roster = TabRosterController::new(registry, &settings);
        roster.load_tabs().await.unwrap();

        assert_eq!(
            roster.render_html(),
            "<ul id=\"myList\">\
             <li class=\"tab-item new-chat\">+ New Chat</li>\
             <li class=\"empty\">No matching tabs open</li>\
             </ul>"
        );
    }

    #[test]
    fn test_render_html_escapes_titles() {
        let record = TabRecord {
            id: TabId(4),
            window_id: WindowId(1),
            title: Some("<b>\"Fish\" & chips</b>".into()),
            url: GEMINI.into(),
        };
        let view = TabListView {
            rows: vec![TabRow::new_tab("+ New Chat"), TabRow::tab(&record, "Gemini")],
        };

        assert_eq!(
            view.render_html("tabList"),
            "<ul id=\"tabList\">\
             <li class=\"tab-item new-chat\">+ New Chat</li>\
             <li class=\"tab-item\" title=\"&lt;b&gt;&quot;Fish&quot; &amp; chips&lt;/b&gt;\">\
             &lt;b&gt;&quot;Fish&quot; &amp; chips&lt;/b&gt;</li>\
             </ul>"
        );
    }
}
