// A host page backed by its HTML markup. The body can be swapped out to
// mimic a single-page app re-rendering; the title lives in its own slot.

use std::sync::{Arc, PoisonError, RwLock};

use arc_swap::ArcSwap;
use scraper::{Html, Selector};

use crate::modules::selector::ClassSelector;
use crate::modules::title_sync::HostDocument;

type TitleListener = Box<dyn Fn(&str) + Send + Sync>;

pub struct HtmlPage {
    body: RwLock<String>,
    title: ArcSwap<String>,
    on_title: Option<TitleListener>,
}

impl HtmlPage {
    pub fn new(html: &str) -> Self {
        let document = Html::parse_document(html);
        let title = first_text(&document, "title").unwrap_or_default();
        let body = Selector::parse("body")
            .ok()
            .and_then(|s| document.select(&s).next().map(|b| b.inner_html()))
            .unwrap_or_default();

        Self {
            body: RwLock::new(body),
            title: ArcSwap::from_pointee(title.trim().to_string()),
            on_title: None,
        }
    }

    /// Called with every title written to the page, e.g. to forward it to
    /// the tab registry.
    pub fn on_title_change<F>(mut self, listener: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_title = Some(Box::new(listener));
        self
    }

    /// Replace the body markup. Callers report the change through the
    /// watcher's mutation channel.
    pub fn replace_body(&self, html: &str) {
        *self.body.write().unwrap_or_else(PoisonError::into_inner) = html.to_string();
    }

    pub fn title_slot(&self) -> Arc<String> {
        self.title.load_full()
    }
}

impl HostDocument for HtmlPage {
    fn text_of(&self, selector: &ClassSelector) -> Option<String> {
        let body = self.body.read().unwrap_or_else(PoisonError::into_inner);
        let fragment = Html::parse_fragment(&body);
        first_text(&fragment, &selector.to_string())
    }

    fn set_title(&self, title: &str) {
        self.title.store(Arc::new(title.to_string()));
        if let Some(listener) = &self.on_title {
            listener(title);
        }
    }

    fn title(&self) -> String {
        self.title.load().as_ref().clone()
    }
}

/// `textContent` of the first element matching `css`.
fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}
