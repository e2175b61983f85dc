// Keeps the tab title in step with the page's conversation title element.
//
// Every trigger re-derives the title from the current document. Mutation
// batches are only a "something changed" signal, so coalesced or extra
// batches can never leave the title out of date.

use std::sync::Arc;

use futures_util::{FutureExt, Stream, StreamExt};
use log::{debug, info, trace};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::modules::display_title::compute_display_title;
use crate::modules::selector::ClassSelector;
use crate::state::MutationBatch;

/// The page as seen from the content side.
///
/// `set_title` writes the single externally owned title slot; the watcher
/// never caches what it last wrote.
pub trait HostDocument: Send + Sync {
    /// Text content of the first element under body matching `selector`.
    fn text_of(&self, selector: &ClassSelector) -> Option<String>;
    fn set_title(&self, title: &str);
    fn title(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Updated(String),
    MissingElement,
    EmptyText,
}

pub struct TitleSyncWatcher<D> {
    document: Arc<D>,
    selector: ClassSelector,
}

impl<D: HostDocument> TitleSyncWatcher<D> {
    pub fn new(document: Arc<D>, selector: ClassSelector) -> Self {
        Self { document, selector }
    }

    /// Look the title element up and mirror its text into the tab title.
    ///
    /// Leaves the current title alone when the element is absent or its
    /// trimmed text is empty.
    pub fn sync_title(&self) -> SyncOutcome {
        let Some(text) = self.document.text_of(&self.selector) else {
            trace!("[TitleSync] {} not found, leaving title", self.selector);
            return SyncOutcome::MissingElement;
        };

        if text.trim().is_empty() {
            trace!("[TitleSync] {} is empty, leaving title", self.selector);
            return SyncOutcome::EmptyText;
        }

        let title = compute_display_title(&text);
        debug!("[TitleSync] Setting title: {}", title);
        self.document.set_title(&title);
        SyncOutcome::Updated(title)
    }

    /// Sync once, then once per mutation signal until the stream ends.
    ///
    /// Signals that are already queued when one arrives are folded into the
    /// same re-derivation.
    pub async fn run<S>(self, signals: S)
    where
        S: Stream<Item = MutationBatch>,
    {
        info!("[TitleSync] Watching {}", self.selector);
        self.sync_title();

        let mut signals = std::pin::pin!(signals);
        while let Some(first) = signals.next().await {
            let mut records = first.records;
            let mut batches = 1usize;
            let mut ended = false;

            loop {
                match signals.next().now_or_never() {
                    Some(Some(batch)) => {
                        records += batch.records;
                        batches += 1;
                    }
                    Some(None) => {
                        ended = true;
                        break;
                    }
                    None => break,
                }
            }

            debug!("[TitleSync] {} batch(es), {} record(s)", batches, records);
            self.sync_title();

            if ended {
                break;
            }
        }

        info!("[TitleSync] Mutation stream closed, watcher stopped");
    }

    pub fn spawn<S>(self, signals: S) -> JoinHandle<()>
    where
        D: 'static,
        S: Stream<Item = MutationBatch> + Send + 'static,
    {
        tokio::spawn(self.run(signals))
    }
}

/// Channel the page side uses to report subtree changes to a watcher.
pub fn mutation_channel() -> (
    mpsc::UnboundedSender<MutationBatch>,
    impl Stream<Item = MutationBatch> + Send + 'static,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|batch| (batch, rx))
    });
    (tx, stream)
}
