//! CDP event listeners attached to a page for the duration of one fetch

use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent, EventResponseReceived,
    ResourceType,
};
use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::network_idle::NetworkIdleTracker;

/// Status line of the main document response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStatus {
    pub status: u16,
    pub status_text: String,
}

impl DocumentStatus {
    /// Anything in 200..400 counts as a usable page
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Listener tasks owned by one fetch, aborted when dropped
#[derive(Default)]
pub struct ListenerTasks(Vec<JoinHandle<()>>);

impl ListenerTasks {
    pub fn push(&mut self, task: JoinHandle<()>) {
        self.0.push(task);
    }
}

impl Drop for ListenerTasks {
    fn drop(&mut self) {
        for task in &self.0 {
            task.abort();
        }
    }
}

/// Feed request lifecycle events into `tracker`
///
/// # Errors
///
/// Returns an error if any event subscription cannot be created.
pub async fn track_network_activity(
    page: &Page,
    tracker: NetworkIdleTracker,
) -> anyhow::Result<JoinHandle<()>> {
    let mut started = page.event_listener::<EventRequestWillBeSent>().await?;
    let mut finished = page.event_listener::<EventLoadingFinished>().await?;
    let mut failed = page.event_listener::<EventLoadingFailed>().await?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(event) = started.next() => tracker.request_started(event.request_id.inner()),
                Some(event) = finished.next() => tracker.request_settled(event.request_id.inner()),
                Some(event) = failed.next() => tracker.request_settled(event.request_id.inner()),
                else => break,
            }
        }
    }))
}

/// Publish the first main-document response status on a watch channel
///
/// # Errors
///
/// Returns an error if the event subscription cannot be created.
pub async fn watch_document_status(
    page: &Page,
) -> anyhow::Result<(JoinHandle<()>, watch::Receiver<Option<DocumentStatus>>)> {
    let mut responses = page.event_listener::<EventResponseReceived>().await?;
    let (tx, rx) = watch::channel(None);

    let task = tokio::spawn(async move {
        while let Some(event) = responses.next().await {
            if event.r#type == ResourceType::Document {
                let status = DocumentStatus {
                    status: u16::try_from(event.response.status).unwrap_or(0),
                    status_text: event.response.status_text.clone(),
                };
                let _ = tx.send(Some(status));
                break;
            }
        }
    });

    Ok((task, rx))
}

/// Wait briefly for the status listener to catch up after navigation
pub async fn await_document_status(
    rx: &mut watch::Receiver<Option<DocumentStatus>>,
    grace: Duration,
) -> Option<DocumentStatus> {
    let published = match tokio::time::timeout(grace, rx.wait_for(Option::is_some)).await {
        Ok(Ok(status)) => status.clone(),
        _ => None,
    };
    published.or_else(|| rx.borrow().clone())
}
