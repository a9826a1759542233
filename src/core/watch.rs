//! Live mode: re-run single-file synchronization on every source change.
//!
//! The notification mechanism sits behind [`ChangeSource`]. [`NotifySource`]
//! implements it on top of `notify`, with the platform watcher or a polling
//! fallback. [`WatchLoop`] consumes events one at a time and hands each to
//! [`Synchronizer::scan_one`]; it never prunes.

use std::{
    future::Future,
    path::{Path, PathBuf},
    time::Duration,
};

use notify::{EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info, warn};

use super::{
    error::WatchError,
    scanner::SourceFilter,
    sync::{PassReport, Synchronizer},
};

/// A created or modified source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
}

/// Something that reports changes under a directory tree.
pub trait ChangeSource {
    /// Start delivering events for files accepted by `filter` to `events`.
    fn subscribe(
        &mut self,
        filter: SourceFilter,
        events: UnboundedSender<ChangeEvent>,
    ) -> Result<(), WatchError>;

    /// Stop delivering events. Calling it without a subscription is a no-op.
    fn unsubscribe(&mut self) -> Result<(), WatchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The platform's notification API (inotify, FSEvents, ...).
    Native,
    /// Periodic rescans, for filesystems without notifications.
    Poll(Duration),
}

pub struct NotifySource {
    backend: Backend,
    active: Option<(Box<dyn Watcher + Send>, PathBuf)>,
}

impl NotifySource {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            active: None,
        }
    }
}

impl ChangeSource for NotifySource {
    fn subscribe(
        &mut self,
        filter: SourceFilter,
        events: UnboundedSender<ChangeEvent>,
    ) -> Result<(), WatchError> {
        self.unsubscribe()?;

        let root = filter.root().to_path_buf();
        let subscribe_error = |source| WatchError::Subscribe {
            path: root.clone(),
            source,
        };

        let handler = forward_events(filter, events);
        let mut watcher: Box<dyn Watcher + Send> = match self.backend {
            Backend::Native => Box::new(
                RecommendedWatcher::new(handler, notify::Config::default())
                    .map_err(subscribe_error)?,
            ),
            Backend::Poll(interval) => Box::new(
                PollWatcher::new(
                    handler,
                    notify::Config::default().with_poll_interval(interval),
                )
                .map_err(subscribe_error)?,
            ),
        };
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(subscribe_error)?;

        debug!(root = %root.display(), backend = ?self.backend, "subscribed");
        self.active = Some((watcher, root));
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<(), WatchError> {
        let Some((mut watcher, root)) = self.active.take() else {
            return Ok(());
        };
        watcher
            .unwatch(&root)
            .map_err(|source| WatchError::Unsubscribe { path: root, source })
    }
}

/// Build the `notify` callback: keep create/modify events for matching
/// files and forward their paths.
fn forward_events(
    filter: SourceFilter,
    events: UnboundedSender<ChangeEvent>,
) -> impl FnMut(notify::Result<notify::Event>) + Send + 'static {
    move |result| match result {
        Ok(event) => {
            if !is_change(&event.kind) {
                return;
            }
            for path in event.paths {
                if filter.matches(&path) && path.is_file() {
                    // The receiver is gone once the loop stopped; nothing to do.
                    let _ = events.send(ChangeEvent { path });
                }
            }
        }
        Err(e) => warn!(error = %e, "file watcher error"),
    }
}

fn is_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Scanning,
    Watching,
    HandlingEvent,
    Stopped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub events_handled: usize,
    pub events_failed: usize,
    pub keys_added: usize,
}

pub struct WatchLoop<S> {
    source: S,
    state: WatchState,
}

impl<S: ChangeSource> WatchLoop<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: WatchState::Idle,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The full scan (and optional prune) that precedes watching.
    pub fn initial_pass(&mut self, sync: &mut Synchronizer, prune: bool) -> PassReport {
        self.transition(WatchState::Scanning);
        sync.full_pass(prune)
    }

    /// Watch until `shutdown` resolves or the change source goes away.
    ///
    /// Each event is handled to completion before the next one is taken. A
    /// file that fails to scan is logged and counted; the loop keeps going.
    pub async fn run(
        &mut self,
        sync: &mut Synchronizer,
        shutdown: impl Future<Output = ()>,
    ) -> Result<WatchSummary, WatchError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.source.subscribe(sync.filter().clone(), tx)?;
        self.transition(WatchState::Watching);
        info!(
            root = %sync.filter().root().display(),
            "watching for changes, press Ctrl+C to stop"
        );

        let mut summary = WatchSummary::default();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                event = rx.recv() => {
                    let Some(event) = event else {
                        debug!("change source closed");
                        break;
                    };
                    self.transition(WatchState::HandlingEvent);
                    handle_event(sync, &event.path, &mut summary);
                    self.transition(WatchState::Watching);
                }
            }
        }

        let unsubscribed = self.source.unsubscribe();
        self.transition(WatchState::Stopped);
        unsubscribed?;
        info!(events = summary.events_handled, "stopped watching");
        Ok(summary)
    }

    fn transition(&mut self, next: WatchState) {
        debug!(from = ?self.state, to = ?next, "watch state");
        self.state = next;
    }
}

fn handle_event(sync: &mut Synchronizer, path: &Path, summary: &mut WatchSummary) {
    if !sync.watches(path) {
        debug!(path = %path.display(), "ignoring change");
        return;
    }
    match sync.scan_one(path) {
        Ok(outcome) => {
            summary.events_handled += 1;
            summary.keys_added += outcome.keys_added;
            if outcome.keys_added > 0 || outcome.catalogs_created > 0 {
                info!(
                    path = %path.display(),
                    keys_added = outcome.keys_added,
                    catalogs_created = outcome.catalogs_created,
                    "updated catalogs"
                );
            }
        }
        Err(e) => {
            summary.events_failed += 1;
            error!(path = %path.display(), error = %e, "failed to update catalogs");
        }
    }
}
