//! Change feed and live subscriptions.
//!
//! Every mutation publishes a [`ChangeEvent`] on a `tokio::sync::broadcast`
//! channel. A subscription is a spawned task that re-runs its query after
//! each relevant event and hands the full result set to a callback. There is
//! no diffing: each delivery replaces the previous snapshot.
//!
//! Release is owner-driven. The callback slot sits behind a mutex that is
//! held for the duration of each delivery, and [`Subscription::unsubscribe`]
//! (or drop) clears it under the same mutex before aborting the task. Once
//! release returns, the callback is never invoked again.

use std::sync::{Arc, Mutex, PoisonError};

use futures::Stream;
use futures::future::BoxFuture;
use seva_core::enums::{AuditAction, EntityType};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::error::DatabaseError;

/// Buffered events per receiver before it lags.
pub const FEED_CAPACITY: usize = 256;

/// One committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: AuditAction,
}

/// Broadcast side of the change feed. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Snapshot query re-run by a subscription task.
pub(crate) type SnapshotQuery<T> =
    Box<dyn FnMut() -> BoxFuture<'static, Result<Vec<T>, DatabaseError>> + Send>;

/// Handle to a live subscription.
///
/// Dropping the handle releases it, as does [`Subscription::unsubscribe`].
/// Do not release a subscription from inside its own callback.
pub struct Subscription {
    active: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Spawn the task: deliver once now, then after every change to
    /// `entity_type`.
    pub(crate) fn spawn<T, F>(
        feed: &ChangeFeed,
        entity_type: EntityType,
        mut query: SnapshotQuery<T>,
        mut deliver: F,
    ) -> Self
    where
        T: Send + 'static,
        F: FnMut(Result<Vec<T>, DatabaseError>) + Send + 'static,
    {
        // Subscribe before the first query so no change slips between them.
        let mut rx = feed.subscribe();
        let active = Arc::new(Mutex::new(true));
        let slot = Arc::clone(&active);

        let task = tokio::spawn(async move {
            loop {
                let snapshot = query().await;
                {
                    let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
                    if !*guard {
                        return;
                    }
                    deliver(snapshot);
                }
                if !wait_for_change(&mut rx, entity_type).await {
                    return;
                }
            }
        });

        Self {
            active,
            task: Some(task),
        }
    }

    /// Stop deliveries. Blocks while a delivery is in progress.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = false;
        task.abort();
        tracing::debug!("subscription released");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Wait for an event about `entity_type`, then drain whatever queued up
/// behind it so a burst costs one re-query. Returns `false` once the feed
/// is closed.
async fn wait_for_change(
    rx: &mut broadcast::Receiver<ChangeEvent>,
    entity_type: EntityType,
) -> bool {
    loop {
        match rx.recv().await {
            Ok(event) if event.entity_type == entity_type => break,
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, %entity_type, "change feed lagged, re-querying");
                break;
            }
            Err(RecvError::Closed) => return false,
        }
    }
    loop {
        match rx.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Closed) => return false,
        }
    }
}

/// Observable state of a [`LiveQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveState<T> {
    pub items: Vec<T>,
    /// `true` until the first snapshot (or error) arrives.
    pub loading: bool,
    /// Message from the most recent failed re-query, cleared on success.
    pub error: Option<String>,
}

impl<T> Default for LiveState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

/// A subscription whose latest snapshot lives in a `watch` channel.
///
/// Failed re-queries keep the previous items and set `error`.
pub struct LiveQuery<T> {
    rx: watch::Receiver<LiveState<T>>,
    _subscription: Subscription,
}

impl<T> LiveQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn spawn(feed: &ChangeFeed, entity_type: EntityType, query: SnapshotQuery<T>) -> Self {
        let (tx, rx) = watch::channel(LiveState::default());
        let subscription = Subscription::spawn(feed, entity_type, query, move |result| {
            tx.send_modify(|state| {
                state.loading = false;
                match result {
                    Ok(items) => {
                        state.items = items;
                        state.error = None;
                    }
                    Err(error) => {
                        tracing::warn!(%error, %entity_type, "live query refresh failed");
                        state.error = Some(error.to_string());
                    }
                }
            });
        });
        Self {
            rx,
            _subscription: subscription,
        }
    }

    /// Latest state.
    #[must_use]
    pub fn current(&self) -> LiveState<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next delivery. Returns `false` if the query stopped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Current state first, then one item per delivery. The subscription
    /// lives as long as the stream.
    pub fn into_stream(self) -> impl Stream<Item = LiveState<T>> + Send {
        futures::stream::unfold((self, true), |(mut live, first)| async move {
            if !first && !live.changed().await {
                return None;
            }
            let state = live.rx.borrow_and_update().clone();
            Some((state, (live, false)))
        })
    }
}
