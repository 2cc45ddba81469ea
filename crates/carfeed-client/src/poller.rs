//! Background polling of the listing source.
//!
//! [`FeedPoller`] owns the raw listing set and publishes [`FeedState`]
//! snapshots through a `watch` channel. A cycle runs on spawn, every poll
//! interval, and whenever the classification changes (which also restarts the
//! interval). Region, brand and detail selection are applied locally and never
//! trigger a fetch.
//!
//! Fetches are tagged with a sequence number when issued. A completion is
//! applied only if it is newer than everything applied so far, so a slow
//! scheduled poll can never overwrite the result of a later filter change.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use carfeed_core::{
    project, Classification, FacetCounts, FeedView, FilterState, Listing, ListingDetail,
    ListingId, ListingsPage,
};
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::fallback::{load_listings, FallbackPolicy, FeedOrigin, Resolved};
use crate::source::ListingSource;

const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No cycle has been issued yet.
    Idle,
    /// The most recently issued cycle has not completed.
    Loading,
    Ready,
}

/// Snapshot of everything the feed display needs.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub phase: Phase,
    /// Raw listing set from the last applied cycle, unfiltered.
    pub listings: Vec<Listing>,
    pub origin: Option<FeedOrigin>,
    pub filter: FilterState,
    pub selected: Option<ListingId>,
    /// Sequence number of the cycle whose result is in `listings`; 0 before
    /// the first completion.
    pub applied_seq: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl FeedState {
    fn new(filter: FilterState) -> Self {
        Self {
            phase: Phase::Idle,
            listings: Vec::new(),
            origin: None,
            filter,
            selected: None,
            applied_seq: 0,
            last_updated: None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Render state for the current listings and filter.
    #[must_use]
    pub fn view(&self) -> FeedView<'_> {
        project(self.is_loading(), &self.listings, &self.filter)
    }

    /// Facet counts over the raw listing set.
    #[must_use]
    pub fn facets<S: AsRef<str>>(&self, candidate_brands: &[S]) -> FacetCounts {
        FacetCounts::compute(&self.listings, candidate_brands)
    }

    /// Detail of the selected listing, if it is still in the raw set.
    #[must_use]
    pub fn detail(&self) -> Option<ListingDetail> {
        self.selected
            .as_ref()
            .and_then(|id| ListingDetail::open(&self.listings, id))
    }
}

struct Shared<S> {
    source: S,
    policy: FallbackPolicy,
    state: watch::Sender<FeedState>,
    issued: AtomicU64,
    stale: AtomicU64,
    active: AtomicBool,
}

/// Handle to a running poll loop.
///
/// Dropping the handle stops the loop; [`FeedPoller::shutdown`] does the same
/// and waits for the loop task to exit.
pub struct FeedPoller<S: ListingSource + 'static> {
    shared: Arc<Shared<S>>,
    refetch: Arc<Notify>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<S: ListingSource + 'static> FeedPoller<S> {
    /// Starts polling `source`. The first cycle is issued immediately.
    ///
    /// Must be called from within a Tokio runtime. Intervals below one second
    /// are raised to one second.
    pub fn spawn(
        source: S,
        policy: FallbackPolicy,
        interval: Duration,
        initial_filter: FilterState,
    ) -> Self {
        let (state, _) = watch::channel(FeedState::new(initial_filter));
        let shared = Arc::new(Shared {
            source,
            policy,
            state,
            issued: AtomicU64::new(0),
            stale: AtomicU64::new(0),
            active: AtomicBool::new(true),
        });
        let refetch = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_loop(
            Arc::clone(&shared),
            Arc::clone(&refetch),
            cancel.clone(),
            interval.max(MIN_POLL_INTERVAL),
        ));

        Self {
            shared,
            refetch,
            cancel,
            task: Some(task),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.shared.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> FeedState {
        self.shared.state.borrow().clone()
    }

    /// Number of completions discarded because a newer one had already been
    /// applied.
    #[must_use]
    pub fn stale_discards(&self) -> u64 {
        self.shared.stale.load(Ordering::Relaxed)
    }

    /// Changes the classification and re-fetches when it actually changed.
    pub fn set_classification(&self, classification: Option<Classification>) {
        let changed = self.shared.state.send_if_modified(|state| {
            if state.filter.classification == classification {
                return false;
            }
            state.filter.classification = classification;
            true
        });
        if changed {
            self.refetch.notify_one();
        }
    }

    pub fn set_region(&self, region: Option<String>) {
        self.update_local(|state| {
            if state.filter.region == region {
                return false;
            }
            state.filter.region = region;
            true
        });
    }

    pub fn set_brand(&self, brand: Option<String>) {
        self.update_local(|state| {
            if state.filter.brand == brand {
                return false;
            }
            state.filter.brand = brand;
            true
        });
    }

    pub fn toggle_brand(&self, brand: &str) {
        self.update_local(|state| {
            state.filter.toggle_brand(brand);
            true
        });
    }

    pub fn toggle_region(&self, region: &str) {
        self.update_local(|state| {
            state.filter.toggle_region(region);
            true
        });
    }

    /// Clears every filter dimension. Re-fetches only if a classification was
    /// active.
    pub fn reset_filters(&self) {
        let mut refetch = false;
        self.update_local(|state| {
            if state.filter.is_unfiltered() {
                return false;
            }
            refetch = state.filter.classification.is_some();
            state.filter.reset();
            true
        });
        if refetch {
            self.refetch.notify_one();
        }
    }

    /// Selects `id` for the detail view. Returns `None` and leaves the
    /// selection unchanged when `id` is not in the raw set.
    pub fn open_detail(&self, id: &ListingId) -> Option<ListingDetail> {
        let mut detail = None;
        self.update_local(|state| {
            detail = ListingDetail::open(&state.listings, id);
            if detail.is_none() {
                return false;
            }
            state.selected = Some(id.clone());
            true
        });
        detail
    }

    pub fn close_detail(&self) {
        self.update_local(|state| state.selected.take().is_some());
    }

    /// Issues a cycle now and restarts the interval.
    pub fn refresh(&self) {
        self.refetch.notify_one();
    }

    /// Stops the loop and waits for it to exit. Fetches still in flight are
    /// not aborted, but their results are never applied.
    pub async fn shutdown(mut self) {
        self.deactivate();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "poller: loop task failed");
            }
        }
    }

    fn update_local(&self, modify: impl FnOnce(&mut FeedState) -> bool) {
        self.shared.state.send_if_modified(modify);
    }

    fn deactivate(&self) {
        self.cancel.cancel();
        // Flip the flag under the state lock so an apply already holding it
        // finishes first and every later one sees the poller as inactive.
        let active = &self.shared.active;
        self.shared.state.send_if_modified(|_| {
            active.store(false, Ordering::Release);
            false
        });
    }
}

impl<S: ListingSource + 'static> Drop for FeedPoller<S> {
    fn drop(&mut self) {
        self.deactivate();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_loop<S: ListingSource + 'static>(
    shared: Arc<Shared<S>>,
    refetch: Arc<Notify>,
    cancel: CancellationToken,
    period: Duration,
) {
    tracing::info!(interval_secs = period.as_secs(), policy = ?shared.policy, "poller: started");

    // The first tick completes immediately, giving the initial cycle.
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
            () = refetch.notified() => ticker.reset(),
        }
        begin_cycle(&shared);
    }

    tracing::info!("poller: stopped");
}

/// Issues the next sequence number, marks the state loading, and spawns the
/// fetch. The fetch task is detached; shutdown never waits for it.
fn begin_cycle<S: ListingSource + 'static>(shared: &Arc<Shared<S>>) {
    let mut issued = None;
    shared.state.send_if_modified(|state| {
        if !shared.active.load(Ordering::Acquire) {
            return false;
        }
        let seq = shared.issued.fetch_add(1, Ordering::AcqRel) + 1;
        state.phase = Phase::Loading;
        issued = Some((seq, state.filter.remote_verdict()));
        true
    });
    let Some((seq, verdict)) = issued else {
        return;
    };

    tracing::debug!(seq, verdict = ?verdict, "poller: cycle issued");
    let shared = Arc::clone(shared);
    tokio::spawn(async move {
        let resolved = load_listings(&shared.source, shared.policy, verdict.as_ref()).await;
        complete_cycle(&shared, seq, resolved);
    });
}

fn complete_cycle<S>(shared: &Shared<S>, seq: u64, resolved: Resolved<ListingsPage>) {
    shared.state.send_if_modified(|state| {
        if !shared.active.load(Ordering::Acquire) {
            return false;
        }
        if seq <= state.applied_seq {
            shared.stale.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                seq,
                applied = state.applied_seq,
                "poller: discarding stale completion"
            );
            return false;
        }
        state.listings = resolved.data.deals;
        state.origin = Some(resolved.origin);
        state.applied_seq = seq;
        state.last_updated = Some(Utc::now());
        if seq == shared.issued.load(Ordering::Acquire) {
            state.phase = Phase::Ready;
        }
        tracing::debug!(
            seq,
            count = state.listings.len(),
            origin = ?resolved.origin,
            "poller: cycle applied"
        );
        true
    });
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
