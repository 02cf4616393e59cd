//! Hand-off boundary to whatever displays lattice snapshots and final curves.
//!
//! The simulation never waits on a sink: snapshots go into a bounded queue
//! and are discarded when it is full or nobody is listening. Evicting the
//! oldest queued snapshot is not possible with `std::sync::mpsc`, hence the
//! shared `VecDeque`.

use crate::lattice::LatticeSnapshot;
use crate::observables::ObservableSeries;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Receives data produced by the scheduler. Implementations must not block.
pub trait VisualizationSink {
    fn snapshot(&mut self, snapshot: LatticeSnapshot);
    fn series(&mut self, series: &ObservableSeries);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl VisualizationSink for NullSink {
    fn snapshot(&mut self, _snapshot: LatticeSnapshot) {}
    fn series(&mut self, _series: &ObservableSeries) {}
}

/// What happens to a snapshot that arrives while the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    #[default]
    DropNewest,
    DropOldest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Snapshot(LatticeSnapshot),
    Series(ObservableSeries),
}

#[derive(Debug)]
struct Shared {
    queue: Mutex<VecDeque<SinkEvent>>,
    ready: Condvar,
    capacity: usize,
    dropped: AtomicUsize,
    sender_alive: AtomicBool,
    receiver_alive: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, VecDeque<SinkEvent>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Producer half of a bounded snapshot queue.
#[derive(Debug)]
pub struct ChannelSink {
    shared: Arc<Shared>,
    policy: DropPolicy,
}

/// Consumer half, usually moved to a viewer thread.
#[derive(Debug)]
pub struct SnapshotReceiver {
    shared: Arc<Shared>,
}

impl ChannelSink {
    /// Queue holding at most `capacity` snapshots (at least 1). The final
    /// series is always enqueued, on top of the snapshot capacity.
    pub fn bounded(capacity: usize, policy: DropPolicy) -> (Self, SnapshotReceiver) {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::with_capacity(capacity.max(1) + 1)),
            ready: Condvar::new(),
            capacity: capacity.max(1),
            dropped: AtomicUsize::new(0),
            sender_alive: AtomicBool::new(true),
            receiver_alive: AtomicBool::new(true),
        });
        (
            Self { shared: Arc::clone(&shared), policy },
            SnapshotReceiver { shared },
        )
    }

    /// Snapshots discarded so far.
    pub fn dropped(&self) -> usize {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    fn note_drop(&self) {
        if self.shared.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
            log::warn!("snapshot queue full or unattended, dropping snapshots");
        }
    }
}

impl VisualizationSink for ChannelSink {
    fn snapshot(&mut self, snapshot: LatticeSnapshot) {
        if !self.shared.receiver_alive.load(Ordering::Acquire) {
            self.note_drop();
            return;
        }
        let mut queue = self.shared.lock();
        let queued = queue
            .iter()
            .filter(|e| matches!(e, SinkEvent::Snapshot(_)))
            .count();
        if queued >= self.shared.capacity {
            match self.policy {
                DropPolicy::DropNewest => {
                    drop(queue);
                    self.note_drop();
                    return;
                }
                DropPolicy::DropOldest => {
                    if let Some(pos) = queue.iter().position(|e| matches!(e, SinkEvent::Snapshot(_))) {
                        queue.remove(pos);
                    }
                    self.note_drop();
                }
            }
        }
        queue.push_back(SinkEvent::Snapshot(snapshot));
        drop(queue);
        self.shared.ready.notify_one();
    }

    fn series(&mut self, series: &ObservableSeries) {
        if !self.shared.receiver_alive.load(Ordering::Acquire) {
            return;
        }
        self.shared.lock().push_back(SinkEvent::Series(series.clone()));
        self.shared.ready.notify_one();
    }
}

impl Drop for ChannelSink {
    fn drop(&mut self) {
        self.shared.sender_alive.store(false, Ordering::Release);
        // Take the lock so a receiver between its empty check and wait sees the flag.
        drop(self.shared.lock());
        self.shared.ready.notify_all();
    }
}

impl SnapshotReceiver {
    /// Block until an event arrives. `None` once the sink is gone and the
    /// queue is drained.
    pub fn recv(&self) -> Option<SinkEvent> {
        let mut queue = self.shared.lock();
        loop {
            if let Some(event) = queue.pop_front() {
                return Some(event);
            }
            if !self.shared.sender_alive.load(Ordering::Acquire) {
                return None;
            }
            queue = self
                .shared
                .ready
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn try_recv(&self) -> Option<SinkEvent> {
        self.shared.lock().pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = SinkEvent> + '_ {
        std::iter::from_fn(move || self.recv())
    }
}

impl Drop for SnapshotReceiver {
    fn drop(&mut self) {
        self.shared.receiver_alive.store(false, Ordering::Release);
        self.shared.lock().clear();
    }
}
