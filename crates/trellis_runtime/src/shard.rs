//! Sharded update fan-in
//!
//! Writers on any thread hand updates to one of N bounded channels, chosen by
//! hashing the widget id. One consumer thread per shard drains its channel
//! into the shared [`PendingBuffer`]. A widget always maps to the same shard,
//! so its updates stay in order through the channel.
//!
//! A full shard never blocks or drops: the writer appends straight to the
//! pending buffer under its mutex instead.

use std::hash::Hasher;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHasher;

use crate::update::Update;
use crate::widget::WidgetId;

/// Updates waiting for the next frame
#[derive(Default)]
pub(crate) struct PendingBuffer {
    buf: Mutex<Vec<Update>>,
    has_pending: AtomicBool,
    /// Updates sent to a shard but not yet appended
    in_flight: AtomicUsize,
}

impl PendingBuffer {
    pub(crate) fn mark_pending(&self) {
        self.has_pending.store(true, Ordering::Release);
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.has_pending.load(Ordering::Acquire)
    }

    pub(crate) fn push(&self, update: Update) {
        self.buf.lock().push(update);
        self.mark_pending();
    }

    fn append(&self, mut batch: Vec<Update>) {
        self.buf.lock().append(&mut batch);
        self.mark_pending();
    }

    /// Swap the buffer out, keeping its capacity for the next frame
    pub(crate) fn take(&self) -> Vec<Update> {
        self.has_pending.store(false, Ordering::Release);
        let mut buf = self.buf.lock();
        let capacity = buf.len();
        std::mem::replace(&mut *buf, Vec::with_capacity(capacity))
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Shard index for a widget id
pub(crate) fn shard_index(id: WidgetId, mask: usize) -> usize {
    let mut hasher = FxHasher::default();
    hasher.write(&id.as_bytes());
    (hasher.finish() as usize) & mask
}

/// Fixed set of bounded channels, each drained by its own thread
pub(crate) struct ShardPool {
    /// `None` once closed; a `None` entry is a shard whose consumer failed to
    /// start and always takes the direct path
    senders: RwLock<Option<Vec<Option<SyncSender<Update>>>>>,
    consumers: Mutex<Vec<JoinHandle<()>>>,
    mask: usize,
    pending: Arc<PendingBuffer>,
}

impl ShardPool {
    pub(crate) fn new(count: usize, buffer: usize, pending: Arc<PendingBuffer>) -> Self {
        let count = count.max(1).next_power_of_two();
        let mut senders = Vec::with_capacity(count);
        let mut consumers = Vec::with_capacity(count);

        for index in 0..count {
            let (tx, rx) = mpsc::sync_channel(buffer.max(1));
            let shard_pending = Arc::clone(&pending);
            let spawned = thread::Builder::new()
                .name(format!("trellis-shard-{index}"))
                .spawn(move || consume(rx, shard_pending));
            match spawned {
                Ok(handle) => {
                    senders.push(Some(tx));
                    consumers.push(handle);
                }
                Err(err) => {
                    tracing::warn!(index, %err, "shard consumer failed to start, using direct appends");
                    senders.push(None);
                }
            }
        }

        tracing::debug!(shards = count, buffer, "shard pool started");
        Self {
            senders: RwLock::new(Some(senders)),
            consumers: Mutex::new(consumers),
            mask: count - 1,
            pending,
        }
    }

    pub(crate) fn shard_count(&self) -> usize {
        self.mask + 1
    }

    pub(crate) fn shard_for(&self, id: WidgetId) -> usize {
        shard_index(id, self.mask)
    }

    /// Route an update to its shard, falling back to a direct append when
    /// the shard is full. Dropped silently once closed.
    pub(crate) fn send(&self, update: Update) {
        let index = self.shard_for(update.id);
        let senders = self.senders.read();
        let Some(shards) = senders.as_ref() else {
            return;
        };

        let update = match shards.get(index).and_then(Option::as_ref) {
            Some(tx) => {
                self.pending.in_flight.fetch_add(1, Ordering::AcqRel);
                match tx.try_send(update) {
                    Ok(()) => return,
                    Err(TrySendError::Full(update)) | Err(TrySendError::Disconnected(update)) => {
                        self.pending.in_flight.fetch_sub(1, Ordering::AcqRel);
                        tracing::trace!(shard = index, id = %update.id, "shard full, appending directly");
                        update
                    }
                }
            }
            None => update,
        };
        drop(senders);
        self.pending.push(update);
    }

    /// Block until every update sent so far has reached the pending buffer
    pub(crate) fn flush(&self) {
        while self.pending.in_flight() > 0 {
            thread::yield_now();
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.senders.read().is_none()
    }

    /// Disconnect every shard and join the consumers
    ///
    /// Consumers drain whatever is still queued before exiting.
    pub(crate) fn close(&self) {
        let senders = self.senders.write().take();
        if senders.is_none() {
            return;
        }
        drop(senders);

        let current = thread::current().id();
        let consumers = std::mem::take(&mut *self.consumers.lock());
        for handle in consumers {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                tracing::warn!("shard consumer panicked");
            }
        }
        tracing::debug!("shard pool closed");
    }
}

impl Drop for ShardPool {
    fn drop(&mut self) {
        self.close();
    }
}

fn consume(rx: Receiver<Update>, pending: Arc<PendingBuffer>) {
    while let Ok(first) = rx.recv() {
        let mut batch = vec![first];
        batch.extend(rx.try_iter());
        let count = batch.len();
        pending.append(batch);
        pending.in_flight.fetch_sub(count, Ordering::AcqRel);
    }
}
