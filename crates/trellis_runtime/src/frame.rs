//! Per-frame driver
//!
//! One tick of the render loop:
//!
//! ```text
//! step momentum (may scroll, producing updates)
//!     ↓
//! flush shards → collect pending updates → deduplicate
//!     ↓
//! FrameSink::apply(frame, deltas)   (skipped when nothing changed)
//! ```
//!
//! The driver owns the dispatcher so that platform input and ticks run on the
//! same thread, in order.

use crate::dispatcher::EventDispatcher;
use crate::tree::Tree;
use crate::update::{deduplicate_updates, WidgetDelta};

/// Receives each frame's change set (the renderer boundary)
pub trait FrameSink {
    fn apply(&mut self, frame: u64, deltas: &[WidgetDelta]);
}

impl<F> FrameSink for F
where
    F: FnMut(u64, &[WidgetDelta]),
{
    fn apply(&mut self, frame: u64, deltas: &[WidgetDelta]) {
        self(frame, deltas)
    }
}

/// What a tick did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    /// Updates collected before deduplication
    pub raw_updates: usize,
    /// Deltas handed to the sink
    pub deltas: usize,
    /// Momentum still running after this tick
    pub momentum_active: bool,
}

/// Drives the tree and dispatcher once per frame
pub struct FrameDriver {
    tree: Tree,
    dispatcher: EventDispatcher,
}

impl FrameDriver {
    pub fn new(dispatcher: EventDispatcher) -> Self {
        Self {
            tree: dispatcher.tree().clone(),
            dispatcher,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Dispatcher for feeding platform input between ticks
    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    /// Run one frame
    pub fn tick(&mut self, sink: &mut dyn FrameSink) -> FrameStats {
        let momentum_active = self.dispatcher.step_momentum();

        self.tree.flush();
        let updates = self.tree.collect_updates();
        let frame = self.tree.frame();
        if updates.is_empty() {
            return FrameStats {
                frame,
                momentum_active,
                ..FrameStats::default()
            };
        }

        let deltas = deduplicate_updates(&updates);
        sink.apply(frame, &deltas);
        tracing::trace!(frame, raw = updates.len(), deltas = deltas.len(), "frame applied");

        FrameStats {
            frame,
            raw_updates: updates.len(),
            deltas: deltas.len(),
            momentum_active,
        }
    }
}

impl std::fmt::Debug for FrameDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("frame", &self.tree.frame())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
