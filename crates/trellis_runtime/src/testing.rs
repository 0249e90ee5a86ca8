//! Shared test fixtures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use trellis_core::{Bounds, Clock, EventType, NativeResource, SoftKeyboard};

use crate::config::{DispatcherConfig, TreeConfig};
use crate::dispatcher::EventDispatcher;
use crate::scroll::ScrollAxis;
use crate::tree::Tree;
use crate::widget::{Widget, WidgetId};

/// Install a subscriber honouring `RUST_LOG`; later calls are no-ops
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Tree with two small shards, so tests exercise cross-shard collection
pub(crate) fn small_tree() -> Tree {
    Tree::with_config(TreeConfig {
        shard_count: 2,
        shard_buffer: 64,
    })
}

/// Native resource that counts releases
pub(crate) struct CountingResource(pub Arc<AtomicUsize>);

impl NativeResource for CountingResource {
    fn release(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Clock that only moves when told to
#[derive(Clone)]
pub(crate) struct ManualClock(Arc<Mutex<Instant>>);

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(Instant::now())))
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.0.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.0.lock()
    }
}

/// Software keyboard that records show/hide calls
#[derive(Clone, Default)]
pub(crate) struct RecordingKeyboard(Arc<Mutex<Vec<&'static str>>>);

impl RecordingKeyboard {
    pub(crate) fn log(&self) -> Vec<&'static str> {
        self.0.lock().clone()
    }
}

impl SoftKeyboard for RecordingKeyboard {
    fn show(&self) {
        self.0.lock().push("show");
    }

    fn hide(&self) {
        self.0.lock().push("hide");
    }
}

/// Records (watched widget, event type) pairs in delivery order
#[derive(Clone, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<(WidgetId, EventType)>>>);

impl EventLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `types` whenever they reach `widget` in the target or bubble
    /// phase
    pub(crate) fn watch(&self, widget: &Widget, types: &[EventType]) {
        let id = widget.id();
        for &event_type in types {
            let log = Arc::clone(&self.0);
            widget.on(event_type, move |ctx| log.lock().push((id, ctx.event_type)));
        }
    }

    pub(crate) fn take(&self) -> Vec<(WidgetId, EventType)> {
        std::mem::take(&mut *self.0.lock())
    }
}

/// Vertical scroll container at (0, 0, 100, 200) holding `items` stacked rows
pub(crate) fn scroll_list(items: usize, item_height: f32) -> (Widget, Vec<Widget>) {
    let scroll =
        Widget::scroll(ScrollAxis::Vertical).with_bounds(Bounds::new(0.0, 0.0, 100.0, 200.0));
    let rows: Vec<Widget> = (0..items)
        .map(|i| {
            let y = i as f32 * item_height;
            Widget::text(format!("row {i}")).with_bounds(Bounds::new(0.0, y, 100.0, item_height))
        })
        .collect();
    for row in &rows {
        scroll.add_child(row).unwrap();
    }
    (scroll, rows)
}

/// A mounted 800x600 root with a dispatcher on a manual clock
pub(crate) struct Fixture {
    pub tree: Tree,
    pub root: Widget,
    pub dispatcher: EventDispatcher,
    pub clock: ManualClock,
    pub keyboard: RecordingKeyboard,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::with_soft_keyboard(true)
    }

    pub(crate) fn with_soft_keyboard(soft_keyboard: bool) -> Self {
        init_tracing();
        let tree = small_tree();
        let root = Widget::container().with_bounds(Bounds::new(0.0, 0.0, 800.0, 600.0));
        tree.set_root(&root).unwrap();

        let clock = ManualClock::new();
        let keyboard = RecordingKeyboard::default();
        let config = DispatcherConfig {
            soft_keyboard,
            ..DispatcherConfig::default()
        };
        let dispatcher = EventDispatcher::with_config(&tree, config)
            .with_clock(clock.clone())
            .with_keyboard(keyboard.clone());
        Self {
            tree,
            root,
            dispatcher,
            clock,
            keyboard,
        }
    }

    /// Add a container under the root
    pub(crate) fn child(&self, bounds: Bounds) -> Widget {
        let widget = Widget::container().with_bounds(bounds);
        self.root.add_child(&widget).unwrap();
        widget
    }

    /// Add a [`scroll_list`] under the root
    pub(crate) fn scroll_list(&self, items: usize, item_height: f32) -> (Widget, Vec<Widget>) {
        let (scroll, rows) = scroll_list(items, item_height);
        self.root.add_child(&scroll).unwrap();
        (scroll, rows)
    }

    pub(crate) fn close(&self) {
        self.tree.close();
    }
}
