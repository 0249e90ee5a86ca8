//! Event handler storage and propagation
//!
//! Handlers are stored per widget, keyed by event type, in two lists: capture
//! handlers run while the event travels root → target, bubble handlers while
//! it travels back target → root. Both run at the target itself.
//!
//! # Architecture
//!
//! ```text
//! Widget
//!     ↓ .on_click(|ctx| ...)
//! EventHandlers (stored on the widget)
//!     ↓ EventDispatcher hit-tests and builds the root → target chain
//! propagate(chain, ctx)
//!     ↓ capture → target → bubble, halting on stop_propagation
//! Handler callback invoked
//! ```
//!
//! # Example
//!
//! ```rust
//! use trellis_runtime::{event_types, propagate, EventContext, Widget};
//!
//! let parent = Widget::container();
//! let child = Widget::button("OK");
//! parent.add_child(&child).unwrap();
//!
//! parent.on(event_types::CLICK, |_| panic!("stopped at the target"));
//! child.on_click(|ctx| ctx.stop_propagation());
//!
//! let mut ctx = EventContext::new(event_types::CLICK);
//! propagate(&[parent, child], &mut ctx);
//! assert!(ctx.is_propagation_stopped());
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use trellis_core::{EventType, Key, Modifiers, MouseButton, Phase, Point};

use crate::widget::{Widget, WidgetId};

/// Callback for handling events
///
/// Handlers run on the dispatch thread and may freely mutate the tree,
/// including the widget they are registered on.
pub type EventCallback = Arc<dyn Fn(&mut EventContext) + Send + Sync>;

/// Context passed to event handlers
#[derive(Clone, Debug)]
pub struct EventContext {
    /// The type of event that occurred
    pub event_type: EventType,
    /// Current propagation phase
    pub phase: Phase,
    /// Pointer position in window coordinates (if applicable)
    pub position: Point,
    /// Pointer position relative to the current widget's bounds
    pub local: Point,
    /// Button for pointer events
    pub button: Option<MouseButton>,
    /// 1 for a click, 2 for a double click, 3 for a triple click
    pub click_count: u32,
    /// Wheel delta for WHEEL, applied offset change for SCROLL
    pub delta: Point,
    /// Key for KEY_DOWN / KEY_UP
    pub key: Option<Key>,
    /// Character for TEXT_INPUT
    pub ch: Option<char>,
    pub modifiers: Modifiers,
    target: Option<Widget>,
    current: Option<Widget>,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl EventContext {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            phase: Phase::Target,
            position: Point::ZERO,
            local: Point::ZERO,
            button: None,
            click_count: 0,
            delta: Point::ZERO,
            key: None,
            ch: None,
            modifiers: Modifiers::NONE,
            target: None,
            current: None,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Set pointer position
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_click_count(mut self, count: u32) -> Self {
        self.click_count = count;
        self
    }

    /// Set wheel or scroll delta
    pub fn with_delta(mut self, dx: f32, dy: f32) -> Self {
        self.delta = Point::new(dx, dy);
        self
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_char(mut self, ch: char) -> Self {
        self.ch = Some(ch);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The widget the event was dispatched to
    pub fn target(&self) -> Option<&Widget> {
        self.target.as_ref()
    }

    pub fn target_id(&self) -> Option<WidgetId> {
        self.target.as_ref().map(Widget::id)
    }

    /// The widget whose handler is running
    pub fn current(&self) -> Option<&Widget> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<WidgetId> {
        self.current.as_ref().map(Widget::id)
    }

    /// Stop the event from reaching further widgets
    ///
    /// Remaining handlers on the current widget still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Mark the event handled; suppresses the dispatcher's default action
    /// (wheel scrolling, focus traversal, text editing)
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    fn enter(&mut self, widget: &Widget, phase: Phase) {
        self.phase = phase;
        self.local = widget.bounds().local(self.position);
        self.current = Some(widget.clone());
    }
}

/// Storage for event handlers on a widget
#[derive(Default, Clone)]
pub struct EventHandlers {
    capture: FxHashMap<EventType, SmallVec<[EventCallback; 2]>>,
    bubble: FxHashMap<EventType, SmallVec<[EventCallback; 2]>>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.capture.is_empty() && self.bubble.is_empty()
    }

    pub fn has_handler(&self, event_type: EventType) -> bool {
        self.capture.contains_key(&event_type) || self.bubble.contains_key(&event_type)
    }

    /// Register a target/bubble phase handler
    pub fn on<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.bubble
            .entry(event_type)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Register a capture/target phase handler
    pub fn on_capture<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.capture
            .entry(event_type)
            .or_default()
            .push(Arc::new(handler));
    }

    pub fn capture_handlers(&self, event_type: EventType) -> SmallVec<[EventCallback; 2]> {
        self.capture.get(&event_type).cloned().unwrap_or_default()
    }

    pub fn bubble_handlers(&self, event_type: EventType) -> SmallVec<[EventCallback; 2]> {
        self.bubble.get(&event_type).cloned().unwrap_or_default()
    }

    pub fn event_types(&self) -> impl Iterator<Item = EventType> + '_ {
        self.capture.keys().chain(self.bubble.keys()).copied()
    }
}

fn run(handlers: SmallVec<[EventCallback; 2]>, ctx: &mut EventContext) {
    for handler in handlers {
        handler(ctx);
    }
}

/// Propagate an event along a root → target chain
///
/// Capture handlers run on each ancestor from the root down, then capture
/// and bubble handlers on the target, then bubble handlers on each ancestor
/// back up to the root. A handler calling
/// [`EventContext::stop_propagation`] ends the walk after the current widget.
pub fn propagate(chain: &[Widget], ctx: &mut EventContext) {
    let Some((target, ancestors)) = chain.split_last() else {
        return;
    };
    ctx.target = Some(target.clone());

    for widget in ancestors {
        ctx.enter(widget, Phase::Capture);
        run(widget.capture_handlers(ctx.event_type), ctx);
        if ctx.propagation_stopped {
            return;
        }
    }

    ctx.enter(target, Phase::Target);
    run(target.capture_handlers(ctx.event_type), ctx);
    run(target.bubble_handlers(ctx.event_type), ctx);
    if ctx.propagation_stopped {
        return;
    }

    for widget in ancestors.iter().rev() {
        ctx.enter(widget, Phase::Bubble);
        run(widget.bubble_handlers(ctx.event_type), ctx);
        if ctx.propagation_stopped {
            return;
        }
    }
}

/// Deliver an event to one widget only (enter/leave, focus/blur, scroll,
/// mount/unmount)
pub fn dispatch_to(widget: &Widget, ctx: &mut EventContext) {
    propagate(std::slice::from_ref(widget), ctx);
}
