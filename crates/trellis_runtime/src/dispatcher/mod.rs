//! Event dispatch from platform input to widgets
//!
//! Turns raw pointer, wheel and keyboard input into widget events and
//! interaction state.
//!
//! # Architecture
//!
//! ```text
//! Platform input (x, y, button, key, modifiers)
//!     ↓
//! EventDispatcher (hit testing, hover/press/focus tracking, gestures)
//!     ↓ propagate(chain, ctx): capture → target → bubble
//! Widget handlers
//!     ↓ set_* / interaction flags
//! Tree update pipeline
//! ```
//!
//! The dispatcher owns all transient interaction state: the hover chain,
//! focus, the current press, click counting and momentum. It is driven from
//! one thread (the platform event loop), which is also the thread that
//! calls [`EventDispatcher::step_momentum`] once per frame.
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{Bounds, MouseButton};
//! use trellis_runtime::{EventDispatcher, Tree, Widget};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let tree = Tree::new();
//! let root = Widget::container().with_bounds(Bounds::new(0.0, 0.0, 400.0, 300.0));
//! let button = Widget::button("OK").with_bounds(Bounds::new(10.0, 10.0, 80.0, 30.0));
//! root.add_child(&button).unwrap();
//! tree.set_root(&root).unwrap();
//!
//! let clicks = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&clicks);
//! button.on_click(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let mut dispatcher = EventDispatcher::new(&tree);
//! dispatcher.dispatch_mouse_down(20.0, 20.0, MouseButton::Left);
//! dispatcher.dispatch_mouse_up(20.0, 20.0, MouseButton::Left);
//! assert_eq!(clicks.load(Ordering::SeqCst), 1);
//! tree.close();
//! ```

mod focus;
mod gesture;
mod hit_test;
mod momentum;
mod pointer;
mod wheel;

use std::sync::Arc;

use trellis_core::{Clock, NoopKeyboard, Point, SoftKeyboard, SystemClock};

use crate::config::DispatcherConfig;
use crate::tree::Tree;
use crate::widget::Widget;

use gesture::{ClickTracker, Press};
use momentum::Momentum;

pub use hit_test::HitResult;

/// Routes platform input to widgets
///
/// Maintains state for:
/// - Current pointer position
/// - The hovered root → target chain (for enter/leave detection)
/// - The pressed chain and button (for click and drag classification)
/// - Multi-click timing
/// - Momentum scrolling
/// - The focused widget (receives keyboard events)
pub struct EventDispatcher {
    tree: Tree,
    config: DispatcherConfig,
    keyboard: Arc<dyn SoftKeyboard>,
    clock: Arc<dyn Clock>,

    mouse: Point,
    hover_chain: Vec<Widget>,
    focused: Option<Widget>,
    press: Option<Press>,
    clicks: ClickTracker,
    momentum: Momentum,
}

impl EventDispatcher {
    pub fn new(tree: &Tree) -> Self {
        Self::with_config(tree, DispatcherConfig::default())
    }

    pub fn with_config(tree: &Tree, config: DispatcherConfig) -> Self {
        Self {
            tree: tree.clone(),
            config,
            keyboard: Arc::new(NoopKeyboard),
            clock: Arc::new(SystemClock),
            mouse: Point::ZERO,
            hover_chain: Vec::new(),
            focused: None,
            press: None,
            clicks: ClickTracker::default(),
            momentum: Momentum::default(),
        }
    }

    /// Software keyboard shown and hidden as focus enters and leaves text
    /// inputs
    pub fn with_keyboard(mut self, keyboard: impl SoftKeyboard + 'static) -> Self {
        self.keyboard = Arc::new(keyboard);
        self
    }

    /// Time source for click and gesture timing
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    /// Last pointer position seen by any pointer entry point
    pub fn mouse_position(&self) -> Point {
        self.mouse
    }

    /// Innermost hovered widget
    pub fn hovered(&self) -> Option<&Widget> {
        self.hover_chain.last()
    }

    /// Hovered root → target chain
    pub fn hover_chain(&self) -> &[Widget] {
        &self.hover_chain
    }

    /// Widget the current press started on
    pub fn pressed(&self) -> Option<&Widget> {
        self.press.as_ref().map(|p| &p.target)
    }

    pub fn is_dragging(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.dragging)
    }

    // =========================================================================
    // Momentum
    // =========================================================================

    /// Advance momentum scrolling by one frame; returns whether it is still
    /// running
    pub fn step_momentum(&mut self) -> bool {
        let now = self.clock.now();
        self.momentum.step(now, &self.config)
    }

    pub fn is_momentum_active(&self) -> bool {
        self.momentum.is_active()
    }

    /// Widget momentum is scrolling, if active
    pub fn momentum_target(&self) -> Option<&Widget> {
        self.momentum.target()
    }

    pub fn cancel_momentum(&mut self) {
        self.momentum.cancel();
    }

    // =========================================================================
    // Housekeeping
    // =========================================================================

    /// Drop references to widgets detached since the last dispatch
    fn prune(&mut self) {
        let tree = &self.tree;

        if let Some(cut) = self.hover_chain.iter().position(|w| !w.is_attached_to(tree)) {
            for widget in self.hover_chain.drain(cut..) {
                widget.set_hovered(false);
            }
        }

        let press_stale = self
            .press
            .as_ref()
            .is_some_and(|p| !p.target.is_attached_to(tree));
        if press_stale {
            if let Some(press) = self.press.take() {
                for widget in &press.chain {
                    widget.set_pressed(false);
                }
            }
        }

        if self
            .momentum
            .target()
            .is_some_and(|w| !w.is_attached_to(tree))
        {
            self.momentum.cancel();
        }

        if let Some(focused) = self.focused.clone() {
            if !focused.is_attached_to(tree) {
                tracing::debug!(id = %focused.id(), "focused widget detached");
                self.set_focus(None);
            }
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("mouse", &self.mouse)
            .field("hovered", &self.hovered().map(Widget::id))
            .field("focused", &self.focused.as_ref().map(Widget::id))
            .field("pressed", &self.pressed().map(Widget::id))
            .field("dragging", &self.is_dragging())
            .field("momentum", &self.momentum.is_active())
            .finish()
    }
}
