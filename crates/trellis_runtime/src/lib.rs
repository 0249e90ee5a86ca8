//! Trellis Runtime
//!
//! Retained-mode widget tree with a concurrent update pipeline and an event
//! dispatcher.
//!
//! - **Tree**: owns the root widget, an id registry and the shard pool that
//!   funnels property changes from any thread into one pending buffer
//! - **Updates**: collected once per frame and folded into one
//!   [`WidgetDelta`] per changed widget for the renderer
//! - **EventDispatcher**: hit testing, capture → target → bubble
//!   propagation, hover, click / drag / momentum gestures, wheel scrolling
//!   and keyboard focus
//!
//! # Example
//!
//! ```rust
//! use trellis_runtime::prelude::*;
//!
//! let tree = Tree::new();
//! let root = Widget::container().with_bounds(Bounds::new(0.0, 0.0, 320.0, 240.0));
//! let label = Widget::text("Count: 0").with_bounds(Bounds::new(10.0, 10.0, 200.0, 20.0));
//! let button = Widget::button("+").with_bounds(Bounds::new(10.0, 40.0, 40.0, 30.0));
//! root.add_child(&label).unwrap();
//! root.add_child(&button).unwrap();
//! tree.set_root(&root).unwrap();
//!
//! let shown = label.clone();
//! button.on_click(move |_| shown.set_text("Count: 1"));
//!
//! let mut driver = FrameDriver::new(EventDispatcher::new(&tree));
//! driver.tick(&mut |_frame: u64, _deltas: &[WidgetDelta]| {});
//!
//! driver.dispatcher_mut().dispatch_mouse_down(20.0, 50.0, MouseButton::Left);
//! driver.dispatcher_mut().dispatch_mouse_up(20.0, 50.0, MouseButton::Left);
//!
//! let mut changed = Vec::new();
//! driver.tick(&mut |_frame: u64, deltas: &[WidgetDelta]| {
//!     changed.extend(deltas.iter().map(|d| d.id));
//! });
//! assert!(changed.contains(&label.id()));
//! tree.close();
//! ```

pub mod config;
pub mod dirty;
pub mod dispatcher;
pub mod event_handler;
pub mod frame;
pub mod kind;
pub mod layout;
pub mod scroll;
mod shard;
pub mod style;
pub mod tree;
pub mod update;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;

// Core types
pub use dirty::{DirtyMask, InteractionFlags};
pub use kind::{DropdownState, WidgetKind};
pub use tree::Tree;
pub use widget::{HitTestFn, Widget, WidgetId, WidgetProps};

// Update pipeline
pub use frame::{FrameDriver, FrameSink, FrameStats};
pub use update::{deduplicate_updates, Update, UpdateKind, WidgetDelta};

// Events
pub use dispatcher::{EventDispatcher, HitResult};
pub use event_handler::{dispatch_to, propagate, EventCallback, EventContext, EventHandlers};
pub use trellis_core::{event_types, EventType, Key, Modifiers, MouseButton, Phase};

// Scrolling, style and layout
pub use layout::{FixedLayout, LayoutEngine};
pub use scroll::{scroll_by, scroll_metrics, scroll_to, ScrollAxis, ScrollMetrics, ScrollState};
pub use style::{Breakpoint, StyleContext, StyleProps, StyleResolver};

// Configuration
pub use config::{DispatcherConfig, RuntimeConfig, TreeConfig};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        event_types, EventContext, EventDispatcher, FrameDriver, FrameSink, Key, Modifiers,
        MouseButton, ScrollAxis, Tree, Widget, WidgetDelta, WidgetId,
    };
    pub use trellis_core::{Bounds, Color, EdgeInsets, Point, Size};
}
