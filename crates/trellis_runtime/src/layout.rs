//! Layout boundary
//!
//! Layout is computed elsewhere. The runtime only consumes the result: one
//! window-space [`Bounds`] per widget, stored on the widget and read by hit
//! testing and scroll metrics.

use rustc_hash::FxHashMap;
use trellis_core::{Bounds, Size};

use crate::widget::{Widget, WidgetId};

/// Produces computed bounds for a subtree
pub trait LayoutEngine {
    /// Bounds for `root` and its descendants, in window coordinates and
    /// unscrolled layout space
    fn compute(&self, root: &Widget, viewport: Size) -> Vec<(WidgetId, Bounds)>;
}

/// Layout engine backed by a fixed id → bounds map
///
/// For hosts that already know their geometry, and for tests.
#[derive(Clone, Debug, Default)]
pub struct FixedLayout {
    bounds: FxHashMap<WidgetId, Bounds>,
}

impl FixedLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, widget: &Widget, bounds: Bounds) -> &mut Self {
        self.bounds.insert(widget.id(), bounds);
        self
    }

    pub fn with(mut self, widget: &Widget, bounds: Bounds) -> Self {
        self.set(widget, bounds);
        self
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl LayoutEngine for FixedLayout {
    fn compute(&self, root: &Widget, _viewport: Size) -> Vec<(WidgetId, Bounds)> {
        root.subtree()
            .iter()
            .filter_map(|w| self.bounds.get(&w.id()).map(|b| (w.id(), *b)))
            .collect()
    }
}
