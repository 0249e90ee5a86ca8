//! Update records and per-frame deduplication
//!
//! Every mutation produces one [`Update`]. Between frames they accumulate in
//! the tree's pending buffer; at the frame boundary
//! [`deduplicate_updates`] folds them into at most one [`WidgetDelta`] per
//! widget, which is what the renderer consumes.
//!
//! Deltas carry a live widget handle rather than a snapshot: the renderer
//! reads the widget's current state for whatever categories the mask names.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::dirty::DirtyMask;
use crate::widget::{Widget, WidgetId};

// =============================================================================
// Update
// =============================================================================

/// What kind of mutation an [`Update`] records
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// One or more property categories changed
    Property,
    /// Widget attached to the tree
    Add,
    /// Widget detached and destroyed
    Remove,
    /// Widget's child list changed order or membership
    Reorder,
}

/// One mutation of one widget
#[derive(Clone, Debug)]
pub struct Update {
    pub kind: UpdateKind,
    pub id: WidgetId,
    /// Changed categories (Property only)
    pub mask: DirtyMask,
    pub widget: Widget,
}

impl Update {
    pub fn property(widget: &Widget, mask: DirtyMask) -> Self {
        Self::new(UpdateKind::Property, widget, mask)
    }

    pub fn add(widget: &Widget) -> Self {
        Self::new(UpdateKind::Add, widget, DirtyMask::FULL)
    }

    pub fn remove(widget: &Widget) -> Self {
        Self::new(UpdateKind::Remove, widget, DirtyMask::empty())
    }

    pub fn reorder(widget: &Widget) -> Self {
        Self::new(UpdateKind::Reorder, widget, DirtyMask::CHILDREN)
    }

    fn new(kind: UpdateKind, widget: &Widget, mask: DirtyMask) -> Self {
        Self {
            kind,
            id: widget.id(),
            mask,
            widget: widget.clone(),
        }
    }
}

// =============================================================================
// WidgetDelta
// =============================================================================

/// All mutations of one widget within one frame
#[derive(Clone, Debug)]
pub struct WidgetDelta {
    pub id: WidgetId,
    /// Live widget to read changed state from; `None` when removed
    pub widget: Option<Widget>,
    /// Union of every changed category; full for new widgets
    pub mask: DirtyMask,
    /// Attached this frame; the renderer should take a complete snapshot
    pub is_new: bool,
    /// Detached this frame; no property payload
    pub is_removed: bool,
}

impl WidgetDelta {
    fn changed(update: &Update) -> Self {
        Self {
            id: update.id,
            widget: Some(update.widget.clone()),
            mask: update.mask,
            is_new: false,
            is_removed: false,
        }
    }

    fn added(update: &Update) -> Self {
        Self {
            id: update.id,
            widget: Some(update.widget.clone()),
            mask: DirtyMask::FULL,
            is_new: true,
            is_removed: false,
        }
    }

    fn removed(id: WidgetId) -> Self {
        Self {
            id,
            widget: None,
            mask: DirtyMask::empty(),
            is_new: false,
            is_removed: true,
        }
    }
}

/// Fold a frame's raw updates into one delta per widget
///
/// - Property and Reorder updates OR their masks into the widget's delta.
/// - Add replaces whatever came before with a full-mask `is_new` delta.
/// - Remove replaces whatever came before with an `is_removed` delta;
///   later Property/Reorder updates for that widget are ignored, a later
///   Add revives it.
///
/// Output is in the order each widget was first seen.
pub fn deduplicate_updates(updates: &[Update]) -> Vec<WidgetDelta> {
    let mut deltas: IndexMap<WidgetId, WidgetDelta, FxBuildHasher> =
        IndexMap::with_capacity_and_hasher(updates.len(), FxBuildHasher);

    for update in updates {
        match update.kind {
            UpdateKind::Property | UpdateKind::Reorder => {
                deltas
                    .entry(update.id)
                    .and_modify(|delta| {
                        if !delta.is_removed {
                            delta.mask |= update.mask;
                        }
                    })
                    .or_insert_with(|| WidgetDelta::changed(update));
            }
            UpdateKind::Add => {
                deltas.insert(update.id, WidgetDelta::added(update));
            }
            UpdateKind::Remove => {
                deltas.insert(update.id, WidgetDelta::removed(update.id));
            }
        }
    }

    let out: Vec<WidgetDelta> = deltas.into_values().collect();
    tracing::trace!(raw = updates.len(), deltas = out.len(), "deduplicated updates");
    out
}
