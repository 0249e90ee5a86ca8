//! The widget tree and its update pipeline
//!
//! A [`Tree`] owns the root widget, an id → widget registry, the shard pool
//! and the pending-update buffer. Widgets reach back into it through a weak
//! reference to report changes:
//!
//! ```text
//! Widget::set_*  (any thread)
//!     ↓ notify_update
//! ShardPool      (hash(id) → bounded channel → consumer thread)
//!     ↓
//! PendingBuffer  (one mutex, one "has pending" flag)
//!     ↓ collect_updates + deduplicate_updates  (frame loop)
//! Vec<WidgetDelta> → renderer
//! ```
//!
//! Structural changes (attach, detach, reparent) take the tree's structure
//! lock for writing; walks snapshot under the read lock so they never see a
//! widget in two child lists or in none.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use trellis_core::{event_types, Result, Size, TreeError};

use crate::config::TreeConfig;
use crate::dirty::{DirtyMask, InteractionFlags};
use crate::event_handler::{dispatch_to, EventContext};
use crate::layout::LayoutEngine;
use crate::shard::{PendingBuffer, ShardPool};
use crate::style::{Breakpoint, StyleContext, StyleResolver};
use crate::update::Update;
use crate::widget::{Widget, WidgetId};

/// Structure lock for widgets that belong to no tree
static DETACHED_STRUCTURE: RwLock<()> = parking_lot::const_rwlock(());

pub(crate) struct TreeShared {
    root: RwLock<Option<Widget>>,
    registry: RwLock<FxHashMap<WidgetId, Widget>>,
    pending: Arc<PendingBuffer>,
    shards: ShardPool,
    closed: AtomicBool,
    frame: AtomicU64,
    structure: RwLock<()>,
    dark_mode: AtomicBool,
    viewport: RwLock<Size>,
    resolver: RwLock<Option<Arc<dyn StyleResolver>>>,
}

impl TreeShared {
    fn snapshot(&self) -> Vec<Widget> {
        let _guard = self.structure.read();
        match self.root.read().as_ref() {
            Some(root) => root.subtree(),
            None => Vec::new(),
        }
    }

    fn close(&self) {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        for widget in self.snapshot() {
            widget.release_resource();
        }
        self.shards.close();
        tracing::debug!(frame = self.frame.load(Ordering::Relaxed), "tree closed");
    }
}

impl Drop for TreeShared {
    fn drop(&mut self) {
        self.close();
    }
}

/// Handle to a widget tree
///
/// Cloning is cheap. The tree closes when the last handle is dropped, but a
/// handle captured by an event handler on one of its own widgets keeps the
/// tree alive through its root: call [`Tree::close`] explicitly in that case
/// or the shard threads outlive every other handle.
#[derive(Clone)]
pub struct Tree {
    shared: Arc<TreeShared>,
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Eq for Tree {}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("widgets", &self.len())
            .field("frame", &self.frame())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    // =========================================================================
    // Construction
    // =========================================================================

    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        let pending = Arc::new(PendingBuffer::default());
        let shards = ShardPool::new(config.shard_count, config.shard_buffer, Arc::clone(&pending));
        Self {
            shared: Arc::new(TreeShared {
                root: RwLock::new(None),
                registry: RwLock::new(FxHashMap::default()),
                pending,
                shards,
                closed: AtomicBool::new(false),
                frame: AtomicU64::new(0),
                structure: RwLock::new(()),
                dark_mode: AtomicBool::new(false),
                viewport: RwLock::new(Size::ZERO),
                resolver: RwLock::new(None),
            }),
        }
    }

    pub(crate) fn from_shared(shared: Arc<TreeShared>) -> Self {
        Self { shared }
    }

    pub(crate) fn shared_ptr(&self) -> *const TreeShared {
        Arc::as_ptr(&self.shared)
    }

    fn weak(&self) -> Weak<TreeShared> {
        Arc::downgrade(&self.shared)
    }

    // =========================================================================
    // Root & registry
    // =========================================================================

    /// Make `widget` the root, destroying the previous root's subtree
    ///
    /// A widget that currently has a parent is moved out of it first.
    pub fn set_root(&self, widget: &Widget) -> Result<()> {
        if self.is_closed() {
            return Err(TreeError::Closed);
        }
        let old_root = self.root();
        if old_root.as_ref() == Some(widget) {
            return Ok(());
        }

        let old_parent = widget.parent();
        let old_tree = widget.tree();
        {
            let _guards = Tree::lock_structures(old_tree.as_ref(), Some(self));
            if let Some(parent) = &old_parent {
                parent.unlink_child(widget);
            } else if let Some(tree) = &old_tree {
                tree.take_root_if(widget);
            }
            *self.shared.root.write() = Some(widget.clone());
        }

        if let Some(old_root) = old_root {
            self.detach_subtree(&old_root, true);
        }

        if old_tree.as_ref() == Some(self) {
            if let Some(parent) = &old_parent {
                self.notify_reorder(parent);
            }
        } else {
            if let Some(tree) = &old_tree {
                tree.detach_subtree(widget, false);
                if let Some(parent) = &old_parent {
                    tree.notify_reorder(parent);
                }
            }
            self.attach_subtree(widget);
        }
        Ok(())
    }

    /// Remove and destroy the root's subtree
    pub fn clear_root(&self) {
        let root = {
            let _guard = self.shared.structure.write();
            self.shared.root.write().take()
        };
        if let Some(root) = root {
            self.detach_subtree(&root, true);
        }
    }

    pub(crate) fn take_root_if(&self, widget: &Widget) {
        let mut root = self.shared.root.write();
        if root.as_ref() == Some(widget) {
            *root = None;
        }
    }

    pub fn root(&self) -> Option<Widget> {
        self.shared.root.read().clone()
    }

    /// Look up an attached widget
    pub fn get(&self, id: WidgetId) -> Option<Widget> {
        self.shared.registry.read().get(&id).cloned()
    }

    /// Look up an attached widget, failing with [`TreeError::UnknownWidget`]
    pub fn require(&self, id: WidgetId) -> Result<Widget> {
        self.get(id).ok_or(TreeError::UnknownWidget(id.raw()))
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.shared.registry.read().contains_key(&id)
    }

    /// Number of attached widgets
    pub fn len(&self) -> usize {
        self.shared.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pre-order snapshot of every attached widget
    pub fn widgets(&self) -> Vec<Widget> {
        self.shared.snapshot()
    }

    /// Visit every attached widget in pre-order
    ///
    /// The visitor runs outside the structure lock and may mutate the tree;
    /// it sees the tree as it was when the walk started.
    pub fn walk(&self, mut visit: impl FnMut(&Widget)) {
        for widget in self.widgets() {
            visit(&widget);
        }
    }

    // =========================================================================
    // Attach / detach
    // =========================================================================

    /// Register a newly attached subtree, emitting one Add per node
    pub(crate) fn attach_subtree(&self, child: &Widget) {
        let nodes = child.subtree();
        {
            let weak = self.weak();
            let mut registry = self.shared.registry.write();
            for widget in &nodes {
                widget.set_tree(weak.clone());
                registry.insert(widget.id(), widget.clone());
            }
        }
        for widget in &nodes {
            self.notify_add(widget);
            widget.restyle();
        }
        for widget in &nodes {
            dispatch_to(widget, &mut EventContext::new(event_types::MOUNT));
        }
        tracing::debug!(root = %child.id(), count = nodes.len(), "attached subtree");
    }

    /// Unregister a subtree, emitting one Remove per node
    ///
    /// With `destroy`, native resources are released and UNMOUNT fires;
    /// otherwise the subtree is moving to another tree or a detached parent.
    pub(crate) fn detach_subtree(&self, child: &Widget, destroy: bool) {
        let nodes = child.subtree();
        {
            let mut registry = self.shared.registry.write();
            for widget in &nodes {
                registry.remove(&widget.id());
            }
        }
        for widget in &nodes {
            self.notify_remove(widget);
            if widget.is_attached_to(self) {
                widget.set_tree(Weak::new());
            }
            if destroy {
                widget.release_resource();
            }
        }
        if destroy {
            for widget in &nodes {
                dispatch_to(widget, &mut EventContext::new(event_types::UNMOUNT));
            }
        }
        tracing::debug!(root = %child.id(), count = nodes.len(), destroy, "detached subtree");
    }

    /// Write-lock the structure of up to two trees in a stable order
    ///
    /// With no tree at all, edits between detached widgets serialize on one
    /// process-wide lock instead.
    pub(crate) fn lock_structures<'a>(
        a: Option<&'a Tree>,
        b: Option<&'a Tree>,
    ) -> SmallVec<[RwLockWriteGuard<'a, ()>; 2]> {
        if a.is_none() && b.is_none() {
            return smallvec::smallvec![DETACHED_STRUCTURE.write()];
        }
        let mut trees: SmallVec<[&'a Tree; 2]> = a.into_iter().chain(b).collect();
        trees.sort_by_key(|t| t.shared_ptr() as usize);
        trees.dedup_by(|x, y| *x == *y);
        trees
            .into_iter()
            .map(|t| t.shared.structure.write())
            .collect()
    }

    /// Hold off structural changes while walking
    pub(crate) fn structure_read(&self) -> RwLockReadGuard<'_, ()> {
        self.shared.structure.read()
    }

    // =========================================================================
    // Producer side
    // =========================================================================

    /// Record a property change; silent no-op once closed
    pub fn notify_update(&self, widget: &Widget, mask: DirtyMask) {
        self.send(Update::property(widget, mask));
    }

    pub fn notify_add(&self, widget: &Widget) {
        self.send(Update::add(widget));
    }

    pub fn notify_remove(&self, widget: &Widget) {
        self.send(Update::remove(widget));
    }

    pub fn notify_reorder(&self, widget: &Widget) {
        self.send(Update::reorder(widget));
    }

    fn send(&self, update: Update) {
        if self.is_closed() {
            tracing::trace!(id = %update.id, kind = ?update.kind, "update after close ignored");
            return;
        }
        self.shared.pending.mark_pending();
        self.shared.shards.send(update);
    }

    // =========================================================================
    // Consumer side
    // =========================================================================

    /// Cheap check for "anything to render"
    pub fn has_pending_updates(&self) -> bool {
        self.shared.pending.has_pending()
    }

    /// Take every pending update and start a new frame
    ///
    /// Returns an empty list when nothing was pending. Updates still queued
    /// in a shard land in the next frame; call [`Tree::flush`] first to
    /// include them.
    pub fn collect_updates(&self) -> Vec<Update> {
        let frame = self.shared.frame.fetch_add(1, Ordering::AcqRel) + 1;
        if !self.shared.pending.has_pending() {
            return Vec::new();
        }
        let updates = self.shared.pending.take();
        for update in &updates {
            update.widget.clear_dirty(update.mask);
        }
        tracing::trace!(frame, count = updates.len(), "collected updates");
        updates
    }

    /// Wait until every update sent so far has reached the pending buffer
    pub fn flush(&self) {
        self.shared.shards.flush();
    }

    /// Number of completed collections
    pub fn frame(&self) -> u64 {
        self.shared.frame.load(Ordering::Acquire)
    }

    pub fn shard_count(&self) -> usize {
        self.shared.shards.shard_count()
    }

    // =========================================================================
    // Tree-scoped style context
    // =========================================================================

    pub fn set_dark_mode(&self, dark: bool) {
        if self.shared.dark_mode.swap(dark, Ordering::AcqRel) != dark {
            tracing::debug!(dark, "dark mode changed");
            self.restyle_all();
        }
    }

    pub fn is_dark_mode(&self) -> bool {
        self.shared.dark_mode.load(Ordering::Acquire)
    }

    /// Record the viewport size; crossing a breakpoint restyles every widget
    pub fn set_viewport(&self, size: Size) {
        let before = {
            let mut viewport = self.shared.viewport.write();
            let before = Breakpoint::from_width(viewport.width);
            *viewport = size;
            before
        };
        let after = Breakpoint::from_width(size.width);
        if before != after {
            tracing::debug!(?before, ?after, "breakpoint changed");
            self.restyle_all();
        }
    }

    pub fn viewport(&self) -> Size {
        *self.shared.viewport.read()
    }

    pub fn breakpoint(&self) -> Breakpoint {
        Breakpoint::from_width(self.viewport().width)
    }

    pub fn set_style_resolver(&self, resolver: impl StyleResolver + 'static) {
        *self.shared.resolver.write() = Some(Arc::new(resolver));
        self.restyle_all();
    }

    pub(crate) fn style_resolver(&self) -> Option<Arc<dyn StyleResolver>> {
        self.shared.resolver.read().clone()
    }

    pub(crate) fn style_context(&self, flags: InteractionFlags) -> StyleContext {
        StyleContext {
            hovered: flags.contains(InteractionFlags::HOVERED),
            focused: flags.contains(InteractionFlags::FOCUSED),
            pressed: flags.contains(InteractionFlags::PRESSED),
            disabled: flags.contains(InteractionFlags::DISABLED),
            dark_mode: self.is_dark_mode(),
            breakpoint: self.breakpoint(),
        }
    }

    /// Re-resolve style classes on every attached widget
    pub fn restyle_all(&self) {
        self.walk(Widget::restyle);
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Run a layout engine over the root and store the resulting bounds
    pub fn apply_layout(&self, engine: &dyn LayoutEngine) {
        let Some(root) = self.root() else {
            return;
        };
        for (id, bounds) in engine.compute(&root, self.viewport()) {
            if let Some(widget) = self.get(id) {
                widget.set_computed_bounds(bounds);
            }
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Release native resources and stop the shard consumers
    ///
    /// Idempotent. Later notifications are silently ignored.
    pub fn close(&self) {
        self.shared.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}
