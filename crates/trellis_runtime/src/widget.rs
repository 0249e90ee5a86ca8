//! Widgets: the nodes of the retained tree
//!
//! A [`Widget`] is a cheap `Arc` handle that any thread may hold and mutate.
//! Children are owned by their parent; the parent and tree back-references
//! are weak and only used for lookup.
//!
//! Every property setter compares old and new values, computes the minimal
//! [`DirtyMask`], records it locally and hands it to the owning tree's update
//! pipeline. Nothing is serialized here; the renderer resolves deltas
//! against live widget state at collection time.
//!
//! # Example
//!
//! ```rust
//! use trellis_runtime::{Tree, Widget};
//!
//! let tree = Tree::new();
//! let root = Widget::container();
//! let label = Widget::text("Hello");
//! root.add_child(&label).unwrap();
//! tree.set_root(&root).unwrap();
//!
//! label.set_text("Hello, world");
//! tree.flush();
//! assert!(tree.has_pending_updates());
//! tree.close();
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use smallvec::SmallVec;
use trellis_core::{
    event_types, Bounds, Color, EdgeInsets, EventType, NativeResource, Point, Result, Size,
    TreeError,
};

use crate::dirty::{DirtyMask, InteractionFlags};
use crate::event_handler::{EventCallback, EventContext, EventHandlers};
use crate::kind::{DropdownState, WidgetKind};
use crate::scroll::{ScrollAxis, ScrollState};
use crate::style::StyleProps;
use crate::tree::{Tree, TreeShared};

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

/// Unique, stable identity of a widget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    /// Byte representation used for shard hashing
    pub fn as_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Custom hit test: receives the point relative to the widget's bounds and
/// the bounds' size
pub type HitTestFn = Arc<dyn Fn(Point, Size) -> bool + Send + Sync>;

/// Visual properties shared by every widget kind
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetProps {
    /// Space separated style classes, resolved by the tree's style resolver
    pub classes: String,
    pub background: Option<Color>,
    pub text_color: Option<Color>,
    pub opacity: f32,
    pub padding: EdgeInsets,
    /// Spacing between children
    pub gap: f32,
    pub corner_radius: f32,
    pub visible: bool,
}

impl Default for WidgetProps {
    fn default() -> Self {
        Self {
            classes: String::new(),
            background: None,
            text_color: None,
            opacity: 1.0,
            padding: EdgeInsets::ZERO,
            gap: 0.0,
            corner_radius: 0.0,
            visible: true,
        }
    }
}

pub(crate) struct WidgetState {
    pub(crate) kind: WidgetKind,
    pub(crate) props: WidgetProps,
    pub(crate) flags: InteractionFlags,
    pub(crate) bounds: Bounds,
    pub(crate) focusable: bool,
    pub(crate) pointer_events: bool,
    pub(crate) hit_test: Option<HitTestFn>,
    /// Last property set applied from the style resolver
    pub(crate) styled: StyleProps,
}

pub(crate) struct WidgetInner {
    id: WidgetId,
    dirty: AtomicU32,
    pub(crate) state: RwLock<WidgetState>,
    pub(crate) children: RwLock<Vec<Widget>>,
    parent: RwLock<Weak<WidgetInner>>,
    tree: RwLock<Weak<TreeShared>>,
    handlers: RwLock<EventHandlers>,
    resource: Mutex<Option<Box<dyn NativeResource>>>,
}

/// Handle to a widget
///
/// Cloning the handle is cheap; equality is identity.
#[derive(Clone)]
pub struct Widget {
    inner: Arc<WidgetInner>,
}

impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Widget {}

impl Hash for Widget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Widget")
            .field("id", &self.inner.id)
            .field("kind", &state.kind.name())
            .field("bounds", &state.bounds)
            .field("flags", &state.flags)
            .finish()
    }
}

impl Widget {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a detached widget of the given kind
    pub fn new(kind: WidgetKind) -> Self {
        let focusable = kind.default_focusable();
        Self {
            inner: Arc::new(WidgetInner {
                id: WidgetId::next(),
                dirty: AtomicU32::new(DirtyMask::FULL.bits()),
                state: RwLock::new(WidgetState {
                    kind,
                    props: WidgetProps::default(),
                    flags: InteractionFlags::empty(),
                    bounds: Bounds::ZERO,
                    focusable,
                    pointer_events: true,
                    hit_test: None,
                    styled: StyleProps::default(),
                }),
                children: RwLock::new(Vec::new()),
                parent: RwLock::new(Weak::new()),
                tree: RwLock::new(Weak::new()),
                handlers: RwLock::new(EventHandlers::new()),
                resource: Mutex::new(None),
            }),
        }
    }

    pub fn container() -> Self {
        Self::new(WidgetKind::Container)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(WidgetKind::Text {
            content: content.into(),
        })
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button {
            label: label.into(),
        })
    }

    pub fn text_input(placeholder: impl Into<String>) -> Self {
        Self::new(WidgetKind::TextInput {
            value: String::new(),
            placeholder: placeholder.into(),
        })
    }

    pub fn scroll(axis: ScrollAxis) -> Self {
        Self::new(WidgetKind::Scroll(ScrollState::new(axis)))
    }

    pub fn dropdown<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(WidgetKind::Dropdown(DropdownState::new(
            options.into_iter().map(Into::into).collect(),
        )))
    }

    pub fn image(source: impl Into<String>) -> Self {
        Self::new(WidgetKind::Image {
            source: source.into(),
        })
    }

    /// Tray icon owning a native resource, released when the widget is
    /// detached or its tree closes
    pub fn tray_icon(tooltip: impl Into<String>, resource: impl NativeResource + 'static) -> Self {
        let widget = Self::new(WidgetKind::TrayIcon {
            tooltip: tooltip.into(),
        });
        *widget.inner.resource.lock() = Some(Box::new(resource));
        widget
    }

    /// Builder: set computed bounds
    pub fn with_bounds(self, bounds: Bounds) -> Self {
        self.set_computed_bounds(bounds);
        self
    }

    /// Builder: set style classes
    pub fn with_classes(self, classes: impl Into<String>) -> Self {
        self.set_classes(classes);
        self
    }

    pub fn with_padding(self, padding: EdgeInsets) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn with_gap(self, gap: f32) -> Self {
        self.set_gap(gap);
        self
    }

    /// Builder: append a child
    pub fn with_child(self, child: Widget) -> Self {
        if let Err(err) = self.add_child(&child) {
            tracing::warn!(%err, "with_child: child not attached");
        }
        self
    }

    // =========================================================================
    // Identity & accessors
    // =========================================================================

    pub fn id(&self) -> WidgetId {
        self.inner.id
    }

    /// Snapshot of the kind and its state
    pub fn kind(&self) -> WidgetKind {
        self.inner.state.read().kind.clone()
    }

    pub fn kind_name(&self) -> &'static str {
        self.inner.state.read().kind.name()
    }

    pub fn props(&self) -> WidgetProps {
        self.inner.state.read().props.clone()
    }

    /// Text content of a text widget or label of a button
    pub fn text_content(&self) -> Option<String> {
        match &self.inner.state.read().kind {
            WidgetKind::Text { content } => Some(content.clone()),
            WidgetKind::Button { label } => Some(label.clone()),
            _ => None,
        }
    }

    /// Current value of a text input
    pub fn value(&self) -> Option<String> {
        match &self.inner.state.read().kind {
            WidgetKind::TextInput { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    pub fn scroll_state(&self) -> Option<ScrollState> {
        match &self.inner.state.read().kind {
            WidgetKind::Scroll(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn scroll_offset(&self) -> Option<Point> {
        match &self.inner.state.read().kind {
            WidgetKind::Scroll(s) => Some(s.offset),
            _ => None,
        }
    }

    pub fn dropdown_state(&self) -> Option<DropdownState> {
        match &self.inner.state.read().kind {
            WidgetKind::Dropdown(d) => Some(d.clone()),
            _ => None,
        }
    }

    /// Bounds last written by the layout engine
    pub fn bounds(&self) -> Bounds {
        self.inner.state.read().bounds
    }

    pub fn flags(&self) -> InteractionFlags {
        self.inner.state.read().flags
    }

    pub fn is_hovered(&self) -> bool {
        self.flags().contains(InteractionFlags::HOVERED)
    }

    pub fn is_focused(&self) -> bool {
        self.flags().contains(InteractionFlags::FOCUSED)
    }

    pub fn is_pressed(&self) -> bool {
        self.flags().contains(InteractionFlags::PRESSED)
    }

    pub fn is_disabled(&self) -> bool {
        self.flags().contains(InteractionFlags::DISABLED)
    }

    pub fn is_visible(&self) -> bool {
        self.inner.state.read().props.visible
    }

    pub fn is_scrollable(&self) -> bool {
        self.inner.state.read().kind.is_scrollable()
    }

    pub fn is_text_input(&self) -> bool {
        self.inner.state.read().kind.is_text_input()
    }

    pub fn is_focusable(&self) -> bool {
        self.inner.state.read().focusable
    }

    /// Whether hit testing may target this widget or descend into it
    pub fn can_receive_events(&self) -> bool {
        let state = self.inner.state.read();
        state.props.visible
            && state.pointer_events
            && !state.flags.contains(InteractionFlags::DISABLED)
    }

    /// Categories dirtied since the last collection
    pub fn dirty_mask(&self) -> DirtyMask {
        DirtyMask::from_bits_truncate(self.inner.dirty.load(Ordering::Acquire))
    }

    // =========================================================================
    // Structure
    // =========================================================================

    pub fn children(&self) -> Vec<Widget> {
        self.inner.children.read().clone()
    }

    pub fn child_count(&self) -> usize {
        self.inner.children.read().len()
    }

    pub fn parent(&self) -> Option<Widget> {
        self.inner
            .parent
            .read()
            .upgrade()
            .map(|inner| Widget { inner })
    }

    /// The tree this widget is attached to
    pub fn tree(&self) -> Option<Tree> {
        self.inner.tree.read().upgrade().map(Tree::from_shared)
    }

    pub fn is_attached(&self) -> bool {
        self.inner.tree.read().strong_count() > 0
    }

    pub(crate) fn is_attached_to(&self, tree: &Tree) -> bool {
        std::ptr::eq(self.inner.tree.read().as_ptr(), tree.shared_ptr())
    }

    pub(crate) fn set_tree(&self, tree: Weak<TreeShared>) {
        *self.inner.tree.write() = tree;
    }

    /// Whether `self` is `other` or one of its ancestors
    pub fn is_ancestor_of(&self, other: &Widget) -> bool {
        let mut current = Some(other.clone());
        while let Some(widget) = current {
            if widget == *self {
                return true;
            }
            current = widget.parent();
        }
        false
    }

    /// Root → self, following parent links
    pub fn ancestor_chain(&self) -> Vec<Widget> {
        let mut chain = Vec::new();
        let mut current = Some(self.clone());
        while let Some(widget) = current {
            current = widget.parent();
            chain.push(widget);
        }
        chain.reverse();
        chain
    }

    /// Append a child
    ///
    /// A child that already has a parent is moved: it leaves the old parent's
    /// list and joins this one under the tree's structure lock, so a
    /// concurrent walk sees it in exactly one place.
    pub fn add_child(&self, child: &Widget) -> Result<()> {
        self.insert_child(usize::MAX, child)
    }

    /// Insert a child at `index` (clamped to the child count)
    pub fn insert_child(&self, index: usize, child: &Widget) -> Result<()> {
        let old_tree = child.tree();
        let new_tree = self.tree();

        let old_parent = {
            let _guards = Tree::lock_structures(old_tree.as_ref(), new_tree.as_ref());
            // Checked under the guards so opposite reparents cannot both pass
            if child.is_ancestor_of(self) {
                return Err(TreeError::Cycle {
                    parent: self.id().raw(),
                    child: child.id().raw(),
                });
            }
            let old_parent = child.parent();
            if let Some(old_parent) = &old_parent {
                old_parent.unlink_child(child);
            } else if let Some(old_tree) = &old_tree {
                // A root moving under a parent leaves its tree rootless
                old_tree.take_root_if(child);
            }
            let mut children = self.inner.children.write();
            let index = index.min(children.len());
            children.insert(index, child.clone());
            *child.inner.parent.write() = Arc::downgrade(&self.inner);
            old_parent
        };

        match (&old_tree, &new_tree) {
            (Some(old), Some(new)) if old == new => {
                if let Some(old_parent) = &old_parent {
                    if old_parent != self {
                        old.notify_reorder(old_parent);
                    }
                }
                new.notify_reorder(self);
            }
            _ => {
                if let Some(old) = &old_tree {
                    old.detach_subtree(child, false);
                    if let Some(old_parent) = &old_parent {
                        old.notify_reorder(old_parent);
                    }
                }
                if let Some(new) = &new_tree {
                    new.attach_subtree(child);
                    new.notify_reorder(self);
                }
            }
        }
        Ok(())
    }

    /// Remove and destroy a child
    ///
    /// The child's subtree is unregistered from the tree, its native
    /// resources are released and one Remove update is emitted per node.
    pub fn remove_child(&self, child: &Widget) -> Result<()> {
        if child.parent().as_ref() != Some(self) {
            return Err(TreeError::NotAChild {
                parent: self.id().raw(),
                child: child.id().raw(),
            });
        }
        let tree = self.tree();
        {
            let _guards = Tree::lock_structures(tree.as_ref(), None);
            self.unlink_child(child);
        }
        match &tree {
            Some(tree) => {
                tree.detach_subtree(child, true);
                tree.notify_reorder(self);
            }
            None => child.release_subtree_resources(),
        }
        Ok(())
    }

    /// Remove this widget from its parent (or from its tree, if it is the root)
    pub fn detach(&self) -> Result<()> {
        if let Some(parent) = self.parent() {
            return parent.remove_child(self);
        }
        if let Some(tree) = self.tree() {
            if tree.root().as_ref() == Some(self) {
                tree.clear_root();
            }
        }
        Ok(())
    }

    /// Move a child from one index to another
    pub fn move_child(&self, from: usize, to: usize) -> Result<()> {
        let tree = self.tree();
        {
            let _guards = Tree::lock_structures(tree.as_ref(), None);
            let mut children = self.inner.children.write();
            let len = children.len();
            if from >= len || to >= len {
                return Err(TreeError::IndexOutOfRange {
                    index: from.max(to),
                    len,
                });
            }
            if from == to {
                return Ok(());
            }
            let child = children.remove(from);
            children.insert(to, child);
        }
        if let Some(tree) = tree {
            tree.notify_reorder(self);
        }
        Ok(())
    }

    pub(crate) fn unlink_child(&self, child: &Widget) {
        self.inner.children.write().retain(|c| c != child);
        *child.inner.parent.write() = Weak::new();
    }

    /// Pre-order snapshot of this widget and its descendants
    pub fn subtree(&self) -> Vec<Widget> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(widget) = stack.pop() {
            let children = widget.inner.children.read();
            stack.extend(children.iter().rev().cloned());
            drop(children);
            out.push(widget);
        }
        out
    }

    /// Release this widget's native resource, if any (idempotent)
    pub(crate) fn release_resource(&self) {
        let resource = self.inner.resource.lock().take();
        if let Some(resource) = resource {
            tracing::debug!(id = %self.id(), "releasing native resource");
            resource.release();
        }
    }

    fn release_subtree_resources(&self) {
        for widget in self.subtree() {
            widget.release_resource();
        }
    }

    pub fn has_native_resource(&self) -> bool {
        self.inner.resource.lock().is_some()
    }

    // =========================================================================
    // Dirty tracking
    // =========================================================================

    /// Record a change locally and hand it to the update pipeline
    pub(crate) fn mark_dirty(&self, mask: DirtyMask) {
        if mask.is_empty() {
            return;
        }
        self.inner.dirty.fetch_or(mask.bits(), Ordering::AcqRel);
        if let Some(tree) = self.tree() {
            tree.notify_update(self, mask);
        }
    }

    pub(crate) fn clear_dirty(&self, mask: DirtyMask) {
        self.inner.dirty.fetch_and(!mask.bits(), Ordering::AcqRel);
    }

    fn mutate(&self, f: impl FnOnce(&mut WidgetState) -> DirtyMask) {
        let mask = {
            let mut state = self.inner.state.write();
            f(&mut state)
        };
        self.mark_dirty(mask);
    }

    // =========================================================================
    // Property setters
    // =========================================================================

    /// Set the content of a text widget or the label of a button
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|s| match &mut s.kind {
            WidgetKind::Text { content: current } | WidgetKind::Button { label: current } => {
                replace_if_changed(current, text, DirtyMask::CONTENT)
            }
            _ => DirtyMask::empty(),
        });
    }

    /// Set the value of a text input
    pub fn set_value(&self, value: impl Into<String>) {
        let value = value.into();
        self.mutate(|s| match &mut s.kind {
            WidgetKind::TextInput { value: current, .. } => {
                replace_if_changed(current, value, DirtyMask::CONTENT)
            }
            _ => DirtyMask::empty(),
        });
    }

    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        let placeholder = placeholder.into();
        self.mutate(|s| match &mut s.kind {
            WidgetKind::TextInput {
                placeholder: current,
                ..
            } => replace_if_changed(current, placeholder, DirtyMask::CONTENT),
            _ => DirtyMask::empty(),
        });
    }

    pub fn set_image_source(&self, source: impl Into<String>) {
        let source = source.into();
        self.mutate(|s| match &mut s.kind {
            WidgetKind::Image { source: current } => {
                replace_if_changed(current, source, DirtyMask::CONTENT)
            }
            _ => DirtyMask::empty(),
        });
    }

    /// Set the style class list and re-resolve style
    pub fn set_classes(&self, classes: impl Into<String>) {
        let classes = classes.into();
        self.mutate(|s| replace_if_changed(&mut s.props.classes, classes, DirtyMask::STYLE));
        self.restyle();
    }

    pub fn set_background(&self, color: Option<Color>) {
        self.mutate(|s| replace_if_changed(&mut s.props.background, color, DirtyMask::STYLE));
    }

    pub fn set_text_color(&self, color: Option<Color>) {
        self.mutate(|s| replace_if_changed(&mut s.props.text_color, color, DirtyMask::STYLE));
    }

    pub fn set_opacity(&self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        self.mutate(|s| replace_if_changed(&mut s.props.opacity, opacity, DirtyMask::STYLE));
    }

    pub fn set_corner_radius(&self, radius: f32) {
        self.mutate(|s| replace_if_changed(&mut s.props.corner_radius, radius, DirtyMask::STYLE));
    }

    pub fn set_padding(&self, padding: EdgeInsets) {
        self.mutate(|s| replace_if_changed(&mut s.props.padding, padding, DirtyMask::LAYOUT));
    }

    pub fn set_gap(&self, gap: f32) {
        self.mutate(|s| replace_if_changed(&mut s.props.gap, gap, DirtyMask::LAYOUT));
    }

    pub fn set_visible(&self, visible: bool) {
        self.mutate(|s| {
            replace_if_changed(
                &mut s.props.visible,
                visible,
                DirtyMask::VISIBILITY | DirtyMask::LAYOUT,
            )
        });
    }

    /// Disabled widgets are skipped by hit testing
    pub fn set_disabled(&self, disabled: bool) {
        self.set_flag(InteractionFlags::DISABLED, disabled);
    }

    pub fn set_focusable(&self, focusable: bool) {
        self.inner.state.write().focusable = focusable;
    }

    /// When false, hit testing skips this widget and its subtree
    pub fn set_pointer_events(&self, enabled: bool) {
        self.inner.state.write().pointer_events = enabled;
    }

    /// Install a custom, non-rectangular hit test
    pub fn set_hit_test<F>(&self, hit_test: F)
    where
        F: Fn(Point, Size) -> bool + Send + Sync + 'static,
    {
        self.inner.state.write().hit_test = Some(Arc::new(hit_test));
    }

    /// Set the scroll offset of a scroll container, unclamped
    ///
    /// Use [`crate::scroll::scroll_to`] to clamp against content size.
    pub fn set_scroll_offset(&self, offset: Point) {
        self.mutate(|s| match &mut s.kind {
            WidgetKind::Scroll(scroll) => {
                replace_if_changed(&mut scroll.offset, offset, DirtyMask::SCROLL)
            }
            _ => DirtyMask::empty(),
        });
    }

    /// Override the content size a scroll container would otherwise derive
    /// from its children
    pub fn set_content_size(&self, size: Option<Size>) {
        self.mutate(|s| match &mut s.kind {
            WidgetKind::Scroll(scroll) => {
                replace_if_changed(&mut scroll.content_size, size, DirtyMask::SCROLL)
            }
            _ => DirtyMask::empty(),
        });
    }

    pub fn set_dropdown_open(&self, open: bool) {
        self.mutate(|s| match &mut s.kind {
            WidgetKind::Dropdown(d) => replace_if_changed(&mut d.open, open, DirtyMask::OVERLAY),
            _ => DirtyMask::empty(),
        });
    }

    pub fn set_selected(&self, selected: Option<usize>) {
        self.mutate(|s| match &mut s.kind {
            WidgetKind::Dropdown(d) => {
                let selected = selected.filter(|i| *i < d.options.len());
                replace_if_changed(&mut d.selected, selected, DirtyMask::CONTENT)
            }
            _ => DirtyMask::empty(),
        });
    }

    /// Store layout output; consumed by hit testing, never emits an update
    pub fn set_computed_bounds(&self, bounds: Bounds) {
        self.inner.state.write().bounds = bounds;
    }

    /// Apply a resolved style property set in one update
    ///
    /// A field the previous set styled but this one leaves `None` returns to
    /// its [`WidgetProps::default`] value. Fields no style ever touched keep
    /// whatever the setters stored.
    pub fn apply_style(&self, props: &StyleProps) {
        self.mutate(|s| {
            let base = WidgetProps::default();
            let prev = std::mem::replace(&mut s.styled, props.clone());
            let p = &mut s.props;
            let mut mask = DirtyMask::empty();
            if let Some(v) = styled(props.background.map(Some), prev.background, base.background) {
                mask |= replace_if_changed(&mut p.background, v, DirtyMask::STYLE);
            }
            if let Some(v) = styled(props.text_color.map(Some), prev.text_color, base.text_color) {
                mask |= replace_if_changed(&mut p.text_color, v, DirtyMask::STYLE);
            }
            if let Some(v) = styled(props.opacity, prev.opacity, base.opacity) {
                mask |= replace_if_changed(&mut p.opacity, v.clamp(0.0, 1.0), DirtyMask::STYLE);
            }
            if let Some(v) = styled(props.corner_radius, prev.corner_radius, base.corner_radius) {
                mask |= replace_if_changed(&mut p.corner_radius, v, DirtyMask::STYLE);
            }
            if let Some(v) = styled(props.padding, prev.padding, base.padding) {
                mask |= replace_if_changed(&mut p.padding, v, DirtyMask::LAYOUT);
            }
            if let Some(v) = styled(props.gap, prev.gap, base.gap) {
                mask |= replace_if_changed(&mut p.gap, v, DirtyMask::LAYOUT);
            }
            if let Some(v) = styled(props.visible, prev.visible, base.visible) {
                mask |= replace_if_changed(
                    &mut p.visible,
                    v,
                    DirtyMask::VISIBILITY | DirtyMask::LAYOUT,
                );
            }
            mask
        });
    }

    /// Re-resolve style classes against the owning tree's resolver
    ///
    /// Deferred while detached: attaching calls this again once tree-scoped
    /// context (dark mode, breakpoint) is known.
    pub(crate) fn restyle(&self) {
        let Some(tree) = self.tree() else {
            return;
        };
        let Some(resolver) = tree.style_resolver() else {
            return;
        };
        let (classes, flags) = {
            let state = self.inner.state.read();
            (state.props.classes.clone(), state.flags)
        };
        if classes.is_empty() {
            return;
        }
        let props = resolver.resolve(&classes, &tree.style_context(flags));
        self.apply_style(&props);
    }

    // =========================================================================
    // Interaction flags (driven by the dispatcher)
    // =========================================================================

    fn set_flag(&self, flag: InteractionFlags, on: bool) {
        let changed = {
            let mut state = self.inner.state.write();
            let before = state.flags;
            state.flags.set(flag, on);
            before != state.flags
        };
        if changed {
            self.mark_dirty(DirtyMask::STATE);
            self.restyle();
        }
    }

    pub(crate) fn set_hovered(&self, hovered: bool) {
        self.set_flag(InteractionFlags::HOVERED, hovered);
    }

    pub(crate) fn set_focused(&self, focused: bool) {
        self.set_flag(InteractionFlags::FOCUSED, focused);
    }

    pub(crate) fn set_pressed(&self, pressed: bool) {
        self.set_flag(InteractionFlags::PRESSED, pressed);
    }

    // =========================================================================
    // Hit testing support
    // =========================================================================

    /// Own bounds plus any overlay region drawn below them
    pub(crate) fn effective_bounds(&self, option_height: f32) -> Bounds {
        let state = self.inner.state.read();
        state
            .bounds
            .extend_bottom(state.kind.overlay_height(option_height))
    }

    /// Extended region of an open overlay, if this widget has one
    pub(crate) fn overlay_bounds(&self, option_height: f32) -> Option<Bounds> {
        let state = self.inner.state.read();
        let extra = state.kind.overlay_height(option_height);
        (extra > 0.0).then(|| state.bounds.extend_bottom(extra))
    }

    /// Run the custom hit test, if any, for a window-space point
    pub(crate) fn passes_custom_hit_test(&self, point: Point) -> bool {
        let (bounds, hit_test) = {
            let state = self.inner.state.read();
            (state.bounds, state.hit_test.clone())
        };
        match hit_test {
            Some(test) => test(bounds.local(point), bounds.size()),
            None => true,
        }
    }

    /// Point translated into this widget's content space (scroll offset applied)
    pub(crate) fn content_point(&self, point: Point) -> Point {
        match &self.inner.state.read().kind {
            WidgetKind::Scroll(s) => point.offset(s.offset.x, s.offset.y),
            _ => point,
        }
    }

    // =========================================================================
    // Event handlers
    // =========================================================================

    /// Register a handler for the target and bubble phases
    pub fn on<F>(&self, event_type: EventType, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.inner.handlers.write().on(event_type, handler);
    }

    /// Register a handler for the capture phase (and the target phase)
    pub fn on_capture<F>(&self, event_type: EventType, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.inner.handlers.write().on_capture(event_type, handler);
    }

    pub fn has_handler(&self, event_type: EventType) -> bool {
        self.inner.handlers.read().has_handler(event_type)
    }

    pub(crate) fn capture_handlers(&self, event_type: EventType) -> SmallVec<[EventCallback; 2]> {
        self.inner.handlers.read().capture_handlers(event_type)
    }

    pub(crate) fn bubble_handlers(&self, event_type: EventType) -> SmallVec<[EventCallback; 2]> {
        self.inner.handlers.read().bubble_handlers(event_type)
    }

    pub fn on_click<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::CLICK, handler);
    }

    pub fn on_double_click<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::DOUBLE_CLICK, handler);
    }

    pub fn on_triple_click<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::TRIPLE_CLICK, handler);
    }

    pub fn on_mouse_down<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::POINTER_DOWN, handler);
    }

    pub fn on_mouse_up<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::POINTER_UP, handler);
    }

    pub fn on_mouse_enter<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::POINTER_ENTER, handler);
    }

    pub fn on_mouse_leave<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::POINTER_LEAVE, handler);
    }

    pub fn on_focus<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::FOCUS, handler);
    }

    pub fn on_blur<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::BLUR, handler);
    }

    pub fn on_key_down<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::KEY_DOWN, handler);
    }

    pub fn on_key_up<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::KEY_UP, handler);
    }

    pub fn on_text_input<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::TEXT_INPUT, handler);
    }

    /// Wheel over this widget or a descendant; call
    /// [`EventContext::prevent_default`] to suppress default scrolling
    pub fn on_wheel<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::WHEEL, handler);
    }

    /// Scroll offset of this container changed
    pub fn on_scroll<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::SCROLL, handler);
    }

    /// Value changed through user interaction (text input, dropdown)
    pub fn on_change<F>(&self, handler: F)
    where
        F: Fn(&mut EventContext) + Send + Sync + 'static,
    {
        self.on(event_types::CHANGE, handler);
    }
}

/// Replace `slot` with `value`, returning `mask` if it changed
/// Value a style field should take: the new one, the default if the previous
/// style set it, or nothing
fn styled<T, P>(next: Option<T>, prev: Option<P>, base: T) -> Option<T> {
    next.or_else(|| prev.map(|_| base))
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T, mask: DirtyMask) -> DirtyMask {
    if *slot == value {
        DirtyMask::empty()
    } else {
        *slot = value;
        mask
    }
}
