//! Scroll containers
//!
//! A scroll container keeps its children's bounds in unscrolled layout space
//! and stores a separate offset. Hit testing adds the offset to the pointer
//! before descending; the renderer subtracts it when drawing.
//!
//! Scrolling never overshoots: offsets are clamped to
//! `[0, content - viewport]` on every enabled axis.

use trellis_core::{event_types, Point, Size};

use crate::event_handler::{dispatch_to, EventContext};
use crate::widget::Widget;

// ============================================================================
// Scroll State
// ============================================================================

/// Which axes a container scrolls along
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    #[default]
    Vertical,
    Horizontal,
    Both,
}

impl ScrollAxis {
    pub fn horizontal(self) -> bool {
        matches!(self, ScrollAxis::Horizontal | ScrollAxis::Both)
    }

    pub fn vertical(self) -> bool {
        matches!(self, ScrollAxis::Vertical | ScrollAxis::Both)
    }
}

/// Kind-specific state of a scroll container
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub axis: ScrollAxis,
    /// Current offset, positive when scrolled down / right
    pub offset: Point,
    /// Explicit content size; derived from children when `None`
    pub content_size: Option<Size>,
}

impl ScrollState {
    pub fn new(axis: ScrollAxis) -> Self {
        Self {
            axis,
            offset: Point::ZERO,
            content_size: None,
        }
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Viewport and content extents of a scroll container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub viewport: Size,
    pub content: Size,
}

impl ScrollMetrics {
    /// Largest offset on each axis
    pub fn max_offset(&self) -> Point {
        Point::new(
            (self.content.width - self.viewport.width).max(0.0),
            (self.content.height - self.viewport.height).max(0.0),
        )
    }

    /// Clamp `offset` into range, leaving disabled axes at zero
    pub fn clamp(&self, axis: ScrollAxis, offset: Point) -> Point {
        let max = self.max_offset();
        Point::new(
            if axis.horizontal() {
                offset.x.clamp(0.0, max.x)
            } else {
                0.0
            },
            if axis.vertical() {
                offset.y.clamp(0.0, max.y)
            } else {
                0.0
            },
        )
    }
}

/// Compute viewport and content size for a scroll container
///
/// The viewport is the container's bounds minus padding. Content is the
/// explicit override if set, otherwise the children's sizes summed along the
/// scroll axis (plus gaps) and maxed across it, plus padding.
pub fn scroll_metrics(widget: &Widget) -> Option<ScrollMetrics> {
    let state = widget.scroll_state()?;
    let props = widget.props();
    let bounds = widget.bounds();
    let padding = props.padding;

    let viewport = Size::new(
        (bounds.width - padding.horizontal()).max(0.0),
        (bounds.height - padding.vertical()).max(0.0),
    );

    let content = match state.content_size {
        Some(size) => size,
        None => {
            let children: Vec<Size> = widget
                .children()
                .iter()
                .filter(|c| c.is_visible())
                .map(|c| c.bounds().size())
                .collect();
            intrinsic_content(state.axis, &children, props.gap, padding.horizontal(), padding.vertical())
        }
    };

    Some(ScrollMetrics { viewport, content })
}

fn intrinsic_content(
    axis: ScrollAxis,
    children: &[Size],
    gap: f32,
    pad_x: f32,
    pad_y: f32,
) -> Size {
    if children.is_empty() {
        return Size::new(pad_x, pad_y);
    }
    let gaps = gap * (children.len() - 1) as f32;
    let sum_w: f32 = children.iter().map(|s| s.width).sum();
    let sum_h: f32 = children.iter().map(|s| s.height).sum();
    let max_w = children.iter().map(|s| s.width).fold(0.0, f32::max);
    let max_h = children.iter().map(|s| s.height).fold(0.0, f32::max);

    match axis {
        ScrollAxis::Vertical => Size::new(max_w + pad_x, sum_h + gaps + pad_y),
        ScrollAxis::Horizontal => Size::new(sum_w + gaps + pad_x, max_h + pad_y),
        // Two-axis content is laid out as a column
        ScrollAxis::Both => Size::new(max_w + pad_x, sum_h + gaps + pad_y),
    }
}

// ============================================================================
// Scrolling
// ============================================================================

/// Scroll by a delta, clamped to content
///
/// Returns whether the offset changed. A change fires SCROLL on the
/// container with the applied delta.
pub fn scroll_by(widget: &Widget, dx: f32, dy: f32) -> bool {
    let Some(current) = widget.scroll_offset() else {
        return false;
    };
    scroll_to(widget, Point::new(current.x + dx, current.y + dy))
}

/// Scroll to an absolute offset, clamped to content
pub fn scroll_to(widget: &Widget, offset: Point) -> bool {
    let (Some(state), Some(metrics)) = (widget.scroll_state(), scroll_metrics(widget)) else {
        return false;
    };
    let next = metrics.clamp(state.axis, offset);
    if next == state.offset {
        return false;
    }
    widget.set_scroll_offset(next);

    let mut ctx = EventContext::new(event_types::SCROLL)
        .with_delta(next.x - state.offset.x, next.y - state.offset.y);
    dispatch_to(widget, &mut ctx);
    true
}
