//! Pointer gesture bookkeeping
//!
//! Pure state kept between dispatch calls: hover path transitions,
//! click-vs-drag classification and multi-click counting. Nothing here fires
//! events; the dispatcher acts on what these return.

use std::time::{Duration, Instant};

use trellis_core::{MouseButton, Point};

use crate::widget::Widget;

// =============================================================================
// Hover
// =============================================================================

/// Enter/leave sets between two root → target paths
///
/// Leaves are ordered inner → outer, enters outer → inner. Widgets in the
/// shared prefix appear in neither.
pub(crate) fn hover_transition(old: &[Widget], new: &[Widget]) -> (Vec<Widget>, Vec<Widget>) {
    let shared = old
        .iter()
        .zip(new)
        .take_while(|(a, b)| a == b)
        .count();
    let leaves = old[shared..].iter().rev().cloned().collect();
    let enters = new[shared..].to_vec();
    (leaves, enters)
}

// =============================================================================
// Press / drag
// =============================================================================

/// State of a press from mouse down until mouse up
pub(crate) struct Press {
    pub(crate) target: Widget,
    pub(crate) chain: Vec<Widget>,
    pub(crate) button: MouseButton,
    pub(crate) origin: Point,
    pub(crate) started: Instant,
    pub(crate) last: Point,
    /// Nearest scrollable ancestor, until abandoned or dragging
    pub(crate) candidate: Option<Widget>,
    pub(crate) dragging: bool,
}

/// What a pointer move means for the current press
#[derive(Debug)]
pub(crate) enum DragStep {
    /// Still a potential click
    Pending,
    /// Threshold crossed with a scrollable candidate; `delta` is the whole
    /// displacement since the press
    Start { target: Widget, delta: Point },
    /// Already dragging; apply this delta
    Continue { target: Widget, delta: Point },
}

impl Press {
    pub(crate) fn new(
        target: Widget,
        chain: Vec<Widget>,
        button: MouseButton,
        origin: Point,
        started: Instant,
    ) -> Self {
        let candidate = chain.iter().rev().find(|w| w.is_scrollable()).cloned();
        Self {
            target,
            chain,
            button,
            origin,
            started,
            last: origin,
            candidate,
            dragging: false,
        }
    }

    /// Classify a move and advance the last position
    ///
    /// Deltas are in scroll direction: dragging content up scrolls down. The
    /// step that crosses the threshold carries everything moved since the
    /// press so content lines up with the pointer from then on.
    pub(crate) fn on_move(&mut self, position: Point, threshold: f32) -> DragStep {
        let delta = Point::new(self.last.x - position.x, self.last.y - position.y);
        self.last = position;

        let Some(candidate) = &self.candidate else {
            return DragStep::Pending;
        };
        if self.dragging {
            return DragStep::Continue {
                target: candidate.clone(),
                delta,
            };
        }
        if self.origin.distance_squared(position) > threshold * threshold {
            return DragStep::Start {
                target: candidate.clone(),
                delta: Point::new(self.origin.x - position.x, self.origin.y - position.y),
            };
        }
        DragStep::Pending
    }

    /// The first drag scroll had no effect; this press can only be a click
    pub(crate) fn abandon_candidate(&mut self) {
        self.candidate = None;
    }

    pub(crate) fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// The widget being drag-scrolled, if a drag is active
    pub(crate) fn drag_target(&self) -> Option<&Widget> {
        self.candidate.as_ref().filter(|_| self.dragging)
    }

    /// Release velocity in scroll direction, px/s
    ///
    /// Total displacement over total press time; zero when the press was held
    /// longer than `stale` or no time elapsed.
    pub(crate) fn release_velocity(&self, position: Point, now: Instant, stale: Duration) -> Point {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed > stale || elapsed.is_zero() {
            return Point::ZERO;
        }
        let secs = elapsed.as_secs_f32();
        Point::new(
            (self.origin.x - position.x) / secs,
            (self.origin.y - position.y) / secs,
        )
    }
}

// =============================================================================
// Multi-click
// =============================================================================

/// Counts consecutive clicks close in time and space
///
/// Counts run 1, 2, 3 and then start over, so a fourth click is a fresh
/// single click.
#[derive(Debug, Default)]
pub(crate) struct ClickTracker {
    last: Option<(Instant, Point)>,
    count: u32,
}

impl ClickTracker {
    /// Register a click and return its count
    pub(crate) fn register(
        &mut self,
        now: Instant,
        position: Point,
        interval: Duration,
        distance: f32,
    ) -> u32 {
        let continues = self.count > 0
            && self.last.is_some_and(|(at, pos)| {
                now.saturating_duration_since(at) <= interval
                    && pos.distance_squared(position) <= distance * distance
            });
        self.count = if continues { self.count + 1 } else { 1 };
        self.last = Some((now, position));

        let count = self.count;
        if count >= 3 {
            self.count = 0;
        }
        count
    }

    pub(crate) fn reset(&mut self) {
        self.count = 0;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollAxis;

    const INTERVAL: Duration = Duration::from_millis(500);

    #[test]
    fn test_hover_transition_shared_ancestor() {
        let p = Widget::container();
        let c = Widget::container();
        let (leaves, enters) = hover_transition(&[p.clone()], &[p.clone(), c.clone()]);
        assert!(leaves.is_empty());
        assert_eq!(enters, vec![c]);
    }

    #[test]
    fn test_hover_transition_ordering() {
        let root = Widget::container();
        let a = Widget::container();
        let a1 = Widget::container();
        let b = Widget::container();
        let b1 = Widget::container();
        let (leaves, enters) = hover_transition(
            &[root.clone(), a.clone(), a1.clone()],
            &[root, b.clone(), b1.clone()],
        );
        assert_eq!(leaves, vec![a1, a]);
        assert_eq!(enters, vec![b, b1]);
    }

    #[test]
    fn test_click_counts_cycle() {
        let mut clicks = ClickTracker::default();
        let t0 = Instant::now();
        let at = Point::new(10.0, 10.0);
        let step = Duration::from_millis(100);
        assert_eq!(clicks.register(t0, at, INTERVAL, 5.0), 1);
        assert_eq!(clicks.register(t0 + step, at, INTERVAL, 5.0), 2);
        assert_eq!(clicks.register(t0 + step * 2, at, INTERVAL, 5.0), 3);
        assert_eq!(clicks.register(t0 + step * 3, at, INTERVAL, 5.0), 1);
        assert_eq!(clicks.register(t0 + step * 4, at, INTERVAL, 5.0), 2);
    }

    #[test]
    fn test_click_count_resets_on_time_or_distance() {
        let mut clicks = ClickTracker::default();
        let t0 = Instant::now();
        let at = Point::new(10.0, 10.0);
        assert_eq!(clicks.register(t0, at, INTERVAL, 5.0), 1);
        assert_eq!(clicks.register(t0 + Duration::from_millis(600), at, INTERVAL, 5.0), 1);
        let far = Point::new(20.0, 10.0);
        assert_eq!(clicks.register(t0 + Duration::from_millis(700), far, INTERVAL, 5.0), 1);
        clicks.reset();
        assert_eq!(clicks.register(t0 + Duration::from_millis(750), far, INTERVAL, 5.0), 1);
    }

    #[test]
    fn test_press_without_scrollable_never_drags() {
        let t0 = Instant::now();
        let button = Widget::button("b");
        let mut press = Press::new(
            button.clone(),
            vec![Widget::container(), button],
            MouseButton::Left,
            Point::ZERO,
            t0,
        );
        assert!(matches!(press.on_move(Point::new(0.0, 50.0), 10.0), DragStep::Pending));
    }

    #[test]
    fn test_drag_start_carries_displacement_since_press() {
        let t0 = Instant::now();
        let scroll = Widget::scroll(ScrollAxis::Vertical);
        let item = Widget::text("item");
        let mut press = Press::new(
            item.clone(),
            vec![scroll.clone(), item],
            MouseButton::Left,
            Point::new(50.0, 100.0),
            t0,
        );
        assert!(matches!(press.on_move(Point::new(50.0, 95.0), 10.0), DragStep::Pending));
        match press.on_move(Point::new(50.0, 85.0), 10.0) {
            DragStep::Start { target, delta } => {
                assert_eq!(target, scroll);
                assert_eq!(delta, Point::new(0.0, 15.0));
            }
            other => panic!("expected drag start, got {other:?}"),
        }
        press.begin_drag();
        assert_eq!(press.drag_target(), Some(&scroll));
        match press.on_move(Point::new(50.0, 80.0), 10.0) {
            DragStep::Continue { delta, .. } => assert_eq!(delta, Point::new(0.0, 5.0)),
            other => panic!("expected drag continue, got {other:?}"),
        }
    }

    #[test]
    fn test_release_velocity() {
        let t0 = Instant::now();
        let press = Press::new(
            Widget::container(),
            Vec::new(),
            MouseButton::Left,
            Point::new(0.0, 200.0),
            t0,
        );
        let v = press.release_velocity(
            Point::new(0.0, 100.0),
            t0 + Duration::from_millis(100),
            Duration::from_millis(300),
        );
        assert!((v.y - 1000.0).abs() < 0.5);
        assert_eq!(v.x, 0.0);

        let stale = press.release_velocity(
            Point::new(0.0, 100.0),
            t0 + Duration::from_millis(400),
            Duration::from_millis(300),
        );
        assert_eq!(stale, Point::ZERO);
    }
}
