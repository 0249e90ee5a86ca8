//! Hit testing
//!
//! Two passes over the tree:
//!
//! 1. **Overlay pass**: open overlays (dropdown lists) draw outside their own
//!    layout box and over whatever sits below, so their extended region is
//!    checked first, without ancestor bounds cutting the walk short.
//! 2. **Normal pass**: depth first, children in reverse order (last drawn is
//!    on top), skipping subtrees whose effective bounds miss the point.
//!
//! Scroll containers translate the point by their offset before descending,
//! since children's bounds are in unscrolled layout space.

use trellis_core::Point;

use super::EventDispatcher;
use crate::widget::Widget;

/// Result of a hit test
#[derive(Clone, Debug, PartialEq)]
pub struct HitResult {
    /// Topmost widget under the point
    pub target: Widget,
    /// Point relative to the target's bounds
    pub local: Point,
    /// Root → target
    pub chain: Vec<Widget>,
}

impl EventDispatcher {
    /// Find the topmost widget under a window-space point
    pub fn hit_test(&self, x: f32, y: f32) -> Option<HitResult> {
        let root = self.tree.root()?;
        let point = Point::new(x, y);
        let option_height = self.config.dropdown_option_height;

        let _structure = self.tree.structure_read();
        let mut chain = Vec::new();
        if let Some(hit) = overlay_hit(&root, point, option_height, &mut chain) {
            return Some(hit);
        }
        chain.clear();
        normal_hit(&root, point, option_height, &mut chain)
    }
}

fn overlay_hit(
    widget: &Widget,
    point: Point,
    option_height: f32,
    chain: &mut Vec<Widget>,
) -> Option<HitResult> {
    if !widget.can_receive_events() {
        return None;
    }
    chain.push(widget.clone());

    let inner = widget.content_point(point);
    for child in widget.children().iter().rev() {
        if let Some(hit) = overlay_hit(child, inner, option_height, chain) {
            return Some(hit);
        }
    }

    if let Some(region) = widget.overlay_bounds(option_height) {
        if region.contains(point) {
            return Some(HitResult {
                target: widget.clone(),
                local: widget.bounds().local(point),
                chain: chain.clone(),
            });
        }
    }

    chain.pop();
    None
}

fn normal_hit(
    widget: &Widget,
    point: Point,
    option_height: f32,
    chain: &mut Vec<Widget>,
) -> Option<HitResult> {
    if !widget.can_receive_events() || !widget.effective_bounds(option_height).contains(point) {
        return None;
    }
    chain.push(widget.clone());

    let inner = widget.content_point(point);
    for child in widget.children().iter().rev() {
        if let Some(hit) = normal_hit(child, inner, option_height, chain) {
            return Some(hit);
        }
    }

    if widget.passes_custom_hit_test(point) {
        return Some(HitResult {
            target: widget.clone(),
            local: widget.bounds().local(point),
            chain: chain.clone(),
        });
    }

    chain.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollAxis;
    use crate::testing::{small_tree, Fixture};
    use trellis_core::Bounds;

    #[test]
    fn test_topmost_child_wins() {
        let fx = Fixture::new();
        let under = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let over = fx.child(Bounds::new(50.0, 50.0, 100.0, 100.0));

        let hit = fx.dispatcher.hit_test(75.0, 75.0).unwrap();
        assert_eq!(hit.target, over);
        assert_eq!(hit.chain, vec![fx.root.clone(), over.clone()]);
        assert_eq!(hit.local, Point::new(25.0, 25.0));

        assert_eq!(fx.dispatcher.hit_test(25.0, 25.0).unwrap().target, under);
        assert_eq!(fx.dispatcher.hit_test(500.0, 5.0), None);
        fx.close();
    }

    #[test]
    fn test_hit_test_is_idempotent() {
        let fx = Fixture::new();
        let parent = fx.child(Bounds::new(0.0, 0.0, 200.0, 200.0));
        parent
            .add_child(&Widget::button("b").with_bounds(Bounds::new(10.0, 10.0, 50.0, 50.0)))
            .unwrap();

        let first = fx.dispatcher.hit_test(20.0, 20.0);
        let second = fx.dispatcher.hit_test(20.0, 20.0);
        assert!(first.is_some());
        assert_eq!(first, second);
        fx.close();
    }

    #[test]
    fn test_disabled_subtree_is_skipped() {
        let fx = Fixture::new();
        let panel = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let button = Widget::button("b").with_bounds(Bounds::new(10.0, 10.0, 20.0, 20.0));
        panel.add_child(&button).unwrap();

        panel.set_disabled(true);
        assert_eq!(fx.dispatcher.hit_test(15.0, 15.0).unwrap().target, fx.root);

        panel.set_disabled(false);
        panel.set_pointer_events(false);
        assert_eq!(fx.dispatcher.hit_test(15.0, 15.0).unwrap().target, fx.root);
        fx.close();
    }

    #[test]
    fn test_custom_hit_test_excludes_corners() {
        let fx = Fixture::new();
        let round = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        round.set_hit_test(|local, size| {
            let r = size.width / 2.0;
            let dx = local.x - r;
            let dy = local.y - r;
            dx * dx + dy * dy <= r * r
        });
        assert_eq!(fx.dispatcher.hit_test(50.0, 50.0).unwrap().target, round);
        assert_eq!(fx.dispatcher.hit_test(2.0, 2.0).unwrap().target, fx.root);
        fx.close();
    }

    #[test]
    fn test_scroll_offset_translates_children() {
        let fx = Fixture::new();
        let scroll = Widget::scroll(ScrollAxis::Vertical)
            .with_bounds(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let items: Vec<_> = (0..10)
            .map(|i| Widget::text("row").with_bounds(Bounds::new(0.0, i as f32 * 50.0, 100.0, 50.0)))
            .collect();
        for item in &items {
            scroll.add_child(item).unwrap();
        }
        fx.root.add_child(&scroll).unwrap();

        assert_eq!(fx.dispatcher.hit_test(10.0, 10.0).unwrap().target, items[0]);
        scroll.set_scroll_offset(Point::new(0.0, 120.0));
        let hit = fx.dispatcher.hit_test(10.0, 10.0).unwrap();
        assert_eq!(hit.target, items[2]);
        assert_eq!(hit.local, Point::new(10.0, 30.0));
        fx.close();
    }

    #[test]
    fn test_open_dropdown_overlay_wins_over_later_sibling() {
        let fx = Fixture::new();
        let dropdown = Widget::dropdown(["a", "b", "c"]);
        dropdown.set_computed_bounds(Bounds::new(0.0, 0.0, 100.0, 32.0));
        let holder = fx.child(Bounds::new(0.0, 0.0, 100.0, 32.0));
        holder.add_child(&dropdown).unwrap();
        let below = fx.child(Bounds::new(0.0, 40.0, 100.0, 100.0));

        assert_eq!(fx.dispatcher.hit_test(10.0, 50.0).unwrap().target, below);

        dropdown.set_dropdown_open(true);
        let hit = fx.dispatcher.hit_test(10.0, 50.0).unwrap();
        assert_eq!(hit.target, dropdown);
        assert_eq!(hit.chain, vec![fx.root.clone(), holder, dropdown.clone()]);
        assert_eq!(hit.local, Point::new(10.0, 50.0));

        // Past the last option
        assert_eq!(fx.dispatcher.hit_test(10.0, 130.0).unwrap().target, below);
        fx.close();
    }

    #[test]
    fn test_empty_tree() {
        let tree = small_tree();
        let dispatcher = EventDispatcher::new(&tree);
        assert!(dispatcher.hit_test(0.0, 0.0).is_none());
        tree.close();
    }
}
