//! Wheel and trackpad scrolling

use trellis_core::{event_types, Modifiers, Point};

use super::EventDispatcher;
use crate::event_handler::{propagate, EventContext};
use crate::scroll::scroll_by;

impl EventDispatcher {
    /// Handle a wheel event at a window position
    ///
    /// WHEEL goes to the hit target first. Unless a handler prevents the
    /// default, the nearest scroll container from the target upward scrolls
    /// by the delta. Shift with a purely vertical delta scrolls horizontally.
    pub fn dispatch_wheel(&mut self, x: f32, y: f32, dx: f32, dy: f32, modifiers: Modifiers) {
        self.prune();
        self.momentum.cancel();
        self.mouse = Point::new(x, y);

        let (dx, dy) = if modifiers.shift && dx == 0.0 {
            (dy, 0.0)
        } else {
            (dx, dy)
        };

        let Some(hit) = self.hit_test(x, y) else {
            return;
        };
        let mut ctx = EventContext::new(event_types::WHEEL)
            .at(self.mouse)
            .with_delta(dx, dy)
            .with_modifiers(modifiers);
        propagate(&hit.chain, &mut ctx);
        if ctx.is_default_prevented() {
            return;
        }

        let scale = self.config.wheel_line_height;
        if let Some(container) = hit.chain.iter().rev().find(|w| w.is_scrollable()) {
            scroll_by(container, dx * scale, dy * scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollAxis;
    use crate::testing::{EventLog, Fixture};
    use crate::widget::Widget;
    use trellis_core::{Bounds, Clock};

    #[test]
    fn test_wheel_scrolls_nearest_container() {
        let mut fx = Fixture::new();
        let (scroll, items) = fx.scroll_list(20, 50.0);
        let log = EventLog::new();
        log.watch(&items[0], &[event_types::WHEEL]);
        log.watch(&scroll, &[event_types::SCROLL]);

        fx.dispatcher.dispatch_wheel(10.0, 10.0, 0.0, 40.0, Modifiers::NONE);
        assert_eq!(scroll.scroll_offset(), Some(Point::new(0.0, 40.0)));
        assert_eq!(
            log.take(),
            vec![(items[0].id(), event_types::WHEEL), (scroll.id(), event_types::SCROLL)]
        );

        fx.dispatcher.dispatch_wheel(10.0, 10.0, 0.0, 10_000.0, Modifiers::NONE);
        assert_eq!(scroll.scroll_offset(), Some(Point::new(0.0, 800.0)));
        fx.close();
    }

    #[test]
    fn test_prevented_wheel_does_not_scroll() {
        let mut fx = Fixture::new();
        let (scroll, items) = fx.scroll_list(20, 50.0);
        items[0].on_wheel(|ctx| ctx.prevent_default());
        fx.dispatcher.dispatch_wheel(10.0, 10.0, 0.0, 40.0, Modifiers::NONE);
        assert_eq!(scroll.scroll_offset(), Some(Point::ZERO));
        fx.close();
    }

    #[test]
    fn test_shift_wheel_scrolls_horizontally() {
        let mut fx = Fixture::new();
        let strip = Widget::scroll(ScrollAxis::Horizontal)
            .with_bounds(Bounds::new(0.0, 0.0, 200.0, 50.0));
        for i in 0..10 {
            let x = i as f32 * 100.0;
            strip
                .add_child(&Widget::image("tile.png").with_bounds(Bounds::new(x, 0.0, 100.0, 50.0)))
                .unwrap();
        }
        fx.root.add_child(&strip).unwrap();

        fx.dispatcher.dispatch_wheel(10.0, 10.0, 0.0, 30.0, Modifiers::NONE);
        assert_eq!(strip.scroll_offset(), Some(Point::ZERO));
        fx.dispatcher.dispatch_wheel(10.0, 10.0, 0.0, 30.0, Modifiers::SHIFT);
        assert_eq!(strip.scroll_offset(), Some(Point::new(30.0, 0.0)));
        fx.close();
    }

    #[test]
    fn test_wheel_targets_innermost_container_only() {
        let mut fx = Fixture::new();
        let (outer, items) = fx.scroll_list(20, 50.0);
        let inner = Widget::scroll(ScrollAxis::Vertical)
            .with_bounds(Bounds::new(0.0, 0.0, 100.0, 50.0));
        inner
            .add_child(&Widget::text("short").with_bounds(Bounds::new(0.0, 0.0, 100.0, 20.0)))
            .unwrap();
        items[0].add_child(&inner).unwrap();

        fx.dispatcher.dispatch_wheel(10.0, 10.0, 0.0, 25.0, Modifiers::NONE);
        assert_eq!(inner.scroll_offset(), Some(Point::ZERO));
        assert_eq!(outer.scroll_offset(), Some(Point::ZERO));
        fx.close();
    }

    #[test]
    fn test_wheel_cancels_momentum() {
        let mut fx = Fixture::new();
        let (scroll, _) = fx.scroll_list(100, 50.0);
        fx.dispatcher
            .momentum
            .start(scroll, Point::new(0.0, 500.0), fx.clock.now());
        fx.dispatcher.dispatch_wheel(10.0, 10.0, 0.0, 5.0, Modifiers::NONE);
        assert!(!fx.dispatcher.is_momentum_active());
        fx.close();
    }
}
