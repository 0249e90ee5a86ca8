//! Pointer input: press, move, release, leave
//!
//! The gesture machine has four implicit states:
//!
//! - **idle**: no press; moves update hover
//! - **pressed**: button down, not yet a click or a drag
//! - **dragging**: the press moved past the drag threshold and scrolled its
//!   nearest scrollable ancestor; hover is frozen until release
//! - **momentum**: after a fast drag release, stepped by the frame loop

use trellis_core::{event_types, EventType, MouseButton, Point};

use super::gesture::{hover_transition, DragStep, Press};
use super::hit_test::HitResult;
use super::EventDispatcher;
use crate::event_handler::{dispatch_to, propagate, EventContext};
use crate::scroll::scroll_by;
use crate::widget::Widget;

impl EventDispatcher {
    // =========================================================================
    // Mouse Events
    // =========================================================================

    /// Handle a button press
    ///
    /// Cancels momentum, drops any press still held by another button, closes
    /// dropdowns the press lands outside of, marks
    /// the whole hit chain pressed, moves focus to the deepest focusable
    /// widget in the chain (or clears it) and dispatches POINTER_DOWN.
    pub fn dispatch_mouse_down(&mut self, x: f32, y: f32, button: MouseButton) {
        self.prune();
        self.momentum.cancel();
        // A second button replaces the press in progress
        self.release_press();
        let position = Point::new(x, y);
        self.mouse = position;

        let hit = self.hit_test(x, y);
        self.close_dropdowns_outside(hit.as_ref().map_or(&[][..], |h| h.chain.as_slice()));

        let Some(hit) = hit else {
            self.press = None;
            self.set_focus(None);
            return;
        };

        for widget in &hit.chain {
            widget.set_pressed(true);
        }
        // Focus on press so a software keyboard can be raised from inside the
        // press event
        let focus_target = hit.chain.iter().rev().find(|w| w.is_focusable()).cloned();
        self.set_focus(focus_target);

        self.press = Some(Press::new(
            hit.target.clone(),
            hit.chain.clone(),
            button,
            position,
            self.clock.now(),
        ));
        self.dispatch_pointer(event_types::POINTER_DOWN, &hit, Some(button), 0);
    }

    /// Handle pointer motion
    ///
    /// While a press is active this may start or continue a drag scroll.
    /// Otherwise it recomputes the hover chain and dispatches POINTER_MOVE.
    pub fn dispatch_mouse_move(&mut self, x: f32, y: f32) {
        self.prune();
        let position = Point::new(x, y);
        self.mouse = position;

        let threshold = self.config.drag_threshold;
        let step = self.press.as_mut().map(|p| p.on_move(position, threshold));
        match step {
            Some(DragStep::Continue { target, delta }) => {
                scroll_by(&target, delta.x, delta.y);
                return;
            }
            Some(DragStep::Start { target, delta }) => {
                if scroll_by(&target, delta.x, delta.y) {
                    self.begin_drag(&target);
                    return;
                }
                if let Some(press) = self.press.as_mut() {
                    press.abandon_candidate();
                }
            }
            Some(DragStep::Pending) | None => {}
        }

        let hit = self.hit_test(x, y);
        self.update_hover(hit.as_ref().map(|h| h.chain.clone()).unwrap_or_default());
        if let Some(hit) = hit {
            self.dispatch_pointer(event_types::POINTER_MOVE, &hit, None, 0);
        }
    }

    /// Handle a button release
    ///
    /// POINTER_UP goes to the widget under the pointer. A release that ends a
    /// drag may start momentum and never clicks; otherwise a release on the
    /// press target with the press button is a click, possibly a double or
    /// triple click.
    pub fn dispatch_mouse_up(&mut self, x: f32, y: f32, button: MouseButton) {
        self.prune();
        let position = Point::new(x, y);
        self.mouse = position;
        let now = self.clock.now();

        let hit = self.hit_test(x, y);
        let press = self.press.take();
        if let Some(press) = &press {
            for widget in &press.chain {
                widget.set_pressed(false);
            }
        }
        if let Some(hit) = &hit {
            self.dispatch_pointer(event_types::POINTER_UP, hit, Some(button), 0);
        }

        let Some(press) = press else {
            return;
        };

        if let Some(target) = press.drag_target() {
            let velocity = press.release_velocity(position, now, self.config.velocity_stale());
            let min = self.config.momentum_min_velocity;
            if velocity.distance_squared(Point::ZERO) >= min * min {
                self.momentum.start(target.clone(), velocity, now);
            }
            self.update_hover(hit.map(|h| h.chain).unwrap_or_default());
            return;
        }

        let Some(hit) = hit else {
            return;
        };
        if hit.target != press.target || button != press.button {
            return;
        }

        let count = self.clicks.register(
            now,
            position,
            self.config.multi_click_interval(),
            self.config.multi_click_distance,
        );
        let click = self.dispatch_pointer(event_types::CLICK, &hit, Some(button), count);
        match count {
            2 => {
                self.dispatch_pointer(event_types::DOUBLE_CLICK, &hit, Some(button), count);
            }
            c if c >= 3 => {
                self.dispatch_pointer(event_types::TRIPLE_CLICK, &hit, Some(button), count);
            }
            _ => {}
        }

        if !click.is_default_prevented() {
            self.dropdown_click(&hit);
        }
    }

    /// Handle the pointer leaving the window
    pub fn dispatch_mouse_leave(&mut self) {
        self.prune();
        if self.is_dragging() {
            return;
        }
        self.update_hover(Vec::new());
    }

    // =========================================================================
    // Touch Events
    // =========================================================================

    pub fn dispatch_touch_start(&mut self, x: f32, y: f32) {
        self.dispatch_mouse_down(x, y, MouseButton::Left);
    }

    pub fn dispatch_touch_move(&mut self, x: f32, y: f32) {
        self.dispatch_mouse_move(x, y);
    }

    /// Touch release; a touch has no hover, so the hover chain is cleared
    pub fn dispatch_touch_end(&mut self, x: f32, y: f32) {
        self.dispatch_mouse_up(x, y, MouseButton::Left);
        self.update_hover(Vec::new());
    }

    /// Touch taken over by the system: release without clicking
    pub fn dispatch_touch_cancel(&mut self) {
        self.prune();
        self.release_press();
        self.update_hover(Vec::new());
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Forget the current press and clear its pressed flags
    fn release_press(&mut self) {
        if let Some(press) = self.press.take() {
            for widget in &press.chain {
                widget.set_pressed(false);
            }
        }
    }

    fn begin_drag(&mut self, target: &Widget) {
        tracing::debug!(target = %target.id(), "drag scroll started");
        if let Some(press) = self.press.as_mut() {
            press.begin_drag();
            for widget in &press.chain {
                widget.set_pressed(false);
            }
        }
        self.clicks.reset();
        // Scrolling dismisses editing
        self.set_focus(None);
    }

    /// Move hover to `new_chain`, firing leave and enter only for widgets
    /// outside the shared ancestry
    pub(crate) fn update_hover(&mut self, new_chain: Vec<Widget>) {
        let (leaves, enters) = hover_transition(&self.hover_chain, &new_chain);
        self.hover_chain = new_chain;

        let position = self.mouse;
        for widget in leaves {
            widget.set_hovered(false);
            dispatch_to(&widget, &mut EventContext::new(event_types::POINTER_LEAVE).at(position));
        }
        for widget in enters {
            widget.set_hovered(true);
            dispatch_to(&widget, &mut EventContext::new(event_types::POINTER_ENTER).at(position));
        }
    }

    fn dispatch_pointer(
        &self,
        event_type: EventType,
        hit: &HitResult,
        button: Option<MouseButton>,
        click_count: u32,
    ) -> EventContext {
        let mut ctx = EventContext::new(event_type)
            .at(self.mouse)
            .with_click_count(click_count);
        ctx.button = button;
        propagate(&hit.chain, &mut ctx);
        ctx
    }

    // =========================================================================
    // Dropdown default actions
    // =========================================================================

    fn close_dropdowns_outside(&self, chain: &[Widget]) {
        for widget in self.tree.widgets() {
            let open = widget.dropdown_state().is_some_and(|d| d.open);
            if open && !chain.contains(&widget) {
                widget.set_dropdown_open(false);
            }
        }
    }

    /// Toggle a clicked dropdown, or select the option under the pointer in
    /// its open list
    fn dropdown_click(&self, hit: &HitResult) {
        let target = &hit.target;
        let Some(state) = target.dropdown_state() else {
            return;
        };
        let height = target.bounds().height;

        if state.open && hit.local.y >= height {
            let list_y = hit.local.y - height;
            if let Some(index) = state.option_at(list_y, self.config.dropdown_option_height) {
                target.set_selected(Some(index));
                target.set_dropdown_open(false);
                if state.selected != Some(index) {
                    let mut ctx = EventContext::new(event_types::CHANGE).at(self.mouse);
                    propagate(&hit.chain, &mut ctx);
                }
            }
            return;
        }
        target.set_dropdown_open(!state.open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollAxis;
    use crate::testing::{EventLog, Fixture};
    use std::time::Duration;
    use trellis_core::Bounds;

    const LEFT: MouseButton = MouseButton::Left;

    fn click(fx: &mut Fixture, x: f32, y: f32) {
        fx.dispatcher.dispatch_mouse_down(x, y, LEFT);
        fx.dispatcher.dispatch_mouse_up(x, y, LEFT);
    }

    #[test]
    fn test_move_into_child_fires_single_enter() {
        let mut fx = Fixture::new();
        let parent = fx.child(Bounds::new(0.0, 0.0, 200.0, 200.0));
        let child = Widget::container().with_bounds(Bounds::new(100.0, 100.0, 50.0, 50.0));
        parent.add_child(&child).unwrap();

        fx.dispatcher.dispatch_mouse_move(20.0, 20.0);
        assert!(parent.is_hovered());

        let log = EventLog::new();
        log.watch(&parent, &[event_types::POINTER_ENTER, event_types::POINTER_LEAVE]);
        log.watch(&child, &[event_types::POINTER_ENTER, event_types::POINTER_LEAVE]);

        fx.dispatcher.dispatch_mouse_move(120.0, 120.0);
        assert_eq!(log.take(), vec![(child.id(), event_types::POINTER_ENTER)]);
        assert!(parent.is_hovered());
        assert!(child.is_hovered());
        assert_eq!(fx.dispatcher.hovered(), Some(&child));
        fx.close();
    }

    #[test]
    fn test_leave_inner_to_outer_enter_outer_to_inner() {
        let mut fx = Fixture::new();
        let a = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let a1 = Widget::container().with_bounds(Bounds::new(0.0, 0.0, 50.0, 50.0));
        a.add_child(&a1).unwrap();
        let b = fx.child(Bounds::new(200.0, 0.0, 100.0, 100.0));
        let b1 = Widget::container().with_bounds(Bounds::new(200.0, 0.0, 50.0, 50.0));
        b.add_child(&b1).unwrap();

        fx.dispatcher.dispatch_mouse_move(10.0, 10.0);
        let log = EventLog::new();
        for w in [&a, &a1, &b, &b1] {
            log.watch(w, &[event_types::POINTER_ENTER, event_types::POINTER_LEAVE]);
        }
        fx.dispatcher.dispatch_mouse_move(210.0, 10.0);
        assert_eq!(
            log.take(),
            vec![
                (a1.id(), event_types::POINTER_LEAVE),
                (a.id(), event_types::POINTER_LEAVE),
                (b.id(), event_types::POINTER_ENTER),
                (b1.id(), event_types::POINTER_ENTER),
            ]
        );
        fx.close();
    }

    #[test]
    fn test_mouse_leave_clears_hover() {
        let mut fx = Fixture::new();
        let panel = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        fx.dispatcher.dispatch_mouse_move(10.0, 10.0);
        assert!(panel.is_hovered());
        fx.dispatcher.dispatch_mouse_leave();
        assert!(!panel.is_hovered());
        assert!(!fx.root.is_hovered());
        assert!(fx.dispatcher.hover_chain().is_empty());
        fx.close();
    }

    #[test]
    fn test_press_within_threshold_clicks_once() {
        let mut fx = Fixture::new();
        let button = Widget::button("b").with_bounds(Bounds::new(10.0, 10.0, 100.0, 40.0));
        fx.root.add_child(&button).unwrap();
        let log = EventLog::new();
        log.watch(&button, &[event_types::CLICK]);

        fx.dispatcher.dispatch_mouse_down(50.0, 30.0, LEFT);
        assert!(button.is_pressed());
        assert!(fx.root.is_pressed());
        fx.dispatcher.dispatch_mouse_move(53.0, 34.0);
        fx.dispatcher.dispatch_mouse_move(50.0, 30.0);
        fx.dispatcher.dispatch_mouse_up(50.0, 30.0, LEFT);

        assert_eq!(log.take(), vec![(button.id(), event_types::CLICK)]);
        assert!(!button.is_pressed());
        assert!(!fx.root.is_pressed());
        fx.close();
    }

    #[test]
    fn test_drag_past_threshold_scrolls_without_click() {
        let mut fx = Fixture::new();
        let (scroll, items) = fx.scroll_list(20, 50.0);
        let log = EventLog::new();
        log.watch(&items[1], &[event_types::CLICK, event_types::POINTER_UP]);

        fx.dispatcher.dispatch_mouse_down(50.0, 60.0, LEFT);
        fx.dispatcher.dispatch_mouse_move(50.0, 45.0);
        assert!(fx.dispatcher.is_dragging());
        assert_eq!(scroll.scroll_offset(), Some(Point::new(0.0, 15.0)));
        assert!(!items[1].is_pressed());

        fx.dispatcher.dispatch_mouse_move(50.0, 30.0);
        assert_eq!(scroll.scroll_offset(), Some(Point::new(0.0, 30.0)));

        fx.clock.advance(Duration::from_millis(400));
        fx.dispatcher.dispatch_mouse_up(50.0, 30.0, LEFT);
        assert!(!fx.dispatcher.is_dragging());
        assert!(!fx.dispatcher.is_momentum_active());
        let events = log.take();
        assert!(!events.iter().any(|(_, t)| *t == event_types::CLICK));
        fx.close();
    }

    #[test]
    fn test_drag_start_keeps_movement_below_threshold() {
        let mut fx = Fixture::new();
        let (scroll, _) = fx.scroll_list(20, 50.0);

        fx.dispatcher.dispatch_mouse_down(50.0, 60.0, LEFT);
        fx.dispatcher.dispatch_mouse_move(50.0, 52.0);
        assert!(!fx.dispatcher.is_dragging());
        assert_eq!(scroll.scroll_offset(), Some(Point::ZERO));

        fx.dispatcher.dispatch_mouse_move(50.0, 45.0);
        assert!(fx.dispatcher.is_dragging());
        assert_eq!(scroll.scroll_offset(), Some(Point::new(0.0, 15.0)));

        fx.dispatcher.dispatch_mouse_move(50.0, 40.0);
        assert_eq!(scroll.scroll_offset(), Some(Point::new(0.0, 20.0)));
        fx.close();
    }

    #[test]
    fn test_second_button_press_releases_first_chain() {
        let mut fx = Fixture::new();
        let a = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let b = fx.child(Bounds::new(200.0, 0.0, 100.0, 100.0));

        fx.dispatcher.dispatch_mouse_down(50.0, 50.0, LEFT);
        assert!(a.is_pressed());
        fx.dispatcher.dispatch_mouse_down(250.0, 50.0, MouseButton::Right);
        assert!(!a.is_pressed());
        assert!(b.is_pressed());
        fx.dispatcher.dispatch_mouse_up(250.0, 50.0, MouseButton::Right);
        fx.dispatcher.dispatch_mouse_up(50.0, 50.0, LEFT);
        assert!(!a.is_pressed());
        assert!(!b.is_pressed());
        assert!(!fx.root.is_pressed());

        let c = fx.child(Bounds::new(400.0, 0.0, 100.0, 100.0));
        fx.dispatcher.dispatch_mouse_down(450.0, 50.0, LEFT);
        fx.dispatcher.dispatch_mouse_down(5000.0, 5000.0, MouseButton::Right);
        fx.dispatcher.dispatch_mouse_up(5000.0, 5000.0, MouseButton::Right);
        assert!(!c.is_pressed());
        assert!(!fx.root.is_pressed());
        fx.close();
    }

    #[test]
    fn test_drag_on_content_that_fits_abandons_and_clicks() {
        let mut fx = Fixture::new();
        let (scroll, items) = fx.scroll_list(2, 50.0);
        let log = EventLog::new();
        log.watch(&items[0], &[event_types::CLICK]);

        fx.dispatcher.dispatch_mouse_down(50.0, 40.0, LEFT);
        fx.dispatcher.dispatch_mouse_move(50.0, 20.0);
        assert!(!fx.dispatcher.is_dragging());
        assert_eq!(scroll.scroll_offset(), Some(Point::ZERO));
        fx.dispatcher.dispatch_mouse_up(50.0, 20.0, LEFT);
        assert_eq!(log.take(), vec![(items[0].id(), event_types::CLICK)]);
        fx.close();
    }

    #[test]
    fn test_dragging_freezes_hover_and_blurs() {
        let mut fx = Fixture::new();
        let (_scroll, items) = fx.scroll_list(20, 50.0);
        let input = Widget::text_input("name").with_bounds(Bounds::new(0.0, 0.0, 100.0, 40.0));
        items[0].add_child(&input).unwrap();

        fx.dispatcher.dispatch_mouse_down(10.0, 10.0, LEFT);
        assert_eq!(fx.dispatcher.focused(), Some(&input));
        fx.dispatcher.dispatch_mouse_move(10.0, -20.0);
        assert!(fx.dispatcher.is_dragging());
        assert_eq!(fx.dispatcher.focused(), None);

        let chain_before = fx.dispatcher.hover_chain().to_vec();
        fx.dispatcher.dispatch_mouse_move(10.0, -60.0);
        assert_eq!(fx.dispatcher.hover_chain(), chain_before.as_slice());
        fx.close();
    }

    #[test]
    fn test_fast_release_starts_momentum() {
        let mut fx = Fixture::new();
        let (scroll, _) = fx.scroll_list(100, 50.0);

        fx.dispatcher.dispatch_mouse_down(50.0, 180.0, LEFT);
        fx.clock.advance(Duration::from_millis(50));
        fx.dispatcher.dispatch_mouse_move(50.0, 100.0);
        fx.clock.advance(Duration::from_millis(50));
        fx.dispatcher.dispatch_mouse_up(50.0, 80.0, LEFT);
        assert!(fx.dispatcher.is_momentum_active());
        assert_eq!(fx.dispatcher.momentum_target(), Some(&scroll));

        let before = scroll.scroll_offset().unwrap().y;
        fx.clock.advance(Duration::from_millis(16));
        assert!(fx.dispatcher.step_momentum());
        assert!(scroll.scroll_offset().unwrap().y > before);

        fx.dispatcher.dispatch_mouse_down(50.0, 50.0, LEFT);
        assert!(!fx.dispatcher.is_momentum_active());
        fx.close();
    }

    #[test]
    fn test_multi_click_sequence() {
        let mut fx = Fixture::new();
        let target = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let log = EventLog::new();
        log.watch(
            &target,
            &[event_types::CLICK, event_types::DOUBLE_CLICK, event_types::TRIPLE_CLICK],
        );

        for _ in 0..4 {
            click(&mut fx, 50.0, 50.0);
            fx.clock.advance(Duration::from_millis(100));
        }

        let id = target.id();
        assert_eq!(
            log.take(),
            vec![
                (id, event_types::CLICK),
                (id, event_types::CLICK),
                (id, event_types::DOUBLE_CLICK),
                (id, event_types::CLICK),
                (id, event_types::TRIPLE_CLICK),
                (id, event_types::CLICK),
            ]
        );
        fx.close();
    }

    #[test]
    fn test_slow_second_click_is_single() {
        let mut fx = Fixture::new();
        let target = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let log = EventLog::new();
        log.watch(&target, &[event_types::DOUBLE_CLICK]);
        click(&mut fx, 50.0, 50.0);
        fx.clock.advance(Duration::from_millis(800));
        click(&mut fx, 50.0, 50.0);
        assert!(log.take().is_empty());
        fx.close();
    }

    #[test]
    fn test_release_elsewhere_is_not_a_click() {
        let mut fx = Fixture::new();
        let a = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let b = fx.child(Bounds::new(100.0, 0.0, 100.0, 100.0));
        let log = EventLog::new();
        log.watch(&a, &[event_types::CLICK, event_types::POINTER_UP]);
        log.watch(&b, &[event_types::CLICK, event_types::POINTER_UP]);

        fx.dispatcher.dispatch_mouse_down(50.0, 50.0, LEFT);
        fx.dispatcher.dispatch_mouse_up(150.0, 50.0, LEFT);
        assert_eq!(log.take(), vec![(b.id(), event_types::POINTER_UP)]);
        fx.close();
    }

    #[test]
    fn test_press_on_empty_space_blurs() {
        let mut fx = Fixture::new();
        let input = Widget::text_input("x").with_bounds(Bounds::new(0.0, 0.0, 100.0, 30.0));
        fx.root.add_child(&input).unwrap();
        click(&mut fx, 10.0, 10.0);
        assert!(input.is_focused());
        click(&mut fx, 900.0, 900.0);
        assert!(!input.is_focused());
        assert_eq!(fx.dispatcher.focused(), None);
        fx.close();
    }

    #[test]
    fn test_dropdown_toggle_select_and_close_outside() {
        let mut fx = Fixture::new();
        let dropdown = Widget::dropdown(["red", "green", "blue"])
            .with_bounds(Bounds::new(0.0, 0.0, 120.0, 32.0));
        fx.root.add_child(&dropdown).unwrap();
        let log = EventLog::new();
        log.watch(&dropdown, &[event_types::CHANGE]);

        click(&mut fx, 10.0, 10.0);
        assert!(dropdown.dropdown_state().unwrap().open);

        // Second option: list starts at y = 32, rows are 32 high
        fx.clock.advance(Duration::from_secs(1));
        click(&mut fx, 10.0, 32.0 + 40.0);
        let state = dropdown.dropdown_state().unwrap();
        assert!(!state.open);
        assert_eq!(state.selected_option(), Some("green"));
        assert_eq!(log.take(), vec![(dropdown.id(), event_types::CHANGE)]);

        fx.clock.advance(Duration::from_secs(1));
        click(&mut fx, 10.0, 10.0);
        assert!(dropdown.dropdown_state().unwrap().open);
        fx.dispatcher.dispatch_mouse_down(500.0, 500.0, LEFT);
        assert!(!dropdown.dropdown_state().unwrap().open);
        fx.close();
    }

    #[test]
    fn test_prevent_default_on_click_skips_dropdown_toggle() {
        let mut fx = Fixture::new();
        let dropdown = Widget::dropdown(["a"]).with_bounds(Bounds::new(0.0, 0.0, 120.0, 32.0));
        fx.root.add_child(&dropdown).unwrap();
        dropdown.on_click(|ctx| ctx.prevent_default());
        click(&mut fx, 10.0, 10.0);
        assert!(!dropdown.dropdown_state().unwrap().open);
        fx.close();
    }

    #[test]
    fn test_detached_hover_target_is_pruned() {
        let mut fx = Fixture::new();
        let panel = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        fx.dispatcher.dispatch_mouse_move(10.0, 10.0);
        assert_eq!(fx.dispatcher.hovered(), Some(&panel));

        fx.root.remove_child(&panel).unwrap();
        fx.dispatcher.dispatch_mouse_move(500.0, 500.0);
        assert_eq!(fx.dispatcher.hovered(), Some(&fx.root));
        assert!(!panel.is_hovered());
        fx.close();
    }

    #[test]
    fn test_touch_cancel_never_clicks() {
        let mut fx = Fixture::new();
        let target = fx.child(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let log = EventLog::new();
        log.watch(&target, &[event_types::CLICK]);
        fx.dispatcher.dispatch_touch_start(10.0, 10.0);
        fx.dispatcher.dispatch_touch_cancel();
        fx.dispatcher.dispatch_touch_end(10.0, 10.0);
        assert!(log.take().is_empty());
        assert!(!target.is_pressed());
        fx.close();
    }

    #[test]
    fn test_horizontal_drag_on_vertical_list_is_not_a_drag() {
        let mut fx = Fixture::new();
        let (scroll, _) = fx.scroll_list(20, 50.0);
        assert_eq!(scroll.scroll_state().unwrap().axis, ScrollAxis::Vertical);
        fx.dispatcher.dispatch_mouse_down(50.0, 50.0, LEFT);
        fx.dispatcher.dispatch_mouse_move(80.0, 50.0);
        assert!(!fx.dispatcher.is_dragging());
        fx.close();
    }
}
