//! Keyboard routing and focus management
//!
//! Key events go only to the focused widget, along its root → target chain.
//! Focus moves on press, on Tab / Shift+Tab and through the explicit
//! `focus`/`blur` calls. Crossing the boundary between text inputs and
//! everything else shows or hides the software keyboard.

use trellis_core::{event_types, EventType, Key, Modifiers};

use super::EventDispatcher;
use crate::event_handler::{dispatch_to, propagate, EventContext};
use crate::widget::Widget;

impl EventDispatcher {
    // =========================================================================
    // Focus
    // =========================================================================

    /// Currently focused widget
    pub fn focused(&self) -> Option<&Widget> {
        self.focused.as_ref()
    }

    /// Focus a widget
    ///
    /// Ignored for widgets outside this dispatcher's tree or that cannot take
    /// focus.
    pub fn focus(&mut self, widget: &Widget) {
        self.prune();
        if !widget.is_attached_to(&self.tree) || !widget.is_focusable() {
            tracing::warn!(id = %widget.id(), "focus request ignored");
            return;
        }
        self.set_focus(Some(widget.clone()));
    }

    pub fn blur(&mut self) {
        self.prune();
        self.set_focus(None);
    }

    /// Move focus to the next focusable widget in tree order, wrapping
    pub fn focus_next(&mut self) {
        self.prune();
        self.cycle_focus(true);
    }

    /// Move focus to the previous focusable widget in tree order, wrapping
    pub fn focus_previous(&mut self) {
        self.prune();
        self.cycle_focus(false);
    }

    pub(crate) fn set_focus(&mut self, new: Option<Widget>) {
        if self.focused == new {
            return;
        }
        let old = std::mem::replace(&mut self.focused, new.clone());
        tracing::debug!(
            from = ?old.as_ref().map(Widget::id),
            to = ?new.as_ref().map(Widget::id),
            "focus changed"
        );

        if let Some(old) = &old {
            old.set_focused(false);
            dispatch_to(old, &mut EventContext::new(event_types::BLUR));
        }
        if let Some(new) = &new {
            new.set_focused(true);
            dispatch_to(new, &mut EventContext::new(event_types::FOCUS));
        }

        if self.config.soft_keyboard {
            let was_text = old.as_ref().is_some_and(Widget::is_text_input);
            let is_text = new.as_ref().is_some_and(Widget::is_text_input);
            match (was_text, is_text) {
                (false, true) => self.keyboard.show(),
                (true, false) => self.keyboard.hide(),
                _ => {}
            }
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let candidates: Vec<Widget> = self
            .tree
            .widgets()
            .into_iter()
            .filter(|w| w.is_focusable() && w.is_visible() && !w.is_disabled())
            .collect();
        if candidates.is_empty() {
            return;
        }

        let current = self
            .focused
            .as_ref()
            .and_then(|f| candidates.iter().position(|w| w == f));
        let len = candidates.len();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.set_focus(Some(candidates[next].clone()));
    }

    // =========================================================================
    // Keyboard Events
    // =========================================================================

    /// Handle a key press
    ///
    /// Unless a handler prevents the default: Tab / Shift+Tab move focus,
    /// Backspace edits a focused text input and Escape closes open dropdowns.
    pub fn dispatch_key_down(&mut self, key: Key, modifiers: Modifiers) {
        self.prune();
        let ctx = self.dispatch_key(event_types::KEY_DOWN, key, modifiers);
        if ctx.is_default_prevented() {
            return;
        }

        match key {
            Key::Tab if modifiers.shift_only() => self.cycle_focus(false),
            Key::Tab if modifiers.is_empty() => self.cycle_focus(true),
            Key::Backspace => {
                let Some(input) = self.focused_text_input() else {
                    return;
                };
                let mut value = input.value().unwrap_or_default();
                if value.pop().is_some() {
                    input.set_value(value);
                    self.fire_change(&input);
                }
            }
            Key::Escape => {
                for widget in self.tree.widgets() {
                    if widget.dropdown_state().is_some_and(|d| d.open) {
                        widget.set_dropdown_open(false);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn dispatch_key_up(&mut self, key: Key, modifiers: Modifiers) {
        self.prune();
        self.dispatch_key(event_types::KEY_UP, key, modifiers);
    }

    /// Handle a typed character
    ///
    /// A focused text input appends printable characters and fires CHANGE
    /// unless a TEXT_INPUT handler prevents the default.
    pub fn dispatch_text_input(&mut self, ch: char) {
        self.prune();
        let Some(focused) = self.focused.clone() else {
            return;
        };
        let mut ctx = EventContext::new(event_types::TEXT_INPUT).with_char(ch);
        propagate(&focused.ancestor_chain(), &mut ctx);
        if ctx.is_default_prevented() || ch.is_control() {
            return;
        }

        if let Some(input) = self.focused_text_input() {
            let mut value = input.value().unwrap_or_default();
            value.push(ch);
            input.set_value(value);
            self.fire_change(&input);
        }
    }

    fn dispatch_key(&self, event_type: EventType, key: Key, modifiers: Modifiers) -> EventContext {
        let mut ctx = EventContext::new(event_type)
            .with_key(key)
            .with_modifiers(modifiers);
        if let Some(focused) = &self.focused {
            propagate(&focused.ancestor_chain(), &mut ctx);
        }
        ctx
    }

    fn focused_text_input(&self) -> Option<Widget> {
        self.focused.clone().filter(|w| w.is_text_input() && !w.is_disabled())
    }

    fn fire_change(&self, widget: &Widget) {
        let mut ctx = EventContext::new(event_types::CHANGE);
        propagate(&widget.ancestor_chain(), &mut ctx);
    }
}
