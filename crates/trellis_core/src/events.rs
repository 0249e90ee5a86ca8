//! Input and widget event vocabulary
//!
//! Platform input arrives at the dispatcher as coordinates, buttons, keys
//! and modifiers. The dispatcher turns it into widget-level events named by
//! the [`event_types`] constants.

use serde::{Deserialize, Serialize};

/// Identifier of a widget-level event
pub type EventType = u32;

/// Widget-level event type ids
pub mod event_types {
    use super::EventType;

    /// Pointer button pressed over the widget
    pub const POINTER_DOWN: EventType = 1;
    /// Pointer button released over the widget
    pub const POINTER_UP: EventType = 2;
    /// Pointer moved over the widget
    pub const POINTER_MOVE: EventType = 3;
    /// Pointer entered the widget or one of its descendants
    pub const POINTER_ENTER: EventType = 4;
    /// Pointer left the widget and all of its descendants
    pub const POINTER_LEAVE: EventType = 5;
    /// Press and release on the same widget with the same button
    pub const CLICK: EventType = 6;
    /// Second click within the multi-click window
    pub const DOUBLE_CLICK: EventType = 7;
    /// Third click within the multi-click window
    pub const TRIPLE_CLICK: EventType = 8;
    /// Mouse wheel / trackpad scroll over the widget
    pub const WHEEL: EventType = 9;
    /// The widget's scroll offset changed
    pub const SCROLL: EventType = 10;
    /// The widget gained keyboard focus
    pub const FOCUS: EventType = 11;
    /// The widget lost keyboard focus
    pub const BLUR: EventType = 12;
    pub const KEY_DOWN: EventType = 13;
    pub const KEY_UP: EventType = 14;
    /// Character input for the focused widget
    pub const TEXT_INPUT: EventType = 15;
    /// The widget's value changed through user interaction
    pub const CHANGE: EventType = 16;
    /// The widget was attached to a tree
    pub const MOUNT: EventType = 17;
    /// The widget was detached from its tree
    pub const UNMOUNT: EventType = 18;
}

/// Human readable name of an event type, for logs
pub fn event_name(event_type: EventType) -> &'static str {
    use event_types::*;
    match event_type {
        POINTER_DOWN => "pointer_down",
        POINTER_UP => "pointer_up",
        POINTER_MOVE => "pointer_move",
        POINTER_ENTER => "pointer_enter",
        POINTER_LEAVE => "pointer_leave",
        CLICK => "click",
        DOUBLE_CLICK => "double_click",
        TRIPLE_CLICK => "triple_click",
        WHEEL => "wheel",
        SCROLL => "scroll",
        FOCUS => "focus",
        BLUR => "blur",
        KEY_DOWN => "key_down",
        KEY_UP => "key_up",
        TEXT_INPUT => "text_input",
        CHANGE => "change",
        MOUNT => "mount",
        UNMOUNT => "unmount",
        _ => "unknown",
    }
}

/// Event propagation phase
///
/// Events travel root → target (capture), reach the target, then travel
/// target → root (bubble).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Capture,
    Target,
    Bubble,
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button (also used for touch)
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Back button (side button)
    Back,
    /// Forward button (side button)
    Forward,
    /// Other button with index
    Other(u16),
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held (Option on macOS)
    pub alt: bool,
    /// Meta key is held (Command on macOS, Windows key on Windows)
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only shift held
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }

    /// Check if only shift is held
    pub fn shift_only(&self) -> bool {
        self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

/// Key codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Special keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,

    /// Character produced by the key, when the platform reports one
    Char(char),

    Unknown,
}

impl Key {
    /// Whether this key moves focus rather than editing content
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::Tab
                | Key::Left
                | Key::Right
                | Key::Up
                | Key::Down
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}
