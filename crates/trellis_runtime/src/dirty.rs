//! Dirty masks and interaction flags

use bitflags::bitflags;

bitflags! {
    /// Property categories changed since the last collection
    ///
    /// The renderer uses the mask to decide which parts of a widget to
    /// re-serialize. New widgets are always reported with [`DirtyMask::FULL`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DirtyMask: u32 {
        /// Padding, gap or anything else that feeds layout
        const LAYOUT = 1 << 0;
        /// Colors, opacity, corner radius, class list
        const STYLE = 1 << 1;
        /// Text, input value, button label, image source, dropdown options/selection
        const CONTENT = 1 << 2;
        /// Hovered / focused / pressed / disabled
        const STATE = 1 << 3;
        /// Scroll offset or content size override
        const SCROLL = 1 << 4;
        const VISIBILITY = 1 << 5;
        /// Child list added to, removed from or reordered
        const CHILDREN = 1 << 6;
        /// Overlay open/closed (dropdown)
        const OVERLAY = 1 << 7;
    }
}

impl DirtyMask {
    /// Every category
    pub const FULL: Self = Self::all();
}

bitflags! {
    /// Per-widget interaction state, owned by the dispatcher
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InteractionFlags: u8 {
        const HOVERED = 1 << 0;
        const FOCUSED = 1 << 1;
        const PRESSED = 1 << 2;
        const DISABLED = 1 << 3;
    }
}
