//! Widget kinds
//!
//! A closed set of variants, each carrying only the state that kind needs.
//! Operations that care about a capability (scrolling, text entry, overlays)
//! ask the kind instead of checking a tag against type-specific fields.

use crate::scroll::ScrollState;

/// What a widget is, plus its kind-specific state
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetKind {
    /// Layout-only box
    Container,
    /// Static text
    Text { content: String },
    /// Pressable button with a label
    Button { label: String },
    /// Single-line editable text
    TextInput { value: String, placeholder: String },
    /// Scroll container
    Scroll(ScrollState),
    /// Select box whose option list renders outside its own layout box
    Dropdown(DropdownState),
    Image { source: String },
    /// System tray icon, backed by a native resource
    TrayIcon { tooltip: String },
}

impl WidgetKind {
    /// Short name for logs and debug output
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Container => "container",
            WidgetKind::Text { .. } => "text",
            WidgetKind::Button { .. } => "button",
            WidgetKind::TextInput { .. } => "text_input",
            WidgetKind::Scroll(_) => "scroll",
            WidgetKind::Dropdown(_) => "dropdown",
            WidgetKind::Image { .. } => "image",
            WidgetKind::TrayIcon { .. } => "tray_icon",
        }
    }

    pub fn is_scrollable(&self) -> bool {
        matches!(self, WidgetKind::Scroll(_))
    }

    /// Whether focusing this widget should raise the software keyboard
    pub fn is_text_input(&self) -> bool {
        matches!(self, WidgetKind::TextInput { .. })
    }

    /// Focusable unless overridden per widget
    pub(crate) fn default_focusable(&self) -> bool {
        matches!(
            self,
            WidgetKind::Button { .. } | WidgetKind::TextInput { .. } | WidgetKind::Dropdown(_)
        )
    }

    /// Height of the region drawn below the widget's own box, if any
    pub(crate) fn overlay_height(&self, option_height: f32) -> f32 {
        match self {
            WidgetKind::Dropdown(d) if d.open => d.options.len() as f32 * option_height,
            _ => 0.0,
        }
    }
}

/// State of a dropdown / select widget
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropdownState {
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub open: bool,
}

impl DropdownState {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: None,
            open: false,
        }
    }

    /// Currently selected option text
    pub fn selected_option(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// Option index under a y offset measured from the top of the open list
    pub fn option_at(&self, list_y: f32, option_height: f32) -> Option<usize> {
        if list_y < 0.0 || option_height <= 0.0 {
            return None;
        }
        let index = (list_y / option_height) as usize;
        (index < self.options.len()).then_some(index)
    }
}
