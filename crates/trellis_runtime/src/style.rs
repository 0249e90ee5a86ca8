//! Style resolution boundary
//!
//! Class parsing and resolution live outside the runtime. The tree asks a
//! [`StyleResolver`] for a [`StyleProps`] set whenever a widget's class list,
//! interaction state or tree-scoped context (dark mode, breakpoint) changes,
//! and applies the result through the widget's normal setters so the update
//! pipeline sees it like any other mutation.

use trellis_core::{Color, EdgeInsets};

/// Responsive breakpoint derived from the viewport width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    #[default]
    Base,
    /// >= 640px
    Sm,
    /// >= 768px
    Md,
    /// >= 1024px
    Lg,
    /// >= 1280px
    Xl,
}

impl Breakpoint {
    pub fn from_width(width: f32) -> Self {
        if width >= 1280.0 {
            Breakpoint::Xl
        } else if width >= 1024.0 {
            Breakpoint::Lg
        } else if width >= 768.0 {
            Breakpoint::Md
        } else if width >= 640.0 {
            Breakpoint::Sm
        } else {
            Breakpoint::Base
        }
    }
}

/// Everything a resolver may condition on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleContext {
    pub hovered: bool,
    pub focused: bool,
    pub pressed: bool,
    pub disabled: bool,
    pub dark_mode: bool,
    pub breakpoint: Breakpoint,
}

/// Resolved style properties
///
/// `None` leaves a field alone unless the previous resolution set it, in
/// which case it returns to its default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleProps {
    pub background: Option<Color>,
    pub text_color: Option<Color>,
    pub opacity: Option<f32>,
    pub padding: Option<EdgeInsets>,
    pub gap: Option<f32>,
    pub corner_radius: Option<f32>,
    pub visible: Option<bool>,
}

impl StyleProps {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Resolves a class string in a context to a property set
pub trait StyleResolver: Send + Sync {
    fn resolve(&self, classes: &str, ctx: &StyleContext) -> StyleProps;
}

impl<F> StyleResolver for F
where
    F: Fn(&str, &StyleContext) -> StyleProps + Send + Sync,
{
    fn resolve(&self, classes: &str, ctx: &StyleContext) -> StyleProps {
        self(classes, ctx)
    }
}
