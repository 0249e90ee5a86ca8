//! Trellis Core
//!
//! Shared vocabulary for the Trellis UI runtime:
//!
//! - **Events**: event type ids, propagation phases, mouse buttons, keys and modifiers
//! - **Geometry**: points, sizes, computed bounds, insets and colors
//! - **Errors**: structural tree errors and configuration errors
//! - **Platform capabilities**: soft keyboard, clock and native resource handles
//!
//! Nothing in this crate owns widgets; the tree, update pipeline and
//! dispatcher live in `trellis_runtime`.
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{Bounds, Point};
//!
//! let bounds = Bounds::new(10.0, 10.0, 100.0, 40.0);
//! assert!(bounds.contains(Point::new(50.0, 20.0)));
//! assert_eq!(bounds.local(Point::new(50.0, 20.0)), Point::new(40.0, 10.0));
//! ```

pub mod error;
pub mod events;
pub mod geometry;
pub mod platform;

pub use error::{ConfigError, Result, TreeError};
pub use events::{event_name, event_types, EventType, Key, Modifiers, MouseButton, Phase};
pub use geometry::{Bounds, Color, EdgeInsets, Point, Size};
pub use platform::{Clock, NativeResource, NoopKeyboard, SoftKeyboard, SystemClock};
