//! # Gearbox UI
//!
//! Draggable, clickable rectangles without a UI framework.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       UI PIPELINE                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  PointerSnapshot → MouseRouter → UiContext → owner polls     │
//! │        ↓               ↓             ↓            ↓          │
//! │  edge detection   hit-testing    box events   Window moves   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Boxes live in a [`UiContext`] and are addressed by [`BoxId`]. The router
//! queues [`BoxEvent`]s on each box; whoever owns a box drains them during
//! its own update. Events that nobody drains are dropped on the next frame.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod input;
pub mod layout;
pub mod router;
pub mod style;
pub mod window;

pub use input::{InputState, PointerSnapshot};
pub use layout::{BoxEvent, BoxId, LayoutBox, Rect, UiContext};
pub use router::MouseRouter;
pub use style::Color;
pub use window::{Window, WindowResponse};
