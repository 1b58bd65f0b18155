//! # Gearbox Core
//!
//! Engine-agnostic pieces of the Gearbox debug overlay:
//! - [`math`]: the vector and matrix types the overlay speaks in
//! - [`ring`]: bounded circular history used by data samplers
//! - [`undo`]: two-stack command history
//! - [`curve`]: curve/key wrappers with automatic tangent fitting
//!
//! Nothing in here knows about rendering or input. The overlay crates build
//! on top of these types.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod curve;
pub mod error;
pub mod math;
pub mod ring;
pub mod undo;

pub use curve::{
    CurveCommand, CurveEditor, CurveId, CurveKey, CurveLoop, CurveSet, CurveView, CurveWrapper,
    KeyId, KeyWrapper, TangentHandles, TangentMode, TangentSide,
};
pub use error::{CurveError, CurveResult, UndoError};
pub use math::{Mat4, Vec2, Vec3};
pub use ring::FixedCapacityRing;
pub use undo::{Command, UndoEngine};
