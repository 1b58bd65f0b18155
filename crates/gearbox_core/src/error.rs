//! # Core Error Types
//!
//! Soft failures (overflow, unknown keys) are not errors in Gearbox; they are
//! reported through sentinel values. What lives here are broken invariants.

use thiserror::Error;

use crate::curve::{CurveId, KeyId};

/// Errors raised by the curve editor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// The key handle does not name a live key.
    #[error("unknown key: {0}")]
    UnknownKey(KeyId),

    /// The curve handle does not name a live curve.
    #[error("unknown curve: {0}")]
    UnknownCurve(CurveId),

    /// A key claims to belong to a curve that has no record of it.
    #[error("key {key} is not present in curve {curve}")]
    KeyNotInCurve {
        /// The orphaned key.
        key: KeyId,
        /// The curve it claims to belong to.
        curve: CurveId,
    },
}

/// Result type for curve editor operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors raised by the undo engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoError {
    /// The command on top of the undo stack refused to revert.
    #[error("command on top of the undo stack cannot be undone")]
    CannotUndo,

    /// The command on top of the redo stack refused to re-apply.
    #[error("command on top of the redo stack cannot be redone")]
    CannotRedo,
}
