//! # Curve Editing Core
//!
//! Piecewise cubic curves whose keys carry per-side tangent modes.
//!
//! Keys and curves live in a [`CurveSet`] arena and are addressed by stable
//! integer handles. Moving a key replaces its position in the curve's ordering
//! but never its [`KeyId`]. Automatic tangents are re-fitted across the whole
//! curve after every structural edit; custom tangents survive the re-fit.
//!
//! ```text
//! CurveEditor
//! ├── CurveSet          (arena: curves, keys, id counters)
//! │   ├── CurveWrapper  (ordered KeyIds + KeyId -> index map)
//! │   └── KeyWrapper    (CurveKey + tangent modes + owning CurveId)
//! └── UndoEngine<CurveCommand>
//! ```

mod command;
mod editor;
mod set;
mod tangent;

pub use command::{CurveCommand, TangentSide};
pub use editor::CurveEditor;
pub use set::CurveSet;
pub use tangent::{CurveView, TangentHandles};

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a curve, unique within one [`CurveSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveId(pub u32);

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "curve#{}", self.0)
    }
}

/// Stable identity of a key, unique within one [`CurveSet`].
///
/// Survives moves; never reused after the key is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(pub u32);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key#{}", self.0)
    }
}

/// How one side of a key's tangent is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TangentMode {
    /// Zero slope.
    Flat,
    /// Straight line towards the neighbor on that side.
    Linear,
    /// Fitted from both neighbors, weighted by position distance.
    #[default]
    Smooth,
    /// Set explicitly by the caller; never recomputed.
    Custom,
}

impl TangentMode {
    /// True for modes recomputed from neighbors.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        !matches!(self, Self::Custom)
    }
}

/// Behaviour of the curve outside its first/last key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveLoop {
    /// Hold the end key's value.
    #[default]
    Constant,
    /// Extend the end segment as a straight line.
    Linear,
    /// Repeat the key range.
    Cycle,
}

/// A single control point.
///
/// Tangents are expressed as value change across the adjacent segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveKey {
    /// Position along the curve's domain.
    pub position: f32,
    /// Value at `position`.
    pub value: f32,
    /// Incoming tangent.
    pub tangent_in: f32,
    /// Outgoing tangent.
    pub tangent_out: f32,
}

impl CurveKey {
    /// Creates a key with flat tangents.
    #[must_use]
    pub const fn new(position: f32, value: f32) -> Self {
        Self {
            position,
            value,
            tangent_in: 0.0,
            tangent_out: 0.0,
        }
    }
}

/// A key together with its editing state.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyWrapper {
    /// Stable identity.
    pub id: KeyId,
    /// Owning curve.
    pub curve: CurveId,
    /// The underlying key.
    pub key: CurveKey,
    /// Mode of the incoming tangent.
    pub tangent_in_mode: TangentMode,
    /// Mode of the outgoing tangent.
    pub tangent_out_mode: TangentMode,
}

/// A curve: its keys in position order plus display settings.
#[derive(Debug, Clone)]
pub struct CurveWrapper {
    /// Stable identity.
    pub id: CurveId,
    /// Display name.
    pub name: String,
    /// Behaviour before the first key.
    pub pre_loop: CurveLoop,
    /// Behaviour after the last key.
    pub post_loop: CurveLoop,
    /// Keys sorted by position; ties keep insertion order.
    order: Vec<KeyId>,
    /// Derived from `order`, rebuilt after every structural change.
    index: HashMap<KeyId, usize>,
}

impl CurveWrapper {
    fn new(id: CurveId, name: String) -> Self {
        Self {
            id,
            name,
            pre_loop: CurveLoop::Constant,
            post_loop: CurveLoop::Constant,
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Key handles in position order.
    #[must_use]
    pub fn keys(&self) -> &[KeyId] {
        &self.order
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if the curve has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of `key` in the ordering, if it belongs to this curve.
    #[must_use]
    pub fn index_of(&self, key: KeyId) -> Option<usize> {
        self.index.get(&key).copied()
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        self.index
            .extend(self.order.iter().enumerate().map(|(i, &id)| (id, i)));
    }
}
