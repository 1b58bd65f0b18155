//! Undoable curve edits.

use super::{CurveId, CurveKey, CurveSet, KeyId, KeyWrapper, TangentMode};
use crate::error::CurveResult;
use crate::undo::Command;

/// Which side of a key a tangent edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TangentSide {
    /// Incoming tangent.
    In,
    /// Outgoing tangent.
    Out,
}

/// A reversible edit against a [`CurveSet`].
///
/// Commands remember whatever they need to revert themselves the first time
/// they are applied, so the same object can bounce between the undo and redo
/// stacks.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveCommand {
    /// Insert a key.
    AddKey {
        /// Target curve.
        curve: CurveId,
        /// Key to insert.
        key: CurveKey,
        /// Incoming tangent mode.
        tangent_in_mode: TangentMode,
        /// Outgoing tangent mode.
        tangent_out_mode: TangentMode,
        /// Assigned on first apply; reused on redo.
        id: Option<KeyId>,
    },
    /// Delete a key.
    RemoveKey {
        /// Key to delete.
        key: KeyId,
        /// Captured on apply for the revert.
        removed: Option<KeyWrapper>,
    },
    /// Translate a key.
    MoveKey {
        /// Key to move.
        key: KeyId,
        /// Change in position.
        delta_position: f32,
        /// Change in value.
        delta_value: f32,
        /// Position and value before the move, restored exactly on revert.
        original: Option<(f32, f32)>,
    },
    /// Change one side's tangent mode (and value, for custom tangents).
    SetTangent {
        /// Key to edit.
        key: KeyId,
        /// Side to edit.
        side: TangentSide,
        /// New mode.
        mode: TangentMode,
        /// Tangent value, used when `mode` is custom.
        value: f32,
        /// Mode and value before the edit.
        previous: Option<(TangentMode, f32)>,
    },
}

impl CurveCommand {
    /// Builds an add-key command.
    #[must_use]
    pub const fn add_key(
        curve: CurveId,
        key: CurveKey,
        tangent_in_mode: TangentMode,
        tangent_out_mode: TangentMode,
    ) -> Self {
        Self::AddKey {
            curve,
            key,
            tangent_in_mode,
            tangent_out_mode,
            id: None,
        }
    }

    /// Builds a remove-key command.
    #[must_use]
    pub const fn remove_key(key: KeyId) -> Self {
        Self::RemoveKey { key, removed: None }
    }

    /// Builds a move-key command.
    #[must_use]
    pub const fn move_key(key: KeyId, delta_position: f32, delta_value: f32) -> Self {
        Self::MoveKey {
            key,
            delta_position,
            delta_value,
            original: None,
        }
    }

    /// Builds a tangent edit.
    #[must_use]
    pub const fn set_tangent(key: KeyId, side: TangentSide, mode: TangentMode, value: f32) -> Self {
        Self::SetTangent {
            key,
            side,
            mode,
            value,
            previous: None,
        }
    }
}

fn apply_tangent(
    set: &mut CurveSet,
    key: KeyId,
    side: TangentSide,
    mode: TangentMode,
    value: f32,
) -> CurveResult<()> {
    match (side, mode) {
        (TangentSide::In, TangentMode::Custom) => set.set_custom_in_tangent(key, value),
        (TangentSide::Out, TangentMode::Custom) => set.set_custom_out_tangent(key, value),
        (TangentSide::In, mode) => set.set_in_tangent(key, mode),
        (TangentSide::Out, mode) => set.set_out_tangent(key, mode),
    }
}

fn report(result: CurveResult<()>, what: &str) {
    if let Err(err) = result {
        tracing::warn!(%err, "curve command failed to {what}");
    }
}

impl Command<CurveSet> for CurveCommand {
    fn apply(&mut self, set: &mut CurveSet) {
        match self {
            Self::AddKey {
                curve,
                key,
                tangent_in_mode,
                tangent_out_mode,
                id,
            } => match id {
                Some(existing) => report(
                    set.restore_key(KeyWrapper {
                        id: *existing,
                        curve: *curve,
                        key: *key,
                        tangent_in_mode: *tangent_in_mode,
                        tangent_out_mode: *tangent_out_mode,
                    }),
                    "re-add key",
                ),
                None => match set.add_key(*curve, *key, *tangent_in_mode, *tangent_out_mode) {
                    Ok(new_id) => *id = Some(new_id),
                    Err(err) => tracing::warn!(%err, "curve command failed to add key"),
                },
            },
            Self::RemoveKey { key, removed } => match set.remove_key(*key) {
                Ok(wrapper) => *removed = Some(wrapper),
                Err(err) => tracing::warn!(%err, "curve command failed to remove key"),
            },
            Self::MoveKey {
                key,
                delta_position,
                delta_value,
                original,
            } => {
                if let Some(wrapper) = set.key(*key) {
                    *original = Some((wrapper.key.position, wrapper.key.value));
                }
                report(set.move_key(*key, *delta_position, *delta_value), "move key");
            }
            Self::SetTangent {
                key,
                side,
                mode,
                value,
                previous,
            } => {
                if let Some(wrapper) = set.key(*key) {
                    *previous = Some(match side {
                        TangentSide::In => (wrapper.tangent_in_mode, wrapper.key.tangent_in),
                        TangentSide::Out => (wrapper.tangent_out_mode, wrapper.key.tangent_out),
                    });
                }
                report(apply_tangent(set, *key, *side, *mode, *value), "set tangent");
            }
        }
    }

    fn revert(&mut self, set: &mut CurveSet) {
        match self {
            Self::AddKey { id, .. } => {
                if let Some(id) = id {
                    report(set.remove_key(*id).map(drop), "revert key add");
                }
            }
            Self::RemoveKey { removed, .. } => {
                if let Some(wrapper) = removed.take() {
                    report(set.restore_key(wrapper), "revert key removal");
                }
            }
            Self::MoveKey { key, original, .. } => {
                if let Some((position, value)) = *original {
                    report(set.place_key(*key, position, value), "revert move");
                }
            }
            Self::SetTangent {
                key,
                side,
                previous,
                ..
            } => {
                if let Some((mode, value)) = *previous {
                    report(apply_tangent(set, *key, *side, mode, value), "revert tangent");
                }
            }
        }
    }

    fn can_undo(&self, set: &CurveSet) -> bool {
        match self {
            Self::AddKey { id, .. } => id.is_some_and(|id| set.key(id).is_some()),
            Self::RemoveKey { removed, .. } => removed
                .as_ref()
                .is_some_and(|w| set.curve(w.curve).is_some()),
            Self::MoveKey { key, original, .. } => original.is_some() && set.key(*key).is_some(),
            Self::SetTangent { key, previous, .. } => previous.is_some() && set.key(*key).is_some(),
        }
    }

    fn can_redo(&self, set: &CurveSet) -> bool {
        match self {
            Self::AddKey { curve, .. } => set.curve(*curve).is_some(),
            Self::RemoveKey { key, .. }
            | Self::MoveKey { key, .. }
            | Self::SetTangent { key, .. } => set.key(*key).is_some(),
        }
    }
}
