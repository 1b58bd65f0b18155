//! Curve editor: a [`CurveSet`] plus its edit history.

use super::command::{CurveCommand, TangentSide};
use super::{CurveId, CurveKey, CurveSet, KeyId, TangentMode};
use crate::error::{CurveError, CurveResult, UndoError};
use crate::undo::UndoEngine;

/// Editing context that owns the curves and records every key edit.
///
/// Structural key edits go through [`CurveCommand`]s so they can be undone.
/// Adding or removing whole curves is not recorded; removing a curve clears
/// the history since recorded commands may name its keys.
#[derive(Debug, Default)]
pub struct CurveEditor {
    set: CurveSet,
    history: UndoEngine<CurveCommand>,
}

impl CurveEditor {
    /// Creates an empty editor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the curves.
    #[must_use]
    pub fn curves(&self) -> &CurveSet {
        &self.set
    }

    /// The recorded history.
    #[must_use]
    pub fn history(&self) -> &UndoEngine<CurveCommand> {
        &self.history
    }

    /// Creates an empty curve.
    pub fn add_curve(&mut self, name: impl Into<String>) -> CurveId {
        self.set.add_curve(name)
    }

    /// Deletes a curve and forgets the edit history.
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownCurve`] if `id` is not live.
    pub fn remove_curve(&mut self, id: CurveId) -> CurveResult<()> {
        self.set.remove_curve(id)?;
        self.history.clear();
        Ok(())
    }

    /// Adds a key (undoable).
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownCurve`] if `curve` is not live.
    pub fn add_key(
        &mut self,
        curve: CurveId,
        key: CurveKey,
        tangent_in_mode: TangentMode,
        tangent_out_mode: TangentMode,
    ) -> CurveResult<KeyId> {
        if self.set.curve(curve).is_none() {
            return Err(CurveError::UnknownCurve(curve));
        }
        self.history.execute(
            &mut self.set,
            CurveCommand::add_key(curve, key, tangent_in_mode, tangent_out_mode),
        );
        match self.history.undo_stack().last() {
            Some(CurveCommand::AddKey { id: Some(id), .. }) => Ok(*id),
            _ => Err(CurveError::UnknownCurve(curve)),
        }
    }

    /// Removes a key (undoable).
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::key_index`].
    pub fn remove_key(&mut self, key: KeyId) -> CurveResult<()> {
        self.set.key_index(key)?;
        self.history.execute(&mut self.set, CurveCommand::remove_key(key));
        Ok(())
    }

    /// Moves a key (undoable).
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::key_index`].
    pub fn move_key(&mut self, key: KeyId, delta_position: f32, delta_value: f32) -> CurveResult<()> {
        self.set.key_index(key)?;
        self.history.execute(
            &mut self.set,
            CurveCommand::move_key(key, delta_position, delta_value),
        );
        Ok(())
    }

    /// Changes one side's tangent (undoable). `value` only matters for
    /// [`TangentMode::Custom`].
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::key_index`].
    pub fn set_tangent(
        &mut self,
        key: KeyId,
        side: TangentSide,
        mode: TangentMode,
        value: f32,
    ) -> CurveResult<()> {
        self.set.key_index(key)?;
        self.history.execute(
            &mut self.set,
            CurveCommand::set_tangent(key, side, mode, value),
        );
        Ok(())
    }

    /// Reverts the most recent edit.
    ///
    /// # Errors
    ///
    /// See [`UndoEngine::undo`].
    pub fn undo(&mut self) -> Result<bool, UndoError> {
        self.history.undo(&mut self.set)
    }

    /// Re-applies the most recently reverted edit.
    ///
    /// # Errors
    ///
    /// See [`UndoEngine::redo`].
    pub fn redo(&mut self) -> Result<bool, UndoError> {
        self.history.redo(&mut self.set)
    }
}
