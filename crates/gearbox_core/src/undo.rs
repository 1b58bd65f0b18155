//! # Undo Engine
//!
//! Two-stack command history. A command lives in exactly one of the stacks;
//! undoing moves the very same command object to the redo stack, it is never
//! re-derived.
//!
//! Commands act on an explicit context passed to every call rather than
//! holding references to what they edit. The engine and the context are
//! disjoint borrows, so a command cannot re-enter the engine while it runs.

use crate::error::UndoError;

/// A reversible edit applied to a context of type `Ctx`.
pub trait Command<Ctx: ?Sized> {
    /// Applies (or re-applies) the edit.
    fn apply(&mut self, ctx: &mut Ctx);

    /// Reverts a previously applied edit.
    fn revert(&mut self, ctx: &mut Ctx);

    /// Whether `revert` is currently valid.
    fn can_undo(&self, _ctx: &Ctx) -> bool {
        true
    }

    /// Whether `apply` can be replayed.
    fn can_redo(&self, _ctx: &Ctx) -> bool {
        true
    }
}

/// Undo/redo history over commands of type `C`.
#[derive(Debug)]
pub struct UndoEngine<C> {
    /// Applied commands, most recent last.
    undo_stack: Vec<C>,
    /// Reverted commands, most recently reverted last.
    redo_stack: Vec<C>,
}

impl<C> UndoEngine<C> {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Applies `command` and records it. Clears the redo stack.
    pub fn execute<Ctx: ?Sized>(&mut self, ctx: &mut Ctx, mut command: C)
    where
        C: Command<Ctx>,
    {
        command.apply(ctx);
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }

    /// Records a command that was already applied elsewhere.
    ///
    /// Counts as a fresh edit, so the redo stack is cleared.
    pub fn add_command(&mut self, command: C) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }

    /// Reverts the most recent command.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// [`UndoError::CannotUndo`] if the top command reports it cannot be
    /// reverted. The history is left untouched; this indicates a bug in
    /// whoever produced the command.
    pub fn undo<Ctx: ?Sized>(&mut self, ctx: &mut Ctx) -> Result<bool, UndoError>
    where
        C: Command<Ctx>,
    {
        let Some(top) = self.undo_stack.last_mut() else {
            return Ok(false);
        };
        if !top.can_undo(ctx) {
            tracing::error!(
                depth = self.undo_stack.len(),
                "undo history inconsistent: top command cannot be undone"
            );
            return Err(UndoError::CannotUndo);
        }

        top.revert(ctx);
        if let Some(command) = self.undo_stack.pop() {
            self.redo_stack.push(command);
        }
        Ok(true)
    }

    /// Re-applies the most recently undone command.
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// [`UndoError::CannotRedo`] if the top command reports it cannot be
    /// replayed. The command stays on the redo stack.
    pub fn redo<Ctx: ?Sized>(&mut self, ctx: &mut Ctx) -> Result<bool, UndoError>
    where
        C: Command<Ctx>,
    {
        let Some(top) = self.redo_stack.last_mut() else {
            return Ok(false);
        };
        if !top.can_redo(ctx) {
            tracing::warn!(depth = self.redo_stack.len(), "top redo command cannot be replayed");
            return Err(UndoError::CannotRedo);
        }

        top.apply(ctx);
        if let Some(command) = self.redo_stack.pop() {
            self.undo_stack.push(command);
        }
        Ok(true)
    }

    /// True if `undo` would do something.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True if `redo` would do something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Applied commands, oldest first.
    #[must_use]
    pub fn undo_stack(&self) -> &[C] {
        &self.undo_stack
    }

    /// Reverted commands, oldest revert first.
    #[must_use]
    pub fn redo_stack(&self) -> &[C] {
        &self.redo_stack
    }

    /// Forgets the whole history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<C> Default for UndoEngine<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Appends its tag to a log on apply, pops it on revert.
    #[derive(Debug, PartialEq)]
    struct Push {
        tag: char,
        revertible: bool,
    }

    impl Push {
        fn new(tag: char) -> Self {
            Self { tag, revertible: true }
        }
    }

    impl Command<Vec<char>> for Push {
        fn apply(&mut self, ctx: &mut Vec<char>) {
            ctx.push(self.tag);
        }

        fn revert(&mut self, ctx: &mut Vec<char>) {
            ctx.pop();
        }

        fn can_undo(&self, _ctx: &Vec<char>) -> bool {
            self.revertible
        }
    }

    fn tags(stack: &[Push]) -> Vec<char> {
        stack.iter().map(|c| c.tag).collect()
    }

    #[test]
    fn test_execute_after_undo_discards_redo() {
        let mut log: Vec<char> = Vec::new();
        let mut engine = UndoEngine::new();

        engine.execute(&mut log, Push::new('A'));
        engine.execute(&mut log, Push::new('B'));
        assert_eq!(engine.undo(&mut log), Ok(true));
        engine.execute(&mut log, Push::new('C'));

        assert_eq!(tags(engine.undo_stack()), vec!['A', 'C']);
        assert!(engine.redo_stack().is_empty());
        assert_eq!(log, vec!['A', 'C']);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut log: Vec<char> = Vec::new();
        let mut engine = UndoEngine::new();

        engine.execute(&mut log, Push::new('A'));
        assert_eq!(engine.undo(&mut log), Ok(true));
        assert!(log.is_empty());
        assert_eq!(tags(engine.redo_stack()), vec!['A']);

        assert_eq!(engine.redo(&mut log), Ok(true));
        assert_eq!(log, vec!['A']);
        assert_eq!(tags(engine.undo_stack()), vec!['A']);
        assert!(!engine.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut log: Vec<char> = Vec::new();
        let mut engine: UndoEngine<Push> = UndoEngine::new();
        assert_eq!(engine.undo(&mut log), Ok(false));
        assert_eq!(engine.redo(&mut log), Ok(false));
    }

    #[test]
    fn test_add_command_does_not_apply() {
        let mut log = vec!['X'];
        let mut engine = UndoEngine::new();

        engine.execute(&mut log, Push::new('A'));
        engine.undo(&mut log).unwrap();
        engine.add_command(Push::new('X'));

        assert!(engine.redo_stack().is_empty());
        assert_eq!(log, vec!['X']);
        engine.undo(&mut log).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_inconsistent_undo_reports() {
        let mut log: Vec<char> = Vec::new();
        let mut engine = UndoEngine::new();
        engine.execute(&mut log, Push { tag: 'A', revertible: false });

        assert_eq!(engine.undo(&mut log), Err(UndoError::CannotUndo));
        assert_eq!(tags(engine.undo_stack()), vec!['A']);
        assert_eq!(log, vec!['A']);
    }
}
