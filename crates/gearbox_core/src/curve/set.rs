//! Arena of curves and keys.

use std::collections::HashMap;

use super::tangent::{self, CurveView, TangentHandles};
use super::{CurveId, CurveKey, CurveLoop, CurveWrapper, KeyId, KeyWrapper, TangentMode};
use crate::error::{CurveError, CurveResult};

/// Owns every curve and key plus the id counters that name them.
///
/// Ids are handed out monotonically and are unique for the lifetime of the
/// set. They are not meant to be persisted across runs.
#[derive(Debug, Default)]
pub struct CurveSet {
    curves: HashMap<CurveId, CurveWrapper>,
    keys: HashMap<KeyId, KeyWrapper>,
    next_curve_id: u32,
    next_key_id: u32,
}

impl CurveSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty curve.
    pub fn add_curve(&mut self, name: impl Into<String>) -> CurveId {
        let id = CurveId(self.next_curve_id);
        self.next_curve_id += 1;
        self.curves.insert(id, CurveWrapper::new(id, name.into()));
        id
    }

    /// Deletes a curve and all of its keys.
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownCurve`] if `id` is not live.
    pub fn remove_curve(&mut self, id: CurveId) -> CurveResult<CurveWrapper> {
        let curve = self.curves.remove(&id).ok_or(CurveError::UnknownCurve(id))?;
        for key in &curve.order {
            self.keys.remove(key);
        }
        Ok(curve)
    }

    /// Looks up a curve.
    #[must_use]
    pub fn curve(&self, id: CurveId) -> Option<&CurveWrapper> {
        self.curves.get(&id)
    }

    /// Sets the curve's behaviour outside its key range.
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownCurve`] if `id` is not live.
    pub fn set_loops(&mut self, id: CurveId, pre: CurveLoop, post: CurveLoop) -> CurveResult<()> {
        let curve = self.curves.get_mut(&id).ok_or(CurveError::UnknownCurve(id))?;
        curve.pre_loop = pre;
        curve.post_loop = post;
        Ok(())
    }

    /// Iterates every curve in id order.
    pub fn curves(&self) -> impl Iterator<Item = &CurveWrapper> + '_ {
        let mut ids: Vec<_> = self.curves.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(move |id| self.curves.get(&id))
    }

    /// Looks up a key.
    #[must_use]
    pub fn key(&self, id: KeyId) -> Option<&KeyWrapper> {
        self.keys.get(&id)
    }

    /// Keys of a curve in position order.
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownCurve`] if `curve` is not live.
    pub fn keys_of(&self, curve: CurveId) -> CurveResult<Vec<&KeyWrapper>> {
        let wrapper = self.curves.get(&curve).ok_or(CurveError::UnknownCurve(curve))?;
        wrapper
            .order
            .iter()
            .map(|id| self.keys.get(id).ok_or(CurveError::UnknownKey(*id)))
            .collect()
    }

    /// Index of a key within its curve's ordering.
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownKey`] for a dead handle, and
    /// [`CurveError::KeyNotInCurve`] when the key and its curve disagree.
    /// The latter is a broken invariant, not a user error.
    pub fn key_index(&self, id: KeyId) -> CurveResult<usize> {
        let key = self.keys.get(&id).ok_or(CurveError::UnknownKey(id))?;
        let curve = self
            .curves
            .get(&key.curve)
            .ok_or(CurveError::UnknownCurve(key.curve))?;
        curve.index_of(id).ok_or(CurveError::KeyNotInCurve {
            key: id,
            curve: key.curve,
        })
    }

    /// Adds a key and re-fits the curve's automatic tangents.
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
        if !self.curves.contains_key(&curve) {
            return Err(CurveError::UnknownCurve(curve));
        }
        let id = KeyId(self.next_key_id);
        self.next_key_id += 1;
        self.insert(KeyWrapper {
            id,
            curve,
            key,
            tangent_in_mode,
            tangent_out_mode,
        })?;
        Ok(id)
    }

    /// Re-inserts a previously removed key under its original id.
    pub(crate) fn restore_key(&mut self, wrapper: KeyWrapper) -> CurveResult<()> {
        if !self.curves.contains_key(&wrapper.curve) {
            return Err(CurveError::UnknownCurve(wrapper.curve));
        }
        self.insert(wrapper)
    }

    /// Removes a key and re-fits the curve's automatic tangents.
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownKey`] for a dead handle, or
    /// [`CurveError::KeyNotInCurve`] when the curve lost track of it.
    pub fn remove_key(&mut self, id: KeyId) -> CurveResult<KeyWrapper> {
        let index = self.key_index(id)?;
        let wrapper = self.keys.remove(&id).ok_or(CurveError::UnknownKey(id))?;
        let curve_id = wrapper.curve;
        if let Some(curve) = self.curves.get_mut(&curve_id) {
            curve.order.remove(index);
            curve.rebuild_index();
        }
        self.compute_tangents(curve_id)?;
        Ok(wrapper)
    }

    /// Moves a key by a delta in position and value.
    ///
    /// The key is taken out of the ordering and re-inserted at its new
    /// position; its id is unchanged.
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::remove_key`].
    pub fn move_key(&mut self, id: KeyId, delta_position: f32, delta_value: f32) -> CurveResult<()> {
        self.reposition(id, |key| {
            key.position += delta_position;
            key.value += delta_value;
        })
    }

    /// Puts a key at an exact position and value, re-inserting it like
    /// [`CurveSet::move_key`].
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::remove_key`].
    pub fn place_key(&mut self, id: KeyId, position: f32, value: f32) -> CurveResult<()> {
        self.reposition(id, |key| {
            key.position = position;
            key.value = value;
        })
    }

    fn reposition(&mut self, id: KeyId, edit: impl FnOnce(&mut CurveKey)) -> CurveResult<()> {
        let index = self.key_index(id)?;
        let mut wrapper = self.keys.remove(&id).ok_or(CurveError::UnknownKey(id))?;
        if let Some(curve) = self.curves.get_mut(&wrapper.curve) {
            curve.order.remove(index);
        }
        edit(&mut wrapper.key);
        self.insert(wrapper)
    }

    /// Sets the incoming tangent mode and re-fits.
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::key_index`].
    pub fn set_in_tangent(&mut self, id: KeyId, mode: TangentMode) -> CurveResult<()> {
        self.edit_key(id, |w| w.tangent_in_mode = mode)
    }

    /// Sets the outgoing tangent mode and re-fits.
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::key_index`].
    pub fn set_out_tangent(&mut self, id: KeyId, mode: TangentMode) -> CurveResult<()> {
        self.edit_key(id, |w| w.tangent_out_mode = mode)
    }

    /// Switches the incoming tangent to [`TangentMode::Custom`] with `value`.
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::key_index`].
    pub fn set_custom_in_tangent(&mut self, id: KeyId, value: f32) -> CurveResult<()> {
        self.edit_key(id, |w| {
            w.tangent_in_mode = TangentMode::Custom;
            w.key.tangent_in = value;
        })
    }

    /// Switches the outgoing tangent to [`TangentMode::Custom`] with `value`.
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::key_index`].
    pub fn set_custom_out_tangent(&mut self, id: KeyId, value: f32) -> CurveResult<()> {
        self.edit_key(id, |w| {
            w.tangent_out_mode = TangentMode::Custom;
            w.key.tangent_out = value;
        })
    }

    /// Re-fits every automatic tangent of a curve in one pass.
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownCurve`] if `curve` is not live, or
    /// [`CurveError::UnknownKey`] if the ordering names a dead key.
    pub fn compute_tangents(&mut self, curve: CurveId) -> CurveResult<()> {
        let order = self
            .curves
            .get(&curve)
            .ok_or(CurveError::UnknownCurve(curve))?
            .order
            .clone();

        let mut snapshot = Vec::with_capacity(order.len());
        for id in &order {
            snapshot.push(self.keys.get(id).ok_or(CurveError::UnknownKey(*id))?.key);
        }

        for (i, id) in order.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| &snapshot[p]);
            let next = snapshot.get(i + 1);
            if let Some(wrapper) = self.keys.get_mut(id) {
                tangent::fit_key(
                    &mut wrapper.key,
                    prev,
                    next,
                    wrapper.tangent_in_mode,
                    wrapper.tangent_out_mode,
                );
            }
        }
        Ok(())
    }

    /// Evaluates a curve at `position`.
    ///
    /// An empty curve evaluates to zero.
    ///
    /// # Errors
    ///
    /// [`CurveError::UnknownCurve`] if `curve` is not live.
    pub fn evaluate(&self, curve: CurveId, position: f32) -> CurveResult<f32> {
        let wrapper = self.curves.get(&curve).ok_or(CurveError::UnknownCurve(curve))?;
        let keys: Vec<CurveKey> = self.keys_of(curve)?.into_iter().map(|w| w.key).collect();

        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return Ok(0.0);
        };
        let span = last.position - first.position;

        if position < first.position {
            return Ok(match wrapper.pre_loop {
                CurveLoop::Constant => first.value,
                CurveLoop::Linear => {
                    let slope = keys.get(1).map_or(0.0, |next| segment_slope(first, next));
                    first.value - (first.position - position) * slope
                }
                CurveLoop::Cycle if span > 0.0 => {
                    let wrapped = first.position + (position - first.position).rem_euclid(span);
                    evaluate_inside(&keys, wrapped)
                }
                CurveLoop::Cycle => first.value,
            });
        }
        if position > last.position {
            return Ok(match wrapper.post_loop {
                CurveLoop::Constant => last.value,
                CurveLoop::Linear => {
                    let slope = keys
                        .len()
                        .checked_sub(2)
                        .map_or(0.0, |i| segment_slope(&keys[i], last));
                    last.value + (position - last.position) * slope
                }
                CurveLoop::Cycle if span > 0.0 => {
                    let wrapped = first.position + (position - first.position).rem_euclid(span);
                    evaluate_inside(&keys, wrapped)
                }
                CurveLoop::Cycle => last.value,
            });
        }
        Ok(evaluate_inside(&keys, position))
    }

    /// Screen positions of a key's tangent handles.
    ///
    /// # Errors
    ///
    /// As for [`CurveSet::key_index`].
    pub fn tangent_handle_screen_positions(
        &self,
        id: KeyId,
        view: &CurveView,
        length: f32,
    ) -> CurveResult<TangentHandles> {
        let index = self.key_index(id)?;
        let wrapper = self.keys.get(&id).ok_or(CurveError::UnknownKey(id))?;
        let order = self
            .curves
            .get(&wrapper.curve)
            .map(CurveWrapper::keys)
            .unwrap_or_default();

        let neighbor = |i: Option<usize>| {
            i.and_then(|i| order.get(i))
                .and_then(|n| self.keys.get(n))
                .map(|w| &w.key)
        };
        let prev = neighbor(index.checked_sub(1));
        let next = neighbor(Some(index + 1));

        Ok(tangent::tangent_handle_screen_positions(
            &wrapper.key,
            prev,
            next,
            view,
            length,
        ))
    }

    fn edit_key(&mut self, id: KeyId, edit: impl FnOnce(&mut KeyWrapper)) -> CurveResult<()> {
        self.key_index(id)?;
        let wrapper = self.keys.get_mut(&id).ok_or(CurveError::UnknownKey(id))?;
        edit(wrapper);
        let curve = wrapper.curve;
        self.compute_tangents(curve)
    }

    /// Places a key in its curve's ordering after any keys at the same position.
    fn insert(&mut self, wrapper: KeyWrapper) -> CurveResult<()> {
        let curve_id = wrapper.curve;
        let id = wrapper.id;
        let position = wrapper.key.position;

        let keys = &self.keys;
        let curve = self
            .curves
            .get_mut(&curve_id)
            .ok_or(CurveError::UnknownCurve(curve_id))?;
        let at = curve
            .order
            .iter()
            .position(|k| keys.get(k).is_some_and(|w| w.key.position > position))
            .unwrap_or(curve.order.len());
        curve.order.insert(at, id);
        curve.rebuild_index();

        self.keys.insert(id, wrapper);
        self.compute_tangents(curve_id)
    }
}

fn segment_slope(a: &CurveKey, b: &CurveKey) -> f32 {
    let run = b.position - a.position;
    if run.abs() > f32::EPSILON {
        (b.value - a.value) / run
    } else {
        0.0
    }
}

/// Evaluates within `[first.position, last.position]`; `keys` is non-empty.
fn evaluate_inside(keys: &[CurveKey], position: f32) -> f32 {
    let segment = keys
        .windows(2)
        .find(|pair| position >= pair[0].position && position <= pair[1].position);
    match segment {
        Some([from, to]) => {
            let run = to.position - from.position;
            if run.abs() <= f32::EPSILON {
                return from.value;
            }
            tangent::hermite(from, to, (position - from.position) / run)
        }
        _ => keys.last().map_or(0.0, |k| k.value),
    }
}
