//! Bounded vertex storage for keyed and single-frame entities.
//!
//! ```text
//! SlotBuffer<V>                          OnceBuffer<V>
//! ┌────────────────────────────────┐     ┌──────────────────────┐
//! │ "player" ─→ slot 0 [V verts]   │     │ entity 0 [V verts]   │
//! │ (free)      slot 1 [clear]  ◄──┼─ free list (FIFO)          │
//! │ "target" ─→ slot 2 [V verts]   │     │ entity 1 [V verts]   │
//! │             ...  high water ───┤     │ reset every update   │
//! └────────────────────────────────┘     └──────────────────────┘
//! ```
//!
//! Both buffers are drawn as a single contiguous slice. Freed slots stay in
//! that slice with transparent vertices until they are reused.
//!
//! Every release bumps the slot's generation, so a handle kept across a
//! delete no longer matches once the slot is reused.

use std::collections::{HashMap, VecDeque};

use crate::render::OverlayVertex;

/// Handle to a keyed entity's slot, tagged with the slot's generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    index: u32,
    generation: u32,
}

impl SlotHandle {
    /// Returned when a buffer is full.
    pub const INVALID: Self = Self {
        index: u32::MAX,
        generation: 0,
    };

    /// True unless this is [`SlotHandle::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.index != u32::MAX
    }

    /// Slot index, if valid.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        if self.is_valid() {
            usize::try_from(self.index).ok()
        } else {
            None
        }
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    fn new(index: usize, generation: u32) -> Self {
        u32::try_from(index).map_or(Self::INVALID, |index| Self { index, generation })
    }
}

/// Fixed-capacity storage of `V` vertices per string-keyed entity.
#[derive(Debug)]
pub struct SlotBuffer<const V: usize> {
    /// `slot_keys.len() * V` vertices.
    vertices: Vec<OverlayVertex>,
    /// Key of each allocated slot, `None` when free.
    slot_keys: Vec<Option<String>>,
    /// Bumped on every release. Outlives [`SlotBuffer::clear`].
    generations: Vec<u32>,
    slots: HashMap<String, usize>,
    free: VecDeque<usize>,
    capacity: usize,
    overflowed: bool,
}

impl<const V: usize> SlotBuffer<V> {
    /// Creates a buffer holding at most `capacity` entities.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity.min(1024) * V),
            slot_keys: Vec::with_capacity(capacity.min(1024)),
            generations: Vec::new(),
            slots: HashMap::new(),
            free: VecDeque::new(),
            capacity,
            overflowed: false,
        }
    }

    /// Maximum number of live entities.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots ever allocated. Never exceeds the capacity.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.slot_keys.len()
    }

    /// Number of slots waiting for reuse.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// True if `key` is live.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Handle of a live key.
    #[must_use]
    pub fn handle_of(&self, key: &str) -> Option<SlotHandle> {
        self.slots.get(key).map(|&slot| self.handle(slot))
    }

    /// Key that owns `handle`, if the handle is still current.
    #[must_use]
    pub fn key_of(&self, handle: SlotHandle) -> Option<&str> {
        self.live_slot(handle)
            .and_then(|slot| self.slot_keys[slot].as_deref())
    }

    /// Creates or overwrites the entity for `key`.
    ///
    /// Returns [`SlotHandle::INVALID`] and changes nothing when the key is new
    /// and every slot is taken.
    pub fn show(&mut self, key: &str, vertices: [OverlayVertex; V]) -> SlotHandle {
        if let Some(&slot) = self.slots.get(key) {
            self.write(slot, &vertices);
            return self.handle(slot);
        }

        let slot = if let Some(slot) = self.free.pop_front() {
            slot
        } else if self.slot_keys.len() < self.capacity {
            self.slot_keys.push(None);
            self.vertices.extend_from_slice(&[OverlayVertex::CLEAR; V]);
            let slot = self.slot_keys.len() - 1;
            if slot == self.generations.len() {
                self.generations.push(0);
            }
            slot
        } else {
            if !self.overflowed {
                self.overflowed = true;
                tracing::debug!(capacity = self.capacity, key, "slot buffer full, dropping entity");
            }
            return SlotHandle::INVALID;
        };

        self.write(slot, &vertices);
        self.slot_keys[slot] = Some(key.to_owned());
        self.slots.insert(key.to_owned(), slot);
        self.handle(slot)
    }

    /// Overwrites a live entity through its handle.
    ///
    /// Fails for a handle whose entity was deleted, even after another key
    /// reused the slot.
    pub fn update(&mut self, handle: SlotHandle, vertices: [OverlayVertex; V]) -> bool {
        match self.live_slot(handle) {
            Some(slot) => {
                self.write(slot, &vertices);
                true
            }
            None => false,
        }
    }

    /// Vertices of a live entity.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[OverlayVertex]> {
        self.slots
            .get(key)
            .map(|&slot| &self.vertices[slot * V..(slot + 1) * V])
    }

    /// Deletes `key`. Unknown keys are ignored.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.slots.remove(key) {
            Some(slot) => {
                self.release(slot);
                true
            }
            None => false,
        }
    }

    /// Deletes the entity behind `handle`. Stale handles are ignored.
    pub fn delete_handle(&mut self, handle: SlotHandle) -> bool {
        let Some(slot) = self.live_slot(handle) else {
            return false;
        };
        let Some(key) = self.slot_keys[slot].take() else {
            return false;
        };
        self.slots.remove(&key);
        self.release(slot);
        true
    }

    /// Drops every entity and returns to the empty state.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.slot_keys.clear();
        self.slots.clear();
        self.free.clear();
        for generation in &mut self.generations {
            *generation = generation.wrapping_add(1);
        }
        self.overflowed = false;
    }

    /// Every allocated slot's vertices, freed ones transparent.
    #[must_use]
    pub fn vertices(&self) -> &[OverlayVertex] {
        &self.vertices
    }

    /// Live keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    fn handle(&self, slot: usize) -> SlotHandle {
        SlotHandle::new(slot, self.generations[slot])
    }

    /// Slot behind `handle` if it is occupied and the generation matches.
    fn live_slot(&self, handle: SlotHandle) -> Option<usize> {
        let slot = handle.index()?;
        let occupied = matches!(self.slot_keys.get(slot), Some(Some(_)));
        (occupied && self.generations[slot] == handle.generation).then_some(slot)
    }

    fn write(&mut self, slot: usize, vertices: &[OverlayVertex; V]) {
        self.vertices[slot * V..(slot + 1) * V].copy_from_slice(vertices);
    }

    fn release(&mut self, slot: usize) {
        self.vertices[slot * V..(slot + 1) * V].fill(OverlayVertex::CLEAR);
        self.slot_keys[slot] = None;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push_back(slot);
        self.overflowed = false;
    }
}

/// Fixed-capacity storage of `V` vertices per single-frame entity.
#[derive(Debug)]
pub struct OnceBuffer<const V: usize> {
    vertices: Vec<OverlayVertex>,
    capacity: usize,
    overflowed: bool,
}

impl<const V: usize> OnceBuffer<V> {
    /// Creates a buffer holding at most `capacity` entities per frame.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity.min(1024) * V),
            capacity,
            overflowed: false,
        }
    }

    /// Maximum entities per frame.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entities pushed this frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len() / V.max(1)
    }

    /// True if nothing was pushed this frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Starts a new frame.
    pub fn begin_frame(&mut self) {
        self.vertices.clear();
        self.overflowed = false;
    }

    /// Appends an entity. Returns false and drops it when full.
    pub fn push(&mut self, vertices: [OverlayVertex; V]) -> bool {
        if self.len() >= self.capacity {
            if !self.overflowed {
                self.overflowed = true;
                tracing::debug!(
                    capacity = self.capacity,
                    "once buffer full, dropping entities this frame"
                );
            }
            return false;
        }
        self.vertices.extend_from_slice(&vertices);
        true
    }

    /// This frame's vertices.
    #[must_use]
    pub fn vertices(&self) -> &[OverlayVertex] {
        &self.vertices
    }
}
