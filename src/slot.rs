//! Generational slot storage.
//!
//! A [`SlotAllocator`] hands out [`Handle`]s made of a slot index and a
//! generation. Removing an occupant bumps the slot's generation, so every
//! handle issued before the removal stays stale forever, even after the slot
//! is reused by an unrelated value.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use thiserror::Error;

/// Values that can mark their own slot as logically empty.
///
/// The allocator never inspects `T` beyond these two methods.
pub trait CanBeInvalid {
    /// True when this value is the "empty slot" sentinel.
    fn is_invalid(&self) -> bool;
    /// Produce the sentinel stored in a slot after removal.
    fn make_invalid() -> Self;
}

/// Failure when resolving a handle against a [`SlotAllocator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot index {index} is out of range (len {len})")]
    OutOfRange { index: u32, len: usize },
    #[error("stale handle for slot {index}: handle generation {expected}, slot generation {found}")]
    StaleHandle { index: u32, expected: u32, found: u32 },
}

/// `(slot, generation)` reference into a `SlotAllocator<T>`.
///
/// Plain value: copying or dropping a handle never touches the storage.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Build a handle from raw parts. Mostly useful in tests and tooling;
    /// a fabricated handle is still checked on every access.
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation, _marker: PhantomData }
    }

    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would put bounds on `T`.
impl<T> Copy for Handle<T> {}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, self.generation).cmp(&(other.index, other.generation))
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    value: T,
    generation: u32,
    /// Emptied by `remove`, so the generation already moved past every
    /// handle issued for the previous occupant.
    vacated: bool,
    /// Generation counter exhausted; the slot is never handed out again.
    retired: bool,
}

/// Reusable-slot storage with generation-checked handles.
///
/// `add` reuses the first logically empty slot before growing, so the
/// physical slot array only grows when every slot is occupied.
#[derive(Clone, Debug)]
pub struct SlotAllocator<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for SlotAllocator<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: CanBeInvalid> SlotAllocator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` in the first empty slot or in a new slot at generation 0.
    ///
    /// A slot emptied by `remove` is reused at the generation `remove` left it
    /// on. A slot that reads as empty without having been removed (its value
    /// was added invalid, or invalidated through `get_mut`) still has a
    /// handle out at the current generation, so it advances once more before
    /// reuse. Every `add` therefore returns a handle no earlier `add` returned.
    pub fn add(&mut self, value: T) -> Handle<T> {
        loop {
            let free = self
                .slots
                .iter()
                .position(|s| !s.retired && s.value.is_invalid());
            let Some(i) = free else {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { value, generation: 0, vacated: false, retired: false });
                return Handle::from_raw_parts(index, 0);
            };
            let slot = &mut self.slots[i];
            if !slot.vacated && !Self::advance(slot) {
                continue;
            }
            slot.value = value;
            slot.vacated = false;
            return Handle::from_raw_parts(i as u32, slot.generation);
        }
    }

    /// `add(T::default())`.
    pub fn add_default(&mut self) -> Handle<T>
    where
        T: Default,
    {
        self.add(T::default())
    }

    pub fn get(&self, handle: Handle<T>) -> Result<&T, SlotError> {
        let i = self.check(handle)?;
        Ok(&self.slots[i].value)
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T, SlotError> {
        let i = self.check(handle)?;
        Ok(&mut self.slots[i].value)
    }

    /// Replace the occupant with the sentinel and advance the generation by
    /// one. Returns the removed value.
    pub fn remove(&mut self, handle: Handle<T>) -> Result<T, SlotError> {
        let i = self.check(handle)?;
        let slot = &mut self.slots[i];
        let old = std::mem::replace(&mut slot.value, T::make_invalid());
        slot.vacated = Self::advance(slot);
        Ok(old)
    }

    /// True if `handle` currently resolves.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.check(handle).is_ok()
    }

    /// Number of live occupants (not the physical slot count).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| Self::is_live(s)).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.slots.iter().any(Self::is_live)
    }

    /// Physical slot count; only ever grows.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Live occupants in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| Self::is_live(s))
            .map(|(i, s)| (Handle::from_raw_parts(i as u32, s.generation), &s.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| Self::is_live(s))
            .map(|(i, s)| (Handle::from_raw_parts(i as u32, s.generation), &mut s.value))
    }

    /// Remove every live occupant. Outstanding handles all go stale.
    pub fn clear(&mut self) {
        let live: Vec<Handle<T>> = self.iter().map(|(h, _)| h).collect();
        for h in live {
            // Handles come straight from `iter`, so they resolve.
            let _ = self.remove(h);
        }
    }

    /// Bump the generation, retiring the slot when the counter is spent.
    fn advance(slot: &mut Slot<T>) -> bool {
        match slot.generation.checked_add(1) {
            Some(g) => {
                slot.generation = g;
                true
            }
            None => {
                slot.retired = true;
                false
            }
        }
    }

    fn is_live(slot: &Slot<T>) -> bool {
        !slot.retired && !slot.value.is_invalid()
    }

    fn check(&self, handle: Handle<T>) -> Result<usize, SlotError> {
        let i = handle.index as usize;
        let slot = self.slots.get(i).ok_or(SlotError::OutOfRange {
            index: handle.index,
            len: self.slots.len(),
        })?;
        if slot.retired || slot.generation != handle.generation {
            return Err(SlotError::StaleHandle {
                index: handle.index,
                expected: handle.generation,
                found: slot.generation,
            });
        }
        Ok(i)
    }
}
