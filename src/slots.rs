//! Slot array: open-addressing cells holding arena handles, with tombstones.

use crate::probe::ProbeSeq;
use std::collections::TryReserveError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot<T> {
    Empty,
    /// Formerly occupied. Probing continues past it; insertion may reuse it.
    Tombstone,
    Full(T),
}

/// Outcome of probing for a key that is about to be inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Probe<T> {
    Found { index: usize, handle: T },
    /// First reusable cell on the sequence (a tombstone if one came first).
    Vacant { index: usize },
    /// Every cell on the sequence is full and none matched.
    Exhausted,
}

#[derive(Debug)]
pub(crate) struct SlotArray<T> {
    cells: Vec<Slot<T>>,
    occupied: usize,
    tombstones: usize,
}

impl<T: Copy> SlotArray<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![Slot::Empty; capacity],
            occupied: 0,
            tombstones: 0,
        }
    }

    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(capacity)?;
        cells.resize(capacity, Slot::Empty);
        Ok(Self {
            cells,
            occupied: 0,
            tombstones: 0,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<Slot<T>> {
        self.cells.get(index).copied()
    }

    /// Walks `seq` until an empty cell, returning the first full cell whose
    /// handle satisfies `is_match`. Tombstones are stepped over.
    pub(crate) fn find(
        &self,
        seq: ProbeSeq,
        mut is_match: impl FnMut(T) -> bool,
    ) -> Option<(usize, T)> {
        for index in seq {
            match self.cells[index] {
                Slot::Empty => return None,
                Slot::Tombstone => continue,
                Slot::Full(handle) => {
                    if is_match(handle) {
                        return Some((index, handle));
                    }
                }
            }
        }
        None
    }

    /// Like `find`, but also remembers where a new entry would go. The walk
    /// never stops at a tombstone, so an equal key further along the chain
    /// is still found.
    pub(crate) fn find_or_vacant(
        &self,
        seq: ProbeSeq,
        mut is_match: impl FnMut(T) -> bool,
    ) -> Probe<T> {
        let mut reusable = None;
        for index in seq {
            match self.cells[index] {
                Slot::Empty => {
                    return Probe::Vacant {
                        index: reusable.unwrap_or(index),
                    }
                }
                Slot::Tombstone => {
                    reusable.get_or_insert(index);
                }
                Slot::Full(handle) => {
                    if is_match(handle) {
                        return Probe::Found { index, handle };
                    }
                }
            }
        }
        match reusable {
            Some(index) => Probe::Vacant { index },
            None => Probe::Exhausted,
        }
    }

    /// First non-full cell on `seq`. Used when rebuilding into a fresh array
    /// where no key can already be present.
    pub(crate) fn first_free(&self, mut seq: ProbeSeq) -> Option<usize> {
        seq.find(|&index| !matches!(self.cells[index], Slot::Full(_)))
    }

    pub(crate) fn fill(&mut self, index: usize, handle: T) {
        match self.cells[index] {
            Slot::Empty => {}
            Slot::Tombstone => self.tombstones -= 1,
            Slot::Full(_) => unreachable!("cell {index} is already occupied"),
        }
        self.cells[index] = Slot::Full(handle);
        self.occupied += 1;
    }

    /// Turns a full cell into a tombstone and returns its handle.
    pub(crate) fn vacate(&mut self, index: usize) -> Option<T> {
        let Slot::Full(handle) = self.cells[index] else {
            return None;
        };
        self.cells[index] = Slot::Tombstone;
        self.occupied -= 1;
        self.tombstones += 1;
        Some(handle)
    }

    pub(crate) fn reset(&mut self) {
        self.cells.fill(Slot::Empty);
        self.occupied = 0;
        self.tombstones = 0;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, Slot<T>)> + '_ {
        self.cells.iter().copied().enumerate()
    }
}
