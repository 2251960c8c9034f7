//! Resizer: load-factor driven grow/shrink and tombstone purge.
//!
//! Load factor is `len / capacity`. After an insert the table doubles once
//! `len >= capacity / 2`; after a removal it halves once
//! `len <= capacity / 8`, never below the configured floor. The target band
//! after a resize is therefore `[1/8, 1/2]`.
//!
//! Tombstones count toward probe length but not toward `len`. Once they
//! take half of the cells not holding an entry, the array is rebuilt at the
//! same capacity to reclaim them. Between two such purges at least that many
//! removals happen, so the rebuild cost stays amortized O(1) per operation.
//!
//! Growth past `max_capacity` is refused. The refusal is reported once and
//! not again until the table shrinks or is cleared.
//!
//! A rebuild allocates the new array fallibly. On failure the old array is
//! kept as is, the failure goes to the report sink, and the operation that
//! triggered the resize still succeeds.

use crate::error::TableError;
use crate::probe::{self, ProbeHasher};
use crate::report::Report;
use crate::slots::{Slot, SlotArray};
use crate::table::LinkedHashTable;
use tracing::Level;

impl<K, V, H, R> LinkedHashTable<K, V, H, R>
where
    H: ProbeHasher<K>,
    R: Report,
{
    /// Post-insert check.
    pub(crate) fn maybe_grow(&mut self) {
        let capacity = self.slots.capacity();
        if self.len() >= capacity / 2 {
            match self.grow_target(capacity) {
                Ok(target) => {
                    self.resize_to(target);
                    return;
                }
                Err(err) => {
                    if !self.growth_refused {
                        self.growth_refused = true;
                        self.reporter.report(
                            Level::WARN,
                            &format!("not growing past {capacity} cells: {err}"),
                        );
                    }
                }
            }
        }
        if self.tombstones_crowded() {
            self.resize_to(capacity);
        }
    }

    /// Post-removal check.
    pub(crate) fn maybe_shrink(&mut self) {
        let capacity = self.slots.capacity();
        if self.len() <= capacity / 8
            && capacity > self.limits.min_capacity
            && self.resize_to((capacity / 2).max(self.limits.min_capacity))
        {
            self.growth_refused = false;
        }
    }

    /// Whether tombstones fill at least half of the cells without an entry.
    fn tombstones_crowded(&self) -> bool {
        let tombstones = self.slots.tombstones();
        tombstones > 0 && tombstones >= (self.slots.capacity() - self.len()) / 2
    }

    fn grow_target(&self, capacity: usize) -> Result<usize, TableError> {
        let limit = self.limits.max_capacity.unwrap_or(usize::MAX);
        match capacity.checked_mul(2) {
            Some(target) if target <= limit => Ok(target),
            _ => Err(TableError::CapacityLimit { limit }),
        }
    }

    /// Rebuilds into `capacity` cells, reporting instead of failing.
    /// Returns whether the rebuild happened.
    pub(crate) fn resize_to(&mut self, capacity: usize) -> bool {
        let from = self.slots.capacity();
        match self.rebuild(capacity) {
            Ok(()) => {
                self.reporter.report(
                    Level::DEBUG,
                    &format!("resized from {from} to {capacity} cells holding {} entries", self.len()),
                );
                true
            }
            Err(err) => {
                self.reporter.report(
                    Level::WARN,
                    &format!("resize from {from} to {capacity} cells abandoned: {err}"),
                );
                false
            }
        }
    }

    /// Re-probes every entry into a fresh array. The order list is walked
    /// once, head to tail, and its links are not touched. Nothing in `self`
    /// changes until the new array is complete.
    fn rebuild(&mut self, capacity: usize) -> Result<(), TableError> {
        if self.len() >= capacity {
            return Err(TableError::Full { capacity });
        }
        let mut fresh = SlotArray::try_with_capacity(capacity)
            .map_err(|source| TableError::AllocationFailed { capacity, source })?;

        for handle in self.order.handles() {
            let key = &self.order.node(handle).key;
            let seq = probe::sequence(&self.hasher, key, capacity);
            let index = fresh
                .first_free(seq)
                .ok_or(TableError::Full { capacity })?;
            fresh.fill(index, handle);
        }

        for (index, slot) in fresh.iter() {
            if let Slot::Full(handle) = slot {
                self.order.node_mut(handle).slot = index;
            }
        }
        self.slots = fresh;
        Ok(())
    }
}
