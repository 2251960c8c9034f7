//! Table configuration and the builder that assembles a table from its
//! caller-supplied parts.

use crate::error::TableError;
use crate::probe::DoubleHasher;
use crate::report::{Report, TracingReport};
use crate::slots::SlotArray;
use crate::table::{Comparator, LinkedHashTable};
use core::cmp::Ordering;
use core::fmt;
use tracing::Level;

/// Initial slot array size when none is configured.
pub const DEFAULT_CAPACITY: usize = 16;

/// Smallest slot array the table will use.
pub const MIN_CAPACITY: usize = 2;

/// Sizing knobs for a table. All capacities count slot array cells.
///
/// Capacities are powers of two. `initial_capacity` and `min_capacity` are
/// rounded up, `max_capacity` is rounded down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    /// Shrink floor. Defaults to the initial capacity.
    pub min_capacity: Option<usize>,
    /// Growth ceiling. `None` is unbounded.
    pub max_capacity: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            min_capacity: None,
            max_capacity: None,
        }
    }
}

/// Resolved, validated capacities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Limits {
    pub(crate) initial: usize,
    pub(crate) min_capacity: usize,
    pub(crate) max_capacity: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            initial: DEFAULT_CAPACITY,
            min_capacity: DEFAULT_CAPACITY,
            max_capacity: None,
        }
    }
}

fn round_up(n: usize) -> Result<usize, TableError> {
    n.max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .ok_or(TableError::InvalidConfig("capacity overflows usize"))
}

fn round_down(n: usize) -> usize {
    if n < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

impl TableConfig {
    pub(crate) fn resolve(&self) -> Result<Limits, TableError> {
        let initial = round_up(self.initial_capacity)?;
        let min_capacity = match self.min_capacity {
            Some(min) => round_up(min)?,
            None => initial,
        };
        if min_capacity > initial {
            return Err(TableError::InvalidConfig(
                "min_capacity exceeds initial_capacity",
            ));
        }
        let max_capacity = self.max_capacity.map(round_down);
        if max_capacity.is_some_and(|max| max < initial) {
            return Err(TableError::InvalidConfig(
                "max_capacity is below initial_capacity",
            ));
        }
        Ok(Limits {
            initial,
            min_capacity,
            max_capacity,
        })
    }
}

/// Collects the parts of a table: sizing, probe hasher, optional
/// comparator and report sink.
///
/// ```
/// use linked_hash_table::{FnProbe, TableBuilder};
///
/// let mut table = TableBuilder::new()
///     .initial_capacity(8)
///     .hasher(FnProbe::new(
///         |k: &u32, _cap: usize| *k as usize,
///         |k: &u32, _cap: usize| (*k as usize) >> 3,
///     ))
///     .comparator(|a: &u32, b: &u32| b.cmp(a))
///     .build()
///     .unwrap();
/// table.insert(1, "one").unwrap();
/// table.insert(3, "three").unwrap();
/// table.insert(2, "two").unwrap();
/// assert_eq!(table.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub struct TableBuilder<K, H = DoubleHasher, R = TracingReport> {
    config: TableConfig,
    hasher: H,
    compare: Option<Comparator<K>>,
    reporter: R,
}

impl<K> TableBuilder<K> {
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
            hasher: DoubleHasher::default(),
            compare: None,
            reporter: TracingReport,
        }
    }
}

impl<K> Default for TableBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H, R> TableBuilder<K, H, R> {
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    pub fn min_capacity(mut self, capacity: usize) -> Self {
        self.config.min_capacity = Some(capacity);
        self
    }

    pub fn max_capacity(mut self, capacity: usize) -> Self {
        self.config.max_capacity = Some(capacity);
        self
    }

    /// Replaces the probe hasher.
    pub fn hasher<H2>(self, hasher: H2) -> TableBuilder<K, H2, R> {
        TableBuilder {
            config: self.config,
            hasher,
            compare: self.compare,
            reporter: self.reporter,
        }
    }

    /// Keeps the order list sorted by `compare` instead of arrival order.
    pub fn comparator<F>(mut self, compare: F) -> Self
    where
        F: Fn(&K, &K) -> Ordering + 'static,
    {
        self.compare = Some(Box::new(compare));
        self
    }

    /// Replaces the report sink.
    pub fn reporter<R2: Report>(self, reporter: R2) -> TableBuilder<K, H, R2> {
        TableBuilder {
            config: self.config,
            hasher: self.hasher,
            compare: self.compare,
            reporter,
        }
    }

    /// Validates the configuration and allocates the initial slot array.
    pub fn build<V>(self) -> Result<LinkedHashTable<K, V, H, R>, TableError>
    where
        R: Report,
    {
        let limits = match self.config.resolve() {
            Ok(limits) => limits,
            Err(err) => {
                self.reporter.report(Level::ERROR, &err.to_string());
                return Err(err);
            }
        };
        let slots = match SlotArray::try_with_capacity(limits.initial) {
            Ok(slots) => slots,
            Err(source) => {
                let err = TableError::AllocationFailed {
                    capacity: limits.initial,
                    source,
                };
                self.reporter.report(Level::ERROR, &err.to_string());
                return Err(err);
            }
        };
        Ok(LinkedHashTable::from_parts(
            slots,
            self.hasher,
            self.compare,
            self.reporter,
            limits,
        ))
    }
}

impl<K, H: fmt::Debug, R: fmt::Debug> fmt::Debug for TableBuilder<K, H, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableBuilder")
            .field("config", &self.config)
            .field("hasher", &self.hasher)
            .field("sorted", &self.compare.is_some())
            .field("reporter", &self.reporter)
            .finish()
    }
}
