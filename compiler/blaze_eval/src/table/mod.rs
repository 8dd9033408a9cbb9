//! Fixed-capacity associative table.
//!
//! Scope bindings and object properties both live in an `AssocTable`: an
//! open-addressing hash table with linear probing whose capacity is fixed at
//! construction. There is no resize; inserting a new entry into a full table
//! fails with [`TableFull`], which the evaluator reports as a fatal
//! `TableOverflow`.
//!
//! Deleted entries leave a tombstone rather than an empty slot, so removing
//! one key never cuts the probe chain of another key that collided with it.

use std::fmt;

use crate::errors::{table_overflow, EvalError};

/// Values that know how to produce an independent copy of themselves.
///
/// `Clone` on runtime values shares reference-counted payloads; `deep_copy`
/// duplicates them.
pub trait DeepCopy {
    #[must_use]
    fn deep_copy(&self) -> Self;
}

/// What [`AssocTable::set`] did with the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The key was new; the live count grew by one.
    Inserted,
    /// The key existed; its value was replaced.
    Overwritten,
}

/// Error returned when inserting into a table whose every slot is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableFull {
    pub capacity: usize,
}

impl From<TableFull> for EvalError {
    fn from(full: TableFull) -> Self {
        table_overflow(full.capacity)
    }
}

#[derive(Clone)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied { key: Box<str>, value: V },
}

/// Open-addressing table from string keys to `V`.
#[derive(Clone)]
pub struct AssocTable<V> {
    slots: Box<[Slot<V>]>,
    count: usize,
}

impl<V> AssocTable<V> {
    /// Create an empty table with room for exactly `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        AssocTable {
            slots: (0..capacity).map(|_| Slot::Empty).collect(),
            count: 0,
        }
    }

    /// Home slot of `key`: `(1 + Σ byte[i] * i) mod capacity`.
    ///
    /// Arithmetic wraps at 32 bits. A zero capacity hashes everything to 0.
    pub fn hash(key: &str, capacity: usize) -> usize {
        let mut sum: u32 = 1;
        for (i, byte) in key.bytes().enumerate() {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "hash arithmetic wraps at 32 bits"
            )]
            let weight = i as u32;
            sum = sum.wrapping_add(u32::from(byte).wrapping_mul(weight));
        }
        sum as usize % capacity.max(1)
    }

    /// Maximum number of live entries.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Slot indices in probe order for `key`, starting at its home slot.
    fn probe(&self, key: &str) -> impl Iterator<Item = usize> {
        let capacity = self.capacity();
        let start = Self::hash(key, capacity);
        (0..capacity).map(move |step| (start + step) % capacity)
    }

    /// Index of the live slot holding `key`.
    fn find(&self, key: &str) -> Option<usize> {
        for index in self.probe(key) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied { key: k, .. } if &**k == key => return Some(index),
                Slot::Occupied { .. } => {}
            }
        }
        None
    }

    /// Insert or overwrite `key`.
    ///
    /// Fails whenever the table is already full, even if `key` is present.
    pub fn set(&mut self, key: &str, value: V) -> Result<SetOutcome, TableFull> {
        let capacity = self.capacity();
        if self.count >= capacity {
            return Err(TableFull { capacity });
        }

        if let Some(index) = self.find(key) {
            tracing::debug!(key, "overwriting existing table entry");
            if let Slot::Occupied { value: slot, .. } = &mut self.slots[index] {
                *slot = value;
            }
            return Ok(SetOutcome::Overwritten);
        }

        let free = self
            .probe(key)
            .find(|&index| !matches!(self.slots[index], Slot::Occupied { .. }));
        match free {
            Some(index) => {
                self.slots[index] = Slot::Occupied {
                    key: key.into(),
                    value,
                };
                self.count += 1;
                Ok(SetOutcome::Inserted)
            }
            None => Err(TableFull { capacity }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let index = self.find(key)?;
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find(key)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Remove `key`, returning its value.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let index = self.find(key)?;
        let removed = std::mem::replace(&mut self.slots[index], Slot::Tombstone);
        match removed {
            Slot::Occupied { value, .. } => {
                self.count -= 1;
                Some(value)
            }
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((&**key, value)),
            Slot::Empty | Slot::Tombstone => None,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }
}

impl<V: Clone> AssocTable<V> {
    /// Copy the table, sharing whatever the values share on `Clone`.
    #[must_use]
    pub fn copy_shallow(&self) -> Self {
        self.clone()
    }
}

impl<V: DeepCopy> AssocTable<V> {
    /// Copy the table and deep-copy every value.
    ///
    /// Slots keep their positions, so probe chains stay valid.
    #[must_use]
    pub fn copy_deep(&self) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Empty => Slot::Empty,
                Slot::Tombstone => Slot::Tombstone,
                Slot::Occupied { key, value } => Slot::Occupied {
                    key: key.clone(),
                    value: value.deep_copy(),
                },
            })
            .collect();
        AssocTable {
            slots,
            count: self.count,
        }
    }
}

/// Tables compare as unordered maps; capacity and slot layout are ignored.
impl<V: PartialEq> PartialEq for AssocTable<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl<V: fmt::Debug> fmt::Debug for AssocTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
