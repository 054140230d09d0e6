//! Forward cursors over one partition.

use crate::error::CoreResult;
use crate::partition::PartitionId;
use partikv_engine::EngineIter;
use std::fmt;

/// Position of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Positioned on a record.
    Valid,
    /// No record at or after the position. Terminal.
    Exhausted,
}

/// A single-owner forward cursor over a partition, in byte order.
///
/// A cursor is created already positioned by
/// [`Database::seek`](crate::Database::seek). The view returned by
/// [`current`](Cursor::current) borrows the cursor, so it cannot outlive the
/// next [`advance`](Cursor::advance) or [`release`](Cursor::release).
///
/// # Example
///
/// ```rust
/// use partikv_core::{Config, Database, MemoryEngine, PartitionId};
///
/// let db = Database::open_with_engine(&MemoryEngine::new(), "db", Config::default()).unwrap();
/// for key in [b"a", b"c", b"e"] {
///     db.put(PartitionId::DEFAULT, key, b"").unwrap();
/// }
///
/// let mut cursor = db.seek(PartitionId::DEFAULT, b"b").unwrap();
/// assert_eq!(cursor.key(), Some(&b"c"[..]));
/// assert_eq!(cursor.advance().unwrap().map(|(k, _)| k), Some(&b"e"[..]));
/// assert!(cursor.advance().unwrap().is_none());
/// cursor.release();
/// ```
pub struct Cursor<I: EngineIter> {
    iter: I,
    partition: PartitionId,
    prefix: Option<Vec<u8>>,
    state: CursorState,
}

impl<I: EngineIter> Cursor<I> {
    /// Positions `iter` at `start`. With a `prefix`, the cursor is exhausted
    /// as soon as a key no longer starts with it.
    pub(crate) fn open(
        mut iter: I,
        partition: PartitionId,
        start: &[u8],
        prefix: Option<Vec<u8>>,
    ) -> CoreResult<Self> {
        iter.seek(start)?;
        let mut cursor = Self {
            iter,
            partition,
            prefix,
            state: CursorState::Exhausted,
        };
        cursor.settle();
        Ok(cursor)
    }

    fn settle(&mut self) {
        let in_range = self.iter.valid()
            && self
                .prefix
                .as_deref()
                .map_or(true, |p| self.iter.key().starts_with(p));
        self.state = if in_range {
            CursorState::Valid
        } else {
            CursorState::Exhausted
        };
    }

    /// The current record, or `None` once exhausted.
    #[must_use]
    pub fn current(&self) -> Option<(&[u8], &[u8])> {
        match self.state {
            CursorState::Valid => Some((self.iter.key(), self.iter.value())),
            CursorState::Exhausted => None,
        }
    }

    /// The current key.
    #[must_use]
    pub fn key(&self) -> Option<&[u8]> {
        self.current().map(|(k, _)| k)
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.current().map(|(_, v)| v)
    }

    /// Moves to the next record and returns it, or `None` at the end.
    ///
    /// Advancing an exhausted cursor is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails to read. The cursor is
    /// exhausted afterwards.
    pub fn advance(&mut self) -> CoreResult<Option<(&[u8], &[u8])>> {
        if self.state == CursorState::Valid {
            if let Err(e) = self.iter.next() {
                self.state = CursorState::Exhausted;
                return Err(e.into());
            }
            self.settle();
        }
        Ok(self.current())
    }

    /// Releases the cursor and its engine resources.
    pub fn release(self) {
        drop(self);
    }

    /// The cursor state.
    #[must_use]
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// True while positioned on a record.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.state == CursorState::Valid
    }

    /// The partition being iterated.
    #[must_use]
    pub fn partition(&self) -> PartitionId {
        self.partition
    }

    /// Converts the cursor into an iterator of owned records, starting with
    /// the current one.
    #[must_use]
    pub fn into_entries(self) -> Entries<I> {
        Entries {
            cursor: self,
            started: false,
            failed: false,
        }
    }
}

impl<I: EngineIter> fmt::Debug for Cursor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("partition", &self.partition)
            .field("state", &self.state)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Owning iterator returned by [`Cursor::into_entries`].
///
/// Stops after the first error.
pub struct Entries<I: EngineIter> {
    cursor: Cursor<I>,
    started: bool,
    failed: bool,
}

impl<I: EngineIter> Iterator for Entries<I> {
    type Item = CoreResult<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.started {
            if let Err(e) = self.cursor.advance() {
                self.failed = true;
                return Some(Err(e));
            }
        }
        self.started = true;
        self.cursor
            .current()
            .map(|(k, v)| Ok((k.to_vec(), v.to_vec())))
    }
}
