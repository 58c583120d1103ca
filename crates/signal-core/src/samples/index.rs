//! Sample-list indices
//!
//! A [`SampleIndex`] is a doubly-linked catalogue of named sample lists
//! with a cursor. Entries live in an arena and are addressed by stable
//! ids, so reordering swaps links and position fields without moving
//! storage. Indices derived from other indices keep a non-owning parent
//! id, and entries may reference a parent entry in the parent index the
//! same way.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::complex::{CpxFunction, CpxMode, Real};
use crate::error::{Result, SignalError};
use crate::samples::list::{SampleKind, SampleList};

/// Process-wide index id allocator, strictly increasing
static NEXT_INDEX_ID: AtomicU64 = AtomicU64::new(1);

/// Stable arena id of an index entry
pub type EntryId = usize;

/// A named, filed reference to one sample list
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// The list of samples
    pub list: SampleList,
    /// 1-based position in traversal order
    position: usize,
    /// Name of the list
    pub name: String,
    /// Associated file name
    pub file: String,
    /// Entry in the parent index this entry was derived from
    pub parent_entry: Option<EntryId>,
    prev: Option<EntryId>,
    next: Option<EntryId>,
}

impl IndexEntry {
    /// 1-based position in traversal order
    pub fn position(&self) -> usize {
        self.position
    }

    /// Id of the previous entry in traversal order
    pub fn previous(&self) -> Option<EntryId> {
        self.prev
    }

    /// Id of the next entry in traversal order
    pub fn next(&self) -> Option<EntryId> {
        self.next
    }
}

/// A doubly-linked catalogue of sample lists
#[derive(Debug)]
pub struct SampleIndex {
    index_id: u64,
    parent_id: Option<u64>,
    entries: Vec<Option<IndexEntry>>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    current: Option<EntryId>,
    num_entries: usize,
}

impl SampleIndex {
    /// Creates an empty index, optionally derived from a parent index
    pub fn new(parent: Option<&SampleIndex>) -> Self {
        let index_id = NEXT_INDEX_ID.fetch_add(1, Ordering::Relaxed);
        debug!(index_id, parent_id = ?parent.map(|p| p.index_id), "creating sample index");
        SampleIndex {
            index_id,
            parent_id: parent.map(|p| p.index_id),
            entries: Vec::new(),
            head: None,
            tail: None,
            current: None,
            num_entries: 0,
        }
    }

    /// Process-unique id of this index
    pub fn id(&self) -> u64 {
        self.index_id
    }

    /// Id of the parent index, when derived
    pub fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.num_entries
    }

    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    /// Id of the current entry
    pub fn current(&self) -> Option<EntryId> {
        self.current
    }

    /// Id of the head entry
    pub fn head(&self) -> Option<EntryId> {
        self.head
    }

    /// Id of the tail entry
    pub fn tail(&self) -> Option<EntryId> {
        self.tail
    }

    /// Borrows an entry by id
    pub fn entry(&self, id: EntryId) -> Result<&IndexEntry> {
        self.entries
            .get(id)
            .and_then(|slot| slot.as_ref())
            .ok_or_else(|| SignalError::NotInitialized {
                details: format!("no index entry with id {id}"),
            })
    }

    /// Mutably borrows an entry by id
    pub fn entry_mut(&mut self, id: EntryId) -> Result<&mut IndexEntry> {
        self.entries
            .get_mut(id)
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| SignalError::NotInitialized {
                details: format!("no index entry with id {id}"),
            })
    }

    /// Borrows the current entry
    pub fn current_entry(&self) -> Result<&IndexEntry> {
        let id = self.current.ok_or_else(|| SignalError::NotInitialized {
            details: "index has no current entry".into(),
        })?;
        self.entry(id)
    }

    /// Mutably borrows the current entry
    pub fn current_entry_mut(&mut self) -> Result<&mut IndexEntry> {
        let id = self.current.ok_or_else(|| SignalError::NotInitialized {
            details: "index has no current entry".into(),
        })?;
        self.entry_mut(id)
    }

    /// Appends a new entry holding a fresh list, returning its position
    ///
    /// The new entry becomes the tail; when `set_current` is true it also
    /// becomes the current entry.
    pub fn add_entry(
        &mut self,
        name: impl Into<String>,
        file: impl Into<String>,
        parent_entry: Option<EntryId>,
        kind: SampleKind,
        ini_time: Real,
        inc_time: Real,
        ini_norm_time: u64,
        set_current: bool,
    ) -> Result<usize> {
        let id = self.entries.len();
        let position = self.num_entries + 1;
        let entry = IndexEntry {
            list: SampleList::new(kind, ini_time, inc_time, ini_norm_time),
            position,
            name: name.into(),
            file: file.into(),
            parent_entry,
            prev: self.tail,
            next: None,
        };
        self.entries.push(Some(entry));

        if let Some(tail) = self.tail {
            self.entry_mut(tail)?.next = Some(id);
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
        self.num_entries += 1;
        if set_current || self.current.is_none() {
            self.current = Some(id);
        }
        Ok(position)
    }

    /// Removes the tail entry (fixed removal policy)
    ///
    /// When the current entry is the one removed, the cursor moves to the
    /// previous entry.
    pub fn destroy_entry(&mut self) -> Result<()> {
        let tail_id = self.tail.ok_or_else(|| SignalError::domain(
            "destroy_entry",
            "index has no entries",
        ))?;
        let prev = self.entry(tail_id)?.previous();

        if self.current == Some(tail_id) {
            self.current = prev;
        }
        if let Some(prev_id) = prev {
            self.entry_mut(prev_id)?.next = None;
        } else {
            self.head = None;
        }
        self.tail = prev;
        self.entries[tail_id] = None;
        self.num_entries -= 1;
        Ok(())
    }

    /// Destroys the index contents
    ///
    /// Without `cascade` a non-empty index refuses to be destroyed; with
    /// `cascade` every contained entry and list is released.
    pub fn destroy(&mut self, cascade: bool) -> Result<()> {
        if !cascade && self.num_entries > 0 {
            return Err(SignalError::domain(
                "destroy_index",
                "non-cascading destruction of a non-empty index",
            ));
        }
        debug!(index_id = self.index_id, entries = self.num_entries, "destroying sample index");
        self.entries.clear();
        self.head = None;
        self.tail = None;
        self.current = None;
        self.num_entries = 0;
        Ok(())
    }

    /// Entry id at a 1-based traversal position
    pub fn entry_at(&self, pos: usize) -> Result<EntryId> {
        if pos == 0 || pos > self.num_entries {
            return Err(SignalError::domain(
                "entry_at",
                format!("position {} out of range 1..={}", pos, self.num_entries),
            ));
        }
        let mut id = self.head;
        let mut cur = 1;
        while let Some(entry_id) = id {
            if cur == pos {
                return Ok(entry_id);
            }
            id = self.entry(entry_id)?.next();
            cur += 1;
        }
        Err(SignalError::NotInitialized {
            details: "index links are inconsistent".into(),
        })
    }

    /// Moves the cursor to the entry at a 1-based position
    pub fn move_to(&mut self, pos: usize) -> Result<()> {
        let id = self.entry_at(pos)?;
        self.current = Some(id);
        Ok(())
    }

    /// Makes the given entry the current entry
    pub fn set_current(&mut self, id: EntryId) -> Result<()> {
        self.entry(id)?;
        self.current = Some(id);
        Ok(())
    }

    /// Iterates entry ids in traversal order
    pub fn iter_ids(&self) -> IndexIter<'_> {
        IndexIter {
            index: self,
            next: self.head,
        }
    }

    /// Rebuilds links, head/tail and position fields from an ordering
    fn relink(&mut self, order: &[EntryId]) -> Result<()> {
        for (i, &id) in order.iter().enumerate() {
            let prev = if i > 0 { Some(order[i - 1]) } else { None };
            let next = order.get(i + 1).copied();
            let entry = self.entry_mut(id)?;
            entry.prev = prev;
            entry.next = next;
            entry.position = i + 1;
        }
        self.head = order.first().copied();
        self.tail = order.last().copied();
        Ok(())
    }

    /// Swaps the entries at two 1-based positions
    ///
    /// Links, position fields and head/tail tracking are repaired in one
    /// step; entry ids (and the cursor) are unaffected.
    pub fn switch_entries(&mut self, pos1: usize, pos2: usize) -> Result<()> {
        if pos1 == pos2 {
            return Ok(());
        }
        let mut order: Vec<EntryId> = self.iter_ids().collect();
        if pos1 == 0 || pos2 == 0 || pos1 > order.len() || pos2 > order.len() {
            return Err(SignalError::domain(
                "switch_entries",
                format!("positions ({pos1}, {pos2}) out of range 1..={}", order.len()),
            ));
        }
        order.swap(pos1 - 1, pos2 - 1);
        self.relink(&order)
    }

    /// Applies a catalogue function to every element of every list
    pub fn apply_function(
        &mut self,
        function: CpxFunction,
        mode: CpxMode,
        params: &[Real],
    ) -> Result<()> {
        let ids: Vec<EntryId> = self.iter_ids().collect();
        for id in ids {
            self.entry_mut(id)?.list.apply_function(function, mode, params)?;
        }
        Ok(())
    }
}

/// Iterator over entry ids in traversal order
pub struct IndexIter<'a> {
    index: &'a SampleIndex,
    next: Option<EntryId>,
}

impl Iterator for IndexIter<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        let id = self.next?;
        self.next = self.index.entry(id).ok().and_then(|e| e.next());
        Some(id)
    }
}
