//! Recency List Module
//!
//! Doubly linked list of cache entries ordered from most- to least-recently
//! used. Nodes live in a slot arena and link to each other by index, so every
//! operation is O(1) without unsafe pointer juggling.
//!
//! Two sentinel slots bound the list:
//! - `HEAD` (slot 0): `HEAD.next` is the most recently used node
//! - `TAIL` (slot 1): `TAIL.prev` is the least recently used node
//!
//! Sentinels are never freed and never carry an entry.

use crate::cache::CacheEntry;

const HEAD: usize = 0;
const TAIL: usize = 1;

// == Node Id ==
/// Handle to a node in a [`RecencyList`].
///
/// The key index stores these as non-owning references; the list owns the
/// node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Slot<V> {
    prev: usize,
    next: usize,
    entry: Option<CacheEntry<V>>,
}

impl<V> Slot<V> {
    fn sentinel(prev: usize, next: usize) -> Self {
        Self {
            prev,
            next,
            entry: None,
        }
    }
}

// == Recency List ==
#[derive(Debug)]
pub struct RecencyList<V> {
    slots: Vec<Slot<V>>,
    /// Freed slot indices available for reuse
    free: Vec<usize>,
    len: usize,
}

impl<V> Default for RecencyList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecencyList<V> {
    // == Constructor ==
    /// Creates an empty list containing only the two sentinels.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    ///
    /// One extra slot is reserved because an insert may briefly exceed the
    /// cache capacity before eviction.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity + 3);
        slots.push(Slot::sentinel(HEAD, TAIL));
        slots.push(Slot::sentinel(HEAD, TAIL));
        Self {
            slots,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Insert Front ==
    /// Creates a node for `entry` and links it right after the head sentinel.
    pub fn insert_front(&mut self, entry: CacheEntry<V>) -> NodeId {
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx].entry = Some(entry);
                idx
            }
            None => {
                self.slots.push(Slot {
                    prev: HEAD,
                    next: TAIL,
                    entry: Some(entry),
                });
                self.slots.len() - 1
            }
        };

        self.attach_front(idx);
        self.len += 1;
        NodeId(idx)
    }

    // == Promote ==
    /// Moves a node to the front (most recently used).
    ///
    /// Stale ids are ignored.
    pub fn promote(&mut self, id: NodeId) {
        if !self.is_live(id) || self.slots[HEAD].next == id.0 {
            return;
        }
        self.detach(id.0);
        self.attach_front(id.0);
    }

    // == Unlink ==
    /// Removes a node from the list and returns its entry.
    ///
    /// Returns None and leaves the list untouched if `id` does not refer to a
    /// live node.
    pub fn unlink(&mut self, id: NodeId) -> Option<CacheEntry<V>> {
        if !self.is_live(id) {
            return None;
        }

        self.detach(id.0);
        self.len -= 1;
        self.free.push(id.0);
        self.slots[id.0].entry.take()
    }

    // == Accessors ==
    /// Returns the most recently used node.
    pub fn front(&self) -> Option<NodeId> {
        let idx = self.slots[HEAD].next;
        (idx != TAIL).then_some(NodeId(idx))
    }

    /// Returns the least recently used node (tail-adjacent).
    pub fn back(&self) -> Option<NodeId> {
        let idx = self.slots[TAIL].prev;
        (idx != HEAD).then_some(NodeId(idx))
    }

    pub fn get(&self, id: NodeId) -> Option<&CacheEntry<V>> {
        self.slots.get(id.0).and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CacheEntry<V>> {
        self.slots.get_mut(id.0).and_then(|slot| slot.entry.as_mut())
    }

    /// Returns the number of linked nodes, sentinels excluded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            cursor: self.slots[HEAD].next,
            forward: true,
        }
    }

    /// Iterates entries from least to most recently used.
    pub fn iter_lru(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            cursor: self.slots[TAIL].prev,
            forward: false,
        }
    }

    // == Clear ==
    /// Drops every node, keeping only the sentinels.
    pub fn clear(&mut self) {
        self.slots.truncate(2);
        self.slots[HEAD].next = TAIL;
        self.slots[TAIL].prev = HEAD;
        self.free.clear();
        self.len = 0;
    }

    // == Link Helpers ==
    fn is_live(&self, id: NodeId) -> bool {
        id.0 > TAIL && self.get(id).is_some()
    }

    fn attach_front(&mut self, idx: usize) {
        let first = self.slots[HEAD].next;
        self.slots[idx].prev = HEAD;
        self.slots[idx].next = first;
        self.slots[first].prev = idx;
        self.slots[HEAD].next = idx;
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }
}

// == Iterator ==
pub struct Iter<'a, V> {
    list: &'a RecencyList<V>,
    cursor: usize,
    forward: bool,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a CacheEntry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = &self.list.slots[self.cursor];
        let entry = slot.entry.as_ref()?;
        self.cursor = if self.forward { slot.next } else { slot.prev };
        Some(entry)
    }
}
