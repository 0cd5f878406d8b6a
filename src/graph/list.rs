//! list.rs
//! Intrusive doubly-linked list of live stations, with one built-in cursor.
//!
//! Links are kept in columns indexed by `StationId` rather than inside the
//! stations. The cursor always points at the *next* station to visit, so the
//! current station may be unlinked while a walk is in progress; unlinking the
//! station the cursor points at moves the cursor to its successor first.

use crate::store::StationId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationCursor {
    next: Option<StationId>,
}

impl StationCursor {
    pub fn peek(&self) -> Option<StationId> {
        self.next
    }
}

#[derive(Debug, Clone, Default)]
pub struct StationList {
    head: Option<StationId>,
    next: Vec<Option<StationId>>,
    prev: Vec<Option<StationId>>,
    linked: Vec<bool>,
    len: usize,
    cursor: StationCursor,
}

impl StationList {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn head(&self) -> Option<StationId> { self.head }

    pub fn contains(&self, stn: StationId) -> bool {
        self.linked.get(stn.index()).copied().unwrap_or(false)
    }

    pub fn next_of(&self, stn: StationId) -> Option<StationId> {
        self.next.get(stn.index()).copied().flatten()
    }

    pub fn prev_of(&self, stn: StationId) -> Option<StationId> {
        self.prev.get(stn.index()).copied().flatten()
    }

    fn ensure(&mut self, stn: StationId) {
        let need = stn.index() + 1;
        if self.next.len() < need {
            self.next.resize(need, None);
            self.prev.resize(need, None);
            self.linked.resize(need, false);
        }
    }

    /// O(1) push at the front.
    pub fn insert_at_head(&mut self, stn: StationId) {
        self.ensure(stn);
        debug_assert!(!self.linked[stn.index()], "station {stn:?} is already on the list");
        debug_assert_ne!(self.cursor.next, Some(stn));

        self.next[stn.index()] = self.head;
        self.prev[stn.index()] = None;
        if let Some(old_head) = self.head {
            self.prev[old_head.index()] = Some(stn);
        }
        self.head = Some(stn);
        self.linked[stn.index()] = true;
        self.len += 1;
    }

    /// O(1) unlink. Returns `false` if the station was not on the list.
    pub fn remove(&mut self, stn: StationId) -> bool {
        if !self.contains(stn) {
            return false;
        }
        let idx = stn.index();
        let (prev, next) = (self.prev[idx], self.next[idx]);

        if self.cursor.next == Some(stn) {
            self.cursor.next = next;
        }

        match prev {
            None => self.head = next,
            Some(p) => self.next[p.index()] = next,
        }
        if let Some(n) = next {
            self.prev[n.index()] = prev;
        }

        self.next[idx] = None;
        self.prev[idx] = None;
        self.linked[idx] = false;
        self.len -= 1;
        true
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { list: self, at: self.head }
    }

    // --- Cursor ---

    pub fn cursor(&self) -> StationCursor {
        self.cursor
    }

    /// Points the cursor back at the head.
    pub fn rewind(&mut self) {
        self.cursor.next = self.head;
    }

    /// Yields the station under the cursor and steps past it.
    pub fn advance(&mut self) -> Option<StationId> {
        let current = self.cursor.next?;
        self.cursor.next = self.next_of(current);
        Some(current)
    }
}

pub struct Iter<'a> {
    list: &'a StationList,
    at: Option<StationId>,
}

impl Iterator for Iter<'_> {
    type Item = StationId;

    fn next(&mut self) -> Option<StationId> {
        let current = self.at?;
        self.at = self.list.next_of(current);
        Some(current)
    }
}
