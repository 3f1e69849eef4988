//! Ordered segment storage.
//!
//! Segments live in an arena and are ordered through an intrusive doubly
//! linked list, so inserting next to a known segment is O(1) and slot indices
//! never move. Slots are only released all at once by [`SegmentStore::clear`].

use crate::segment::Segment;

#[derive(Debug)]
struct Slot {
    segment: Segment,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct SegmentStore {
    slots: Vec<Slot>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl SegmentStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) const fn contains(&self, slot: usize) -> bool {
        slot < self.slots.len()
    }

    pub(crate) fn get(&self, slot: usize) -> Option<&Segment> {
        self.slots.get(slot).map(|entry| &entry.segment)
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut Segment> {
        self.slots.get_mut(slot).map(|entry| &mut entry.segment)
    }

    pub(crate) const fn first(&self) -> Option<usize> {
        self.head
    }

    pub(crate) const fn last(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn previous(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).and_then(|entry| entry.prev)
    }

    pub(crate) fn next(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).and_then(|entry| entry.next)
    }

    pub(crate) fn push_back(&mut self, segment: Segment) -> usize {
        let slot = self.slots.len();
        self.slots.push(Slot {
            segment,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.set_next(tail, Some(slot)),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        slot
    }

    pub(crate) fn push_front(&mut self, segment: Segment) -> usize {
        let slot = self.slots.len();
        self.slots.push(Slot {
            segment,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(head) => self.set_prev(head, Some(slot)),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        slot
    }

    /// Inserts `segment` directly before `anchor`; `None` if the anchor is unknown.
    pub(crate) fn insert_before(&mut self, anchor: usize, segment: Segment) -> Option<usize> {
        let prev = self.slots.get(anchor)?.prev;
        let slot = self.slots.len();
        self.slots.push(Slot {
            segment,
            prev,
            next: Some(anchor),
        });
        self.set_prev(anchor, Some(slot));
        match prev {
            Some(before) => self.set_next(before, Some(slot)),
            None => self.head = Some(slot),
        }
        Some(slot)
    }

    /// Inserts `segment` directly after `anchor`; `None` if the anchor is unknown.
    pub(crate) fn insert_after(&mut self, anchor: usize, segment: Segment) -> Option<usize> {
        let next = self.slots.get(anchor)?.next;
        let slot = self.slots.len();
        self.slots.push(Slot {
            segment,
            prev: Some(anchor),
            next,
        });
        self.set_next(anchor, Some(slot));
        match next {
            Some(after) => self.set_prev(after, Some(slot)),
            None => self.tail = Some(slot),
        }
        Some(slot)
    }

    /// Segments in document order.
    pub(crate) const fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            cursor: self.head,
        }
    }

    /// Segments before `slot`, nearest first.
    pub(crate) fn preceding(&self, slot: usize) -> Preceding<'_> {
        Preceding {
            store: self,
            cursor: self.previous(slot),
        }
    }

    /// Concatenates every non-empty segment in order.
    pub(crate) fn reconstruct(&self) -> String {
        let capacity = self.iter().map(|(_, segment)| segment.text().len()).sum();
        let mut text = String::with_capacity(capacity);
        for (_, segment) in self.iter().filter(|(_, segment)| !segment.is_empty()) {
            text.push_str(segment.text());
        }
        text
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.tail = None;
    }

    fn set_next(&mut self, slot: usize, next: Option<usize>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            entry.next = next;
        }
    }

    fn set_prev(&mut self, slot: usize, prev: Option<usize>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            entry.prev = prev;
        }
    }
}

pub(crate) struct Iter<'a> {
    store: &'a SegmentStore,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Segment);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let entry = self.store.slots.get(slot)?;
        self.cursor = entry.next;
        Some((slot, &entry.segment))
    }
}

pub(crate) struct Preceding<'a> {
    store: &'a SegmentStore,
    cursor: Option<usize>,
}

impl<'a> Iterator for Preceding<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let entry = self.store.slots.get(slot)?;
        self.cursor = entry.prev;
        Some(&entry.segment)
    }
}
