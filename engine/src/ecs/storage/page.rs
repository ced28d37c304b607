//! A fixed-capacity segment of a [`PagedStore`](super::PagedStore).

/// Marks an unused slot in either index array.
const EMPTY: usize = usize::MAX;

/// One page of `N` slots.
///
/// A page keeps its values in a dense `Vec` sorted by slot, with two index arrays mapping between
/// the sparse and dense positions:
///
/// ```text
/// slots:       0  1  2  3  4  5  ...
/// index:       -  0  -  1  -  2       slot → dense position
/// back_index:  1  3  5  -  -  -       dense position → slot
/// data:       [a, b, c]               sorted by slot, no gaps
/// ```
///
/// Appending past the highest live slot is O(1). Placing a value below it, or removing any value,
/// shifts the tail of the dense array by one and rewrites the affected mappings.
pub(crate) struct Page<T, const N: usize> {
    /// Slot → dense position.
    index: [usize; N],

    /// Dense position → slot.
    back_index: [usize; N],

    /// Values, sorted by slot.
    data: Vec<T>,
}

impl<T, const N: usize> Page<T, N> {
    /// Create an empty page with room for `N` values.
    pub fn new() -> Self {
        Self {
            index: [EMPTY; N],
            back_index: [EMPTY; N],
            data: Vec::with_capacity(N),
        }
    }

    /// The number of live values.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no slot holds a value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn exists(&self, slot: usize) -> bool {
        self.index[slot] != EMPTY
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&T> {
        match self.index[slot] {
            EMPTY => None,
            pos => Some(&self.data[pos]),
        }
    }

    #[inline]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        match self.index[slot] {
            EMPTY => None,
            pos => Some(&mut self.data[pos]),
        }
    }

    /// Get the value in `slot`, placing `make()` there first if the slot is empty.
    pub fn get_or_place(&mut self, slot: usize, make: impl FnOnce() -> T) -> &mut T {
        if self.index[slot] == EMPTY {
            self.place(slot, make());
        }
        let pos = self.index[slot];
        &mut self.data[pos]
    }

    /// Store `value` in `slot`, dropping any previous value.
    pub fn set(&mut self, slot: usize, value: T) -> &mut T {
        match self.index[slot] {
            EMPTY => self.place(slot, value),
            pos => self.data[pos] = value,
        }
        let pos = self.index[slot];
        &mut self.data[pos]
    }

    /// Remove and return the value in `slot`, compacting the dense array.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        let pos = self.index[slot];
        if pos == EMPTY {
            return None;
        }

        let value = self.data.remove(pos);
        let size = self.data.len();

        // Everything after `pos` moved one position left.
        for i in pos..size {
            let moved = self.back_index[i + 1];
            self.back_index[i] = moved;
            self.index[moved] = i;
        }

        self.back_index[size] = EMPTY;
        self.index[slot] = EMPTY;

        Some(value)
    }

    /// The lowest live slot.
    #[inline]
    pub fn min_slot(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.back_index[0])
    }

    /// The highest live slot.
    #[inline]
    pub fn max_slot(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.back_index[self.data.len() - 1])
    }

    /// Iterate over `(slot, value)` in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.back_index[..self.data.len()]
            .iter()
            .copied()
            .zip(self.data.iter())
    }

    /// Iterate mutably over `(slot, value)` in ascending slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        let len = self.data.len();
        self.back_index[..len]
            .iter()
            .copied()
            .zip(self.data.iter_mut())
    }

    /// Place a value into an empty slot, keeping the dense array sorted.
    fn place(&mut self, slot: usize, value: T) {
        debug_assert_eq!(self.index[slot], EMPTY);

        let size = self.data.len();

        // Fast path: the new slot is above every live slot.
        if size == 0 || self.back_index[size - 1] < slot {
            self.index[slot] = size;
            self.back_index[size] = slot;
            self.data.push(value);
            return;
        }

        // Dense position of the first live slot above `slot`. The back index is sorted.
        let pos = self.back_index[..size].partition_point(|&s| s < slot);

        // Open a gap at `pos` by moving the mappings of the tail one position right.
        for i in (pos..size).rev() {
            let moved = self.back_index[i];
            self.back_index[i + 1] = moved;
            self.index[moved] = i + 1;
        }

        self.index[slot] = pos;
        self.back_index[pos] = slot;
        self.data.insert(pos, value);
    }

    /// Check that both index arrays agree with each other and the dense array is sorted.
    #[cfg(test)]
    pub fn check_invariants(&self) {
        let size = self.data.len();
        for pos in 0..size {
            assert_eq!(self.index[self.back_index[pos]], pos);
            if pos > 0 {
                assert!(self.back_index[pos - 1] < self.back_index[pos]);
            }
        }
        assert!(self.back_index[size..].iter().all(|&s| s == EMPTY));
        assert_eq!(self.index.iter().filter(|&&p| p != EMPTY).count(), size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestPage = Page<u32, 8>;

    fn slots(page: &TestPage) -> Vec<usize> {
        page.iter().map(|(slot, _)| slot).collect()
    }

    #[test]
    fn tail_placement_appends() {
        // Given
        let mut page = TestPage::new();

        // When
        page.set(1, 10);
        page.set(4, 40);
        page.set(7, 70);

        // Then
        page.check_invariants();
        assert_eq!(slots(&page), vec![1, 4, 7]);
        assert_eq!(page.get(4), Some(&40));
    }

    #[test]
    fn interior_placement_keeps_order() {
        // Given
        let mut page = TestPage::new();
        page.set(6, 60);
        page.set(2, 20);

        // When
        page.set(4, 40);
        page.set(0, 0);

        // Then
        page.check_invariants();
        assert_eq!(slots(&page), vec![0, 2, 4, 6]);
        let values: Vec<_> = page.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 20, 40, 60]);
    }

    #[test]
    fn remove_compacts_dense_array() {
        // Given
        let mut page = TestPage::new();
        for slot in [0, 3, 5, 7] {
            page.set(slot, slot as u32);
        }

        // When
        let removed = page.remove(3);

        // Then
        page.check_invariants();
        assert_eq!(removed, Some(3));
        assert_eq!(slots(&page), vec![0, 5, 7]);
        assert!(!page.exists(3));
        assert_eq!(page.get(5), Some(&5));
    }

    #[test]
    fn remove_missing_slot_is_noop() {
        let mut page = TestPage::new();
        page.set(2, 2);

        assert_eq!(page.remove(1), None);
        assert_eq!(page.len(), 1);
        page.check_invariants();
    }

    #[test]
    fn get_or_place_keeps_existing_value() {
        // Given
        let mut page = TestPage::new();
        page.set(3, 1);

        // When
        let value = *page.get_or_place(3, || 2);

        // Then
        assert_eq!(value, 1);
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn min_and_max_slots() {
        let mut page = TestPage::new();
        assert_eq!(page.min_slot(), None);
        assert_eq!(page.max_slot(), None);

        page.set(5, 0);
        page.set(2, 0);
        page.set(6, 0);

        assert_eq!(page.min_slot(), Some(2));
        assert_eq!(page.max_slot(), Some(6));
    }

    #[test]
    fn full_page_in_reverse_order() {
        // Given
        let mut page = TestPage::new();

        // When - every placement lands in the interior
        for slot in (0..8).rev() {
            page.set(slot, slot as u32 * 10);
        }

        // Then
        page.check_invariants();
        assert_eq!(page.len(), 8);
        assert_eq!(slots(&page), (0..8).collect::<Vec<_>>());

        // When - drain from the middle outwards
        for slot in [4, 3, 5, 2, 6, 1, 7, 0] {
            assert_eq!(page.remove(slot), Some(slot as u32 * 10));
            page.check_invariants();
        }

        // Then
        assert!(page.is_empty());
    }
}
