use core::cmp::Ordering;

use log::warn;

use super::OrderedTree;
use crate::error::AllocError;
use crate::raw::RawOrderedTree;

impl<T: Ord> OrderedTree<T> {
    /// Creates an empty tree with room for at least `capacity` records.
    ///
    /// The request is capped at the largest tree that can be built. If the storage cannot be
    /// obtained the tree starts with no reserved room, and inserts allocate as they go.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let tree: OrderedTree<i32> = OrderedTree::with_capacity(32);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, T::cmp)
    }
}

impl<T, C> OrderedTree<T, C> {
    /// Creates an empty tree ordered by `cmp` with room for at least `capacity` records.
    ///
    /// See [`with_capacity`](OrderedTree::with_capacity) for what happens when storage is short.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering,
    {
        let mut tree = OrderedTree::with_comparator(cmp);
        let wanted = capacity.min(RawOrderedTree::<T>::MAX_LEN);
        if let Err(err) = tree.raw.try_reserve(wanted) {
            warn!("could not pre-allocate room for {wanted} records: {err}");
        }
        tree
    }

    /// Returns how many records the tree can hold before node storage has to grow.
    ///
    /// Slots freed by removals are reused, so this only counts storage already obtained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Makes room for at least `additional` more records.
    ///
    /// Inserting that many records afterwards cannot fail for lack of storage.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the storage cannot be obtained; the tree is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree: OrderedTree<u8> = OrderedTree::new();
    /// tree.try_reserve(10).expect("reservation failed");
    /// assert!(tree.capacity() >= 10);
    /// assert!(tree.try_reserve(usize::MAX).is_err());
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.raw.try_reserve(additional)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::OrderedTree;
    use crate::raw::RawOrderedTree;

    #[test]
    fn oversized_request_is_capped_at_the_handle_space() {
        let mut tree: OrderedTree<u8> = OrderedTree::with_capacity(usize::MAX);
        assert!(tree.capacity() >= RawOrderedTree::<u8>::MAX_LEN);
        assert!(tree.is_empty());
        tree.insert(1, |_| {}).unwrap();
        assert_eq!(tree.get(&1), Some(&1));
    }
}
