use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use log::warn;

use crate::error::InsertError;
use crate::raw::{Handle, Located, RawOrderedTree, Side, Stack};

mod capacity;
mod sideways;

pub use sideways::Sideways;

/// The comparator type used by [`OrderedTree::new`]: the record type's own [`Ord`].
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// The outcome of a successful [`OrderedTree::insert`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Insert<T> {
    /// The record was stored in a new node.
    Inserted,
    /// A record comparing equal was already present. The merge callback ran on the stored
    /// record and the incoming one is handed back, untouched.
    Merged(T),
}

/// An ordered collection of records, kept as an unbalanced [binary search tree].
///
/// Records are ordered by a comparator fixed when the tree is created. [`OrderedTree::new`]
/// uses the record type's [`Ord`]; [`OrderedTree::with_comparator`] accepts any closure, which
/// makes it easy to order records by one field while carrying others along. Records comparing
/// equal are never stored twice: inserting one runs a caller-supplied merge callback on the
/// record already in the tree instead.
///
/// The tree does no rebalancing. Its height depends on insertion order and in the worst case
/// (sorted input) equals the number of records. Every operation walks the tree with loops and
/// explicit stacks, so deep trees are slow but never overflow the call stack.
///
/// It is a logic error for a record to be modified in such a way that its ordering relative to
/// any other record, as determined by the comparator, changes while it is in the tree. This is
/// only possible through [`get_mut`](OrderedTree::get_mut), the merge callback of
/// [`insert`](OrderedTree::insert), interior mutability, or a comparator that is not a total
/// order. The behavior resulting from such a logic error is not specified, but will be
/// encapsulated to the `OrderedTree` that observed the logic error and not result in undefined
/// behavior.
///
/// # Examples
///
/// Counting words, ordered by the word alone:
///
/// ```
/// use sapling::{Insert, OrderedTree};
///
/// #[derive(Debug)]
/// struct Word {
///     text: String,
///     count: u32,
/// }
///
/// let mut words = OrderedTree::with_comparator(|a: &Word, b: &Word| a.text.cmp(&b.text));
///
/// for text in "the cat saw the dog".split_whitespace() {
///     let word = Word { text: text.to_string(), count: 1 };
///     match words.insert(word, |existing| existing.count += 1) {
///         Ok(Insert::Inserted) => {}
///         // The duplicate comes back to us; dropping it frees it.
///         Ok(Insert::Merged(_duplicate)) => {}
///         Err(e) => panic!("{e}"),
///     }
/// }
///
/// assert_eq!(words.count(), 4);
///
/// let probe = Word { text: "the".to_string(), count: 0 };
/// assert_eq!(words.get(&probe).map(|w| w.count), Some(2));
///
/// let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
/// assert_eq!(texts, ["cat", "dog", "saw", "the"]);
/// ```
///
/// [binary search tree]: https://en.wikipedia.org/wiki/Binary_search_tree
pub struct OrderedTree<T, C = Comparator<T>> {
    raw: RawOrderedTree<T>,
    cmp: C,
}

/// An iterator over the records of an `OrderedTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedTree`]. Iterating from the back
/// yields descending order.
///
/// [`iter`]: OrderedTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: &'a RawOrderedTree<T>,
    // Nodes whose left subtrees have been, or are being, yielded from the front.
    front: Stack<Handle>,
    // Mirror image of `front`, filled on the first call to `next_back`.
    back: Stack<Handle>,
    back_primed: bool,
    remaining: usize,
}

/// An owning iterator over the records of an `OrderedTree`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`OrderedTree`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<T> {
    tree: RawOrderedTree<T>,
    stack: Stack<Handle>,
}

/// Pushes `from` and its chain of `side` children onto `stack`.
fn push_spine<T>(tree: &RawOrderedTree<T>, stack: &mut Stack<Handle>, mut from: Option<Handle>, side: Side) {
    while let Some(handle) = from {
        stack.push(handle);
        from = tree.node(handle).child(side);
    }
}

impl<T: Ord> OrderedTree<T> {
    /// Makes a new, empty `OrderedTree` ordered by `T`'s [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert("b", |_| {}).unwrap();
    /// tree.insert("a", |_| {}).unwrap();
    /// assert_eq!(tree.first(), Some(&"a"));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(T::cmp)
    }
}

impl<T, C> OrderedTree<T, C> {
    /// Makes a new, empty `OrderedTree` ordered by `cmp`.
    ///
    /// `cmp` must be a strict total order over the records that will be stored. It is called as
    /// `cmp(incoming, stored)` on insert and `cmp(key, stored)` on lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// // Largest first.
    /// let mut tree = OrderedTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// for n in [3, 9, 1] {
    ///     tree.insert(n, |_| {}).unwrap();
    /// }
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [9, 3, 1]);
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self {
            raw: RawOrderedTree::new(),
            cmp,
        }
    }

    /// Returns the number of records in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.count(), 0);
    /// tree.insert(1, |_| {}).unwrap();
    /// tree.insert(1, |_| {}).unwrap();
    /// assert_eq!(tree.count(), 1);
    /// ```
    #[must_use]
    pub const fn count(&self) -> usize {
        self.raw.len()
    }

    /// Returns the number of records in the tree. Same as [`count`](OrderedTree::count).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns a reference to the comparator.
    pub const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Drops every record, keeping the comparator.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    ///
    /// An empty tree has height 0. Since the tree never rebalances, this ranges from about
    /// log<sub>2</sub>(n) for random insertion order up to n for sorted insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for n in 0..10 {
    ///     tree.insert(n, |_| {}).unwrap();
    /// }
    /// assert_eq!(tree.height(), 10);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the smallest record.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.extreme(Side::Left)
    }

    /// Returns the largest record.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.extreme(Side::Right)
    }

    /// Returns the record for which `probe` returns [`Ordering::Equal`].
    ///
    /// `probe` reports how a stored record orders relative to the target, like the closure given
    /// to [`slice::binary_search_by`]. It must agree with the tree's comparator. This allows
    /// lookups by a borrowed key without building a whole record.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::with_comparator(|a: &(String, u32), b: &(String, u32)| a.0.cmp(&b.0));
    /// tree.insert(("apple".to_string(), 3), |_| {}).unwrap();
    ///
    /// let found = tree.get_by(|(name, _)| name.as_str().cmp("apple"));
    /// assert_eq!(found.map(|(_, n)| *n), Some(3));
    /// ```
    pub fn get_by<F>(&self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.raw.get_by(probe)
    }

    /// Removes and returns the record for which `probe` returns [`Ordering::Equal`].
    ///
    /// See [`get_by`](OrderedTree::get_by) for the meaning of `probe`.
    pub fn remove_by<F>(&mut self, probe: F) -> Option<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.raw.locate(probe) {
            Located::Found { link, node } => Some(self.raw.remove_at(link, node)),
            Located::Vacant { .. } => None,
        }
    }

    /// Gets an iterator over the records of the tree, in ascending order.
    ///
    /// The iterator is double-ended: `tree.iter().rev()` walks in descending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for n in [2, 3, 1] {
    ///     tree.insert(n, |_| {}).unwrap();
    /// }
    ///
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next_back(), Some(&3));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        let mut front = Stack::new();
        push_spine(&self.raw, &mut front, self.raw.root(), Side::Left);
        Iter {
            tree: &self.raw,
            front,
            back: Stack::new(),
            back_primed: false,
            remaining: self.raw.len(),
        }
    }

    /// Calls `visit` on every record in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for word in ["b", "a", "c"] {
    ///     tree.insert(word, |_| {}).unwrap();
    /// }
    ///
    /// let mut seen = String::new();
    /// tree.traverse(|w| seen.push_str(w));
    /// assert_eq!(seen, "abc");
    /// ```
    pub fn traverse<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(visit);
    }

    /// Calls `visit` on every record in descending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for word in ["b", "a", "c"] {
    ///     tree.insert(word, |_| {}).unwrap();
    /// }
    ///
    /// let mut seen = String::new();
    /// tree.traverse_rev(|w| seen.push_str(w));
    /// assert_eq!(seen, "cba");
    /// ```
    pub fn traverse_rev<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.iter().rev().for_each(visit);
    }

    /// Tears the tree down, handing every record to `destructor`.
    ///
    /// Records are visited children-first: the left subtree, then the right subtree, then the
    /// node itself. Use this when records need explicit cleanup; otherwise dropping the tree
    /// drops every record.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for n in [2, 1, 3] {
    ///     tree.insert(n, |_| {}).unwrap();
    /// }
    ///
    /// let mut released = Vec::new();
    /// tree.destroy(|n| released.push(n));
    /// assert_eq!(released, [1, 3, 2]);
    /// ```
    pub fn destroy<F>(self, destructor: F)
    where
        F: FnMut(T),
    {
        let mut raw = self.raw;
        raw.drain_post_order(destructor);
    }
}

impl<T, C> OrderedTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Inserts `record` into the tree.
    ///
    /// - If no stored record compares equal, `record` gets a new node and
    ///   `Ok(Insert::Inserted)` is returned.
    /// - Otherwise `on_duplicate` runs once on the stored record (typically to bump a counter)
    ///   and `record` is returned in `Ok(Insert::Merged(record))`. The stored record stays in
    ///   place and the count does not change.
    /// - If no node can be allocated, the tree is left unchanged and the error carries `record`
    ///   back to the caller.
    ///
    /// `on_duplicate` must not change how the stored record orders.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError`] when node storage cannot grow.
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::{Insert, OrderedTree};
    ///
    /// let mut tree = OrderedTree::with_comparator(|a: &(char, u32), b: &(char, u32)| a.0.cmp(&b.0));
    /// assert_eq!(tree.insert(('x', 1), |e| e.1 += 1).unwrap(), Insert::Inserted);
    /// assert_eq!(tree.insert(('x', 1), |e| e.1 += 1).unwrap(), Insert::Merged(('x', 1)));
    /// assert_eq!(tree.first(), Some(&('x', 2)));
    /// assert_eq!(tree.count(), 1);
    /// ```
    pub fn insert<F>(&mut self, record: T, on_duplicate: F) -> Result<Insert<T>, InsertError<T>>
    where
        F: FnOnce(&mut T),
    {
        let cmp = &self.cmp;
        match self.raw.locate(|stored| cmp(&record, stored).reverse()) {
            Located::Found { node, .. } => {
                on_duplicate(self.raw.record_mut(node));
                Ok(Insert::Merged(record))
            }
            Located::Vacant { link } => match self.raw.attach(link, record) {
                Ok(_) => Ok(Insert::Inserted),
                Err((record, e)) => {
                    warn!("insert into tree of {} records failed: {e}", self.raw.len());
                    Err(InsertError::new(record, e))
                }
            },
        }
    }

    /// Returns the stored record comparing equal to `key`.
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1, |_| {}).unwrap();
    /// assert_eq!(tree.get(&1), Some(&1));
    /// assert_eq!(tree.get(&2), None);
    /// ```
    pub fn get(&self, key: &T) -> Option<&T> {
        self.raw.get_by(|stored| (self.cmp)(key, stored).reverse())
    }

    /// Returns a mutable reference to the stored record comparing equal to `key`.
    ///
    /// Changing how the record orders is a logic error; see [`OrderedTree`].
    pub fn get_mut(&mut self, key: &T) -> Option<&mut T> {
        let cmp = &self.cmp;
        self.raw.get_mut_by(|stored| cmp(key, stored).reverse())
    }

    /// Returns `true` if a stored record compares equal to `key`.
    pub fn contains(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    /// Removes the record comparing equal to `key` and returns it.
    ///
    /// Returns `None`, leaving the tree untouched, if there is no such record. The count drops
    /// by exactly one on success.
    ///
    /// A node with two children is not unlinked: the record of its in-order successor moves into
    /// it, and the successor's node, which never has a left child, is removed instead.
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for n in [2, 1, 3] {
    ///     tree.insert(n, |_| {}).unwrap();
    /// }
    /// assert_eq!(tree.remove(&2), Some(2));
    /// assert_eq!(tree.remove(&2), None);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3]);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<T> {
        let cmp = &self.cmp;
        match self.raw.locate(|stored| cmp(key, stored).reverse()) {
            Located::Found { link, node } => Some(self.raw.remove_at(link, node)),
            Located::Vacant { .. } => None,
        }
    }
}

impl<T: Clone, C: Clone> Clone for OrderedTree<T, C> {
    fn clone(&self) -> Self {
        OrderedTree {
            raw: self.raw.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OrderedTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> Default for OrderedTree<T> {
    /// Creates an empty `OrderedTree` ordered by `T`'s [`Ord`] implementation.
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for OrderedTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the records of the tree, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for word in ["pear", "apple", "fig"] {
    ///     tree.insert(word.to_string(), |_| {}).unwrap();
    /// }
    ///
    /// let words: Vec<String> = tree.into_iter().collect();
    /// assert_eq!(words, ["apple", "fig", "pear"]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        let mut stack = Stack::new();
        push_spine(&self.raw, &mut stack, self.raw.root(), Side::Left);
        IntoIter { tree: self.raw, stack }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let tree = self.tree;
        let node = tree.node(self.front.pop()?);
        push_spine(tree, &mut self.front, node.right(), Side::Left);
        self.remaining -= 1;
        Some(node.record())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let tree = self.tree;
        if !self.back_primed {
            push_spine(tree, &mut self.back, tree.root(), Side::Right);
            self.back_primed = true;
        }
        let node = tree.node(self.back.pop()?);
        push_spine(tree, &mut self.back, node.left(), Side::Right);
        self.remaining -= 1;
        Some(node.record())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            back_primed: self.back_primed,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let handle = self.stack.pop()?;
        let (record, _, right) = self.tree.take_node(handle).into_parts();
        push_spine(&self.tree, &mut self.stack, right, Side::Left);
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.tree.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.tree.len()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::AllocError;
    use alloc::vec::Vec;

    #[test]
    fn full_tree_hands_the_record_back() {
        let mut tree = OrderedTree::new();
        // Bit-reversed order keeps the tree shallow, so filling it stays cheap.
        for i in 0..u16::MAX {
            assert_eq!(tree.insert(i.reverse_bits(), |_| {}).unwrap(), Insert::Inserted);
        }
        assert!(tree.height() < 20);
        tree.raw.validate_invariants(u16::cmp);

        let err = tree.insert(u16::MAX, |_| {}).unwrap_err();
        assert_eq!(err.alloc_error(), &AllocError::CapacityOverflow { max: usize::from(u16::MAX) });
        assert_eq!(err.into_record(), u16::MAX);
        assert_eq!(tree.count(), usize::from(u16::MAX));
        assert!(!tree.contains(&u16::MAX));

        // Merging needs no new node.
        let mut merged = false;
        assert_eq!(tree.insert(0, |_| merged = true).unwrap(), Insert::Merged(0));
        assert!(merged);

        // Neither does reusing a freed one.
        assert_eq!(tree.remove(&1), Some(1));
        assert_eq!(tree.insert(u16::MAX, |_| {}).unwrap(), Insert::Inserted);
        assert_eq!(tree.last(), Some(&u16::MAX));
        tree.raw.validate_invariants(u16::cmp);
    }

    #[test]
    fn clone_is_independent() {
        let mut a = OrderedTree::new();
        for n in [2, 1, 3] {
            a.insert(n, |_| {}).unwrap();
        }
        let mut b = a.clone();
        assert_eq!(b.remove(&2), Some(2));
        b.insert(4, |_| {}).unwrap();

        assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(b.iter().copied().collect::<Vec<_>>(), [1, 3, 4]);
        a.raw.validate_invariants(i32::cmp);
        b.raw.validate_invariants(i32::cmp);
    }

    #[test]
    fn iterator_stacks_stay_shallow_on_balanced_trees() {
        let mut tree = OrderedTree::new();
        for n in [8, 4, 12, 2, 6, 10, 14, 1, 3, 5, 7, 9, 11, 13, 15] {
            tree.insert(n, |_| {}).unwrap();
        }
        let mut iter = tree.iter();
        assert_eq!(iter.front.len(), 4);
        iter.next_back();
        assert!(iter.back.len() <= 4);
        assert_eq!(iter.len(), 14);
    }
}
