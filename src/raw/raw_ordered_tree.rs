use core::cmp::Ordering;

use log::trace;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Link, Node, Side};
use crate::error::AllocError;

/// Explicit traversal stack. Trees are unbalanced, so this spills to the heap
/// rather than letting the call stack grow with the tree height.
pub(crate) type Stack<E> = SmallVec<[E; 16]>;

/// The core binary search tree backing `OrderedTree`.
///
/// Knows nothing about the comparator: every search takes a probe closure that reports how
/// a stored record orders relative to the target, as in `slice::binary_search_by`.
#[derive(Clone)]
pub(crate) struct RawOrderedTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of records in the tree.
    len: usize,
}

/// Where a probe ended up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Located {
    /// A record compared equal; `link` is the slot `node` hangs from.
    Found { link: Link, node: Handle },
    /// No record compared equal; `link` is the empty slot a new node would occupy.
    Vacant { link: Link },
}

impl<T> RawOrderedTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Largest number of records a tree can hold.
    pub(crate) const MAX_LEN: usize = Arena::<Node<T>>::MAX_LEN;

    /// Returns the number of records in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no records.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.nodes.try_reserve(additional)
    }

    /// Drops every record.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    /// Removes a node from the arena without relinking anything.
    ///
    /// Only for consuming walks that never look at the tree's links again.
    pub(crate) fn take_node(&mut self, handle: Handle) -> Node<T> {
        self.len -= 1;
        self.nodes.take(handle)
    }

    /// Walks down from the root following `probe` until a record compares equal or
    /// the walk falls off the tree.
    pub(crate) fn locate<F>(&self, mut probe: F) -> Located
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut link = Link::Root;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let side = match probe(node.record()) {
                Ordering::Equal => return Located::Found { link, node: handle },
                // The stored record sorts before the target, so the target lies to the right.
                Ordering::Less => Side::Right,
                Ordering::Greater => Side::Left,
            };
            link = Link::Child { parent: handle, side };
            current = node.child(side);
        }

        Located::Vacant { link }
    }

    pub(crate) fn get_by<F>(&self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.locate(probe) {
            Located::Found { node, .. } => Some(self.nodes.get(node).record()),
            Located::Vacant { .. } => None,
        }
    }

    pub(crate) fn get_mut_by<F>(&mut self, probe: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.locate(probe) {
            Located::Found { node, .. } => Some(self.nodes.get_mut(node).record_mut()),
            Located::Vacant { .. } => None,
        }
    }

    pub(crate) fn record_mut(&mut self, handle: Handle) -> &mut T {
        self.nodes.get_mut(handle).record_mut()
    }

    /// Hangs a new leaf holding `record` from the empty slot `link`.
    ///
    /// If no node can be allocated the tree is unchanged and `record` is handed back.
    pub(crate) fn attach(&mut self, link: Link, record: T) -> Result<Handle, (T, AllocError)> {
        let handle = self
            .nodes
            .try_alloc(Node::leaf(record))
            .map_err(|(node, err)| (node.into_record(), err))?;
        self.set_link(link, Some(handle));
        self.len += 1;
        Ok(handle)
    }

    /// Removes the node `node`, which hangs from `link`, and returns its record.
    ///
    /// A node with two children keeps its place in the tree: its in-order successor's record is
    /// moved into it and the successor node, which has no left child, is spliced out instead.
    pub(crate) fn remove_at(&mut self, link: Link, node: Handle) -> T {
        let found = self.nodes.get(node);
        let removed = if let (Some(_), Some(right)) = (found.left(), found.right()) {
            let mut successor_link = Link::Child {
                parent: node,
                side: Side::Right,
            };
            let mut successor = right;
            while let Some(left) = self.nodes.get(successor).left() {
                successor_link = Link::Child {
                    parent: successor,
                    side: Side::Left,
                };
                successor = left;
            }

            trace!("removing node {node:?} with two children via successor {successor:?}");
            let record = self.splice(successor_link, successor);
            self.nodes.get_mut(node).replace_record(record)
        } else {
            self.splice(link, node)
        };

        self.len -= 1;
        removed
    }

    /// Replaces `node` in `link` with its only child (or nothing) and frees it.
    fn splice(&mut self, link: Link, node: Handle) -> T {
        let (record, left, right) = self.nodes.take(node).into_parts();
        debug_assert!(left.is_none() || right.is_none(), "`splice()` - node has two children!");
        self.set_link(link, left.or(right));
        record
    }

    fn set_link(&mut self, link: Link, child: Option<Handle>) {
        match link {
            Link::Root => self.root = child,
            Link::Child { parent, side } => self.nodes.get_mut(parent).set_child(side, child),
        }
    }

    /// Returns the record at the end of the leftmost or rightmost path.
    pub(crate) fn extreme(&self, side: Side) -> Option<&T> {
        let mut current = self.root?;
        while let Some(next) = self.nodes.get(current).child(side) {
            current = next;
        }
        Some(self.nodes.get(current).record())
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Stack<(Handle, usize)> = self.root.into_iter().map(|h| (h, 1)).collect();

        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.nodes.get(handle);
            stack.extend([node.left(), node.right()].into_iter().flatten().map(|h| (h, depth + 1)));
        }

        height
    }

    /// Empties the tree, handing records to `f` children-first (left subtree, right subtree,
    /// then the node itself).
    pub(crate) fn drain_post_order<F>(&mut self, mut f: F)
    where
        F: FnMut(T),
    {
        // `true` marks a node whose children have already been pushed.
        let mut stack: Stack<(Handle, bool)> = self.root.into_iter().map(|h| (h, false)).collect();

        while let Some((handle, expanded)) = stack.pop() {
            if expanded {
                let (record, _, _) = self.nodes.take(handle).into_parts();
                f(record);
            } else {
                stack.push((handle, true));
                let node = self.nodes.get(handle);
                stack.extend([node.right(), node.left()].into_iter().flatten().map(|h| (h, false)));
            }
        }

        self.clear();
    }
}
