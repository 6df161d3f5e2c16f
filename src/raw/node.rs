use super::handle::Handle;

/// Which child link of a parent a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// The slot holding a subtree root: either the tree's root or a child link of `parent`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Link {
    Root,
    Child { parent: Handle, side: Side },
}

/// A binary tree node. There is no parent pointer; the tree is walked top-down.
#[derive(Clone)]
pub(crate) struct Node<T> {
    record: T,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<T> Node<T> {
    /// Creates a childless node.
    pub(crate) const fn leaf(record: T) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn record(&self) -> &T {
        &self.record
    }

    #[inline]
    pub(crate) const fn record_mut(&mut self) -> &mut T {
        &mut self.record
    }

    /// Swaps in a new payload, returning the old one. Links are untouched.
    pub(crate) fn replace_record(&mut self, record: T) -> T {
        core::mem::replace(&mut self.record, record)
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    pub(crate) fn into_record(self) -> T {
        self.record
    }

    /// Consumes the node, returning its record and child links.
    pub(crate) fn into_parts(self) -> (T, Option<Handle>, Option<Handle>) {
        (self.record, self.left, self.right)
    }
}
