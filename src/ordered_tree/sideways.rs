use core::fmt::{self, Write};

use super::OrderedTree;
use crate::raw::{Handle, Stack};

const INDENT: &str = "    ";

/// Renders an [`OrderedTree`] rotated a quarter turn counter-clockwise.
///
/// Created by [`OrderedTree::sideways`].
pub struct Sideways<'a, T, C> {
    tree: &'a OrderedTree<T, C>,
}

impl<T, C> OrderedTree<T, C> {
    /// Writes the shape of the tree to `out`, one record per line.
    ///
    /// The root sits in the first column. Each level below it is indented by four more spaces,
    /// right subtrees are printed above their parent and left subtrees below, so the output
    /// reads as the tree turned on its side. `visit` writes a single record, without the newline.
    ///
    /// This is a debugging aid; the format is not meant for parsing.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `out` or `visit`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::fmt::Write;
    ///
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for n in [2, 1, 3] {
    ///     tree.insert(n, |_| {}).unwrap();
    /// }
    ///
    /// let mut out = String::new();
    /// tree.write_sideways(&mut out, |out, n| write!(out, "<{n}>")).unwrap();
    /// assert_eq!(out, "    <3>\n<2>\n    <1>\n");
    /// ```
    pub fn write_sideways<W, F>(&self, out: &mut W, mut visit: F) -> fmt::Result
    where
        W: Write + ?Sized,
        F: FnMut(&mut W, &T) -> fmt::Result,
    {
        let raw = &self.raw;
        let mut stack: Stack<(Handle, usize)> = Stack::new();
        let mut current = raw.root();
        let mut depth = 0;

        loop {
            while let Some(handle) = current {
                stack.push((handle, depth));
                current = raw.node(handle).right();
                depth += 1;
            }

            let Some((handle, level)) = stack.pop() else {
                return Ok(());
            };
            let node = raw.node(handle);
            for _ in 0..level {
                out.write_str(INDENT)?;
            }
            visit(out, node.record())?;
            out.write_char('\n')?;

            current = node.left();
            depth = level + 1;
        }
    }

    /// Returns a [`Display`](fmt::Display) adapter that prints the tree sideways using each
    /// record's own `Display`. See [`write_sideways`](OrderedTree::write_sideways).
    ///
    /// # Examples
    ///
    /// ```
    /// use sapling::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// for word in ["m", "c", "x", "a"] {
    ///     tree.insert(word, |_| {}).unwrap();
    /// }
    ///
    /// assert_eq!(tree.sideways().to_string(), "    x\nm\n    c\n        a\n");
    /// ```
    pub fn sideways(&self) -> Sideways<'_, T, C> {
        Sideways { tree: self }
    }
}

impl<T: fmt::Display, C> fmt::Display for Sideways<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.write_sideways(f, |f, record| write!(f, "{record}"))
    }
}

impl<T, C> fmt::Debug for Sideways<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sideways").field("len", &self.tree.len()).finish()
    }
}
