mod arena;
mod handle;
mod node;
mod raw_ordered_tree;

pub(crate) use handle::Handle;
pub(crate) use node::Side;
pub(crate) use raw_ordered_tree::{Located, RawOrderedTree, Stack};
