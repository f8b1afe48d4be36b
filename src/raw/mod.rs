mod arena;
mod erase;
mod handle;
mod insert;
mod node;
mod raw_rbtree;
mod search;

pub(crate) use handle::Handle;
pub(crate) use raw_rbtree::{NIL, RawRBTree};
