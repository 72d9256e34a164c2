//! Layout computations used while building element subtrees.

pub mod table;
