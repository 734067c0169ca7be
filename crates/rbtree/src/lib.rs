mod tree;

pub use tree::{Iter, RbTree};
