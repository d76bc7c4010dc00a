mod quadtree;

pub use quadtree::*;

#[cfg(test)]
mod quadtree_tests;
