mod error;
mod node;
mod proof;
mod tree;

pub use {error::*, node::*, proof::*, tree::*};
