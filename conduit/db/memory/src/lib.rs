mod db;
mod error;
mod versioned_map;

pub use crate::{db::*, error::*, versioned_map::*};
