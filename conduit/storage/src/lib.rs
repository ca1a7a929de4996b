mod bound;
mod codec;
mod counter;
mod item;
mod key;
mod map;
mod path;
mod prefix;

pub use {bound::*, codec::*, counter::*, item::*, key::*, map::*, path::*, prefix::*};
