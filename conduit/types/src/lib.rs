mod binary;
mod buffer;
mod channel;
mod connection;
mod error;
mod hash;
mod height;
mod identifier;
mod packet;
mod serializers;
mod storage;
mod testing;
mod utils;

pub use {
    binary::*, buffer::*, channel::*, connection::*, error::*, hash::*, height::*, identifier::*,
    packet::*, serializers::*, storage::*, testing::*, utils::*,
};

// -------------------------------- re-exports ---------------------------------

pub use serde_json::{json, Value as Json};
