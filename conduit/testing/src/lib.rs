mod builder;
mod result;
mod suite;
mod tracing;

pub use {builder::*, result::*, suite::*, tracing::*};
