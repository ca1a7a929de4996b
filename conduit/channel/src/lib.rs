mod acknowledgement;
mod client;
mod commitment;
mod config;
mod db;
mod error;
pub mod host;
mod pagination;
mod query;
mod reconcile;
mod registry;
mod sequence;
mod service;
mod state;

pub use crate::{
    acknowledgement::*, client::*, commitment::*, config::*, db::*, error::*, pagination::*,
    query::*, reconcile::*, registry::*, sequence::*, service::*, state::*,
};
