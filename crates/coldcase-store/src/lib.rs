//! SQLite persistence for the coldcase record store.
//!
//! Three relations: missing persons, unidentified bodies, and the match join
//! table between them. One synchronous connection, one statement per
//! operation, no multi-write transactions.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod records;

pub use error::{Error, Result};
pub use records::{
    MatchDetail, MatchRecord, MissingPerson, NewMissingPerson, NewUnidentifiedBody, Stats,
    UnidentifiedBody, STATUS_MISSING, STATUS_UNIDENTIFIED,
};
pub use store::Store;

#[cfg(test)]
mod tests;
