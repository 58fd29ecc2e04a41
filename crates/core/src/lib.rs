//! Domain types and pure logic shared by the DisToPia crates.
//!
//! Nothing in here talks to the database or HTTP; the storage module only
//! touches the local upload directory.

pub mod error;
pub mod lore;
pub mod storage;
pub mod types;
