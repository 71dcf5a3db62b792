//! Shared domain types for the SRED showcase workspace.
//!
//! Types only: no I/O, no HTTP, no database access beyond the optional
//! sqlx trait impls behind the `postgres` feature. The server, the
//! selection store, and the CLI all build on this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
