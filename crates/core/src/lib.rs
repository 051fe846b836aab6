//! Stockroom domain core.
//!
//! - [`reservation`] -- batch reserve / free with per-item partial success.
//! - [`auth`] -- token codec, credential verifier, and the auth service.
//! - [`catalog`] -- read-only listing of the stock lines in a warehouse.
//! - [`storage`] -- the storage port the services program against, plus an
//!   in-memory implementation.
//!
//! Nothing in this crate knows about HTTP or SQL.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod reservation;
pub mod roles;
pub mod storage;
pub mod types;
