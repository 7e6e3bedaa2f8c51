//! Goose load test for the TODO list API.
//!
//! Each goose user keeps the record ids it has seen in its own session and
//! aims complete/delete requests at them. See [`scenarios`] for the weighted
//! action mix.

pub mod config;
pub mod error;
pub mod ramp;
pub mod scenarios;
pub mod session;
pub mod todo;
pub mod transactions;
