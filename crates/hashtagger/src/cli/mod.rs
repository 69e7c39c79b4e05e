//! Command implementations.

pub mod balance;
pub mod config;
pub mod interactive;
pub mod suggest;
pub mod train;
pub mod types;
