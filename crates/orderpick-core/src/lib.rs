//! Orderpick Core Library
//!
//! Selection reconciliation for order line items and collision-checked
//! location identifier generation.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod identifier;
pub mod identity;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod selection;
pub mod session;
