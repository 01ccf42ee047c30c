//! CLI commands for orderpick

pub mod dispatch;
pub mod generate_id;
pub mod list;
pub mod select;
