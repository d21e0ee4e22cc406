//! Command handlers.

pub mod apply;
pub mod cache_cmd;
pub mod delete;
