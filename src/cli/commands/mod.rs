//! CLI command implementations

pub mod config;
pub mod pages;
pub mod render;
pub mod validate;
