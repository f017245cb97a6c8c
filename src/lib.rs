//! WVW: Webview Wizard
//!
//! Renders declarative multi-page wizard forms to HTML fragments for an
//! embedded web view, and tracks per-page completion and navigation.

pub mod cli;
pub mod core;
pub mod logging;
pub mod schema;
pub mod yaml;
