//! CLI command implementations

pub mod auth;
pub mod completions;
pub mod config;
pub mod doctor;
pub mod ls;
pub mod mount;
pub mod remote;
pub mod sync;
