//! MCP Hub CLI library.
//!
//! Exposes the command implementations and output formatters so they can
//! be tested independently of the binary.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unnecessary_wraps)]

pub mod commands;
pub mod formatters;
