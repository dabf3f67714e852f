//! Line-delimited JSON-RPC plugin toolkit.
//!
//! A plugin process serves a small registry of pure tools over stdio, one
//! JSON-RPC request per line; the host side spawns plugin processes and
//! routes tool invocations to the first plugin advertising the capability.
//!
//! The wire format is newline-delimited UTF-8 JSON. Every well-formed
//! request line produces exactly one response line carrying the same id;
//! lines that do not parse as JSON are dropped without a response.

pub mod cli;
pub mod client;
pub mod config;
pub mod handlers;
pub mod host;
pub mod protocol;
pub mod registry;
pub mod server;

pub mod schema;
