//! Application layer: command and query handlers used by hosts.

pub mod command_handlers;
pub mod query_handlers;
