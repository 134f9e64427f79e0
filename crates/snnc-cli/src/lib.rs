//! snnc CLI crate
//!
//! Commands (see [commands]):
//! - run: load a run configuration, execute every stage, print the result payload as JSON
//! - inspect: print the canonical text of one graph variant after stage 1 or stage 2
//! - verify: parse a graph in canonical text form and check it at its stored timestep
//! - algorithms: list the algorithm registry
//!
//! The binary (src/main.rs) sets up logging and calls [`SnncCli::execute`];
//! the library surface exists so commands can be driven from tests.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::SnncCli;
