//! # Flow Variableizer
//!
//! Turns exported contact flows into templates: literal values named by a
//! set of block definitions are replaced with `${block_variable_identifier}`
//! placeholders, in the action parameters and in the matching designer
//! metadata alike.
//!
//! ## Usage
//!
//! ```bash
//! flow-variableizer [-v] [--rules defs.jsonc] [-o out] <FILE | DIR | --all | --single>
//! ```
//!
//! ## Modules
//!
//! - `path` - Path expressions: parsing, lookup with wildcard fan-out, writes
//! - `config` - Block definitions, the reverse map built from them, run settings
//! - `variableize` - Placeholder naming and the flow transformer
//! - `batch` - Processing many flow files into an output directory
//! - `cli` - Command-line arguments and execution
//! - `error` - Error types and codes
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod path;
pub mod variableize;

#[cfg(test)]
mod property_tests;
