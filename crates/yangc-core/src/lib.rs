//! yangc-core: Pure YANG front-end library
//!
//! This crate parses YANG (RFC 7950) source text into typed module trees
//! and resolves cross-module references (imports, includes, prefixes).
//! It is designed to be `no_std` compatible and IO-free: sources arrive
//! as strings, and import targets are loaded through a caller-supplied
//! provider.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod registry;

pub use error::Error;
pub use registry::Modules;
