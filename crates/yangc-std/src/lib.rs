//! yangc-std: Filesystem loading and CLI utilities
//!
//! This crate provides convenience utilities for native Rust usage,
//! including search-path based module loading and CLI tools.

pub mod files;

pub use yangc_core;
