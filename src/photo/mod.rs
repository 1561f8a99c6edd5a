//! Reference photo handling
//!
//! This module handles:
//! - Loading and decoding the uploaded portrait (loader.rs)
//! - Exporting generated renders to disk (export.rs)

pub mod export;
pub mod loader;
