//! htscreen - halftone screen generator
//!
//! Command-line front end for the `ordered-screen` library: named presets,
//! file encodings and logging setup.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
