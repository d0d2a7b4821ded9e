//! Halftone - multi-layer halftone screen renderer
//!
//! Application layer around `halftone-core`: project files, PNG import and
//! export, the update pipeline and config file watching.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
