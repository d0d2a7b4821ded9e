//! Public API for the halftone-core crate.
//!
//! This module provides the high-level API: the [`Halftoner`] builder and
//! the [`HalftoneError`] unified error type.

mod builder;
mod error;

pub use builder::Halftoner;
pub use error::{HalftoneError, ParseSelectorError};
