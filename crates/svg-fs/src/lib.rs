//! Filesystem access for SVG Manager
//!
//! Provides atomic, locked writes and format-aware loading and saving of
//! record files and configuration.

pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
