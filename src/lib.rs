//! The Great Dictator - read text aloud with word highlighting
//!
//! Text is normalized before it goes to the speech engine, and a segment
//! table maps the engine's boundary offsets back onto the original text so
//! the word being spoken can be highlighted.

pub mod error;
pub mod speech;
pub mod state;
pub mod text;

pub use error::{DictatorError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "dictator";
