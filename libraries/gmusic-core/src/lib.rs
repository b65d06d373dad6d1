//! GMusic Player Core
//!
//! Platform-agnostic domain types shared by the playback library and the
//! front-ends.
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`
//! - **Catalog**: the fixed, ordered track list that defines skip order
//! - **Error Handling**: `CoreError` and `Result`
//! - **Time Formatting**: `mm:ss` labels for progress displays
//!
//! # Example
//!
//! ```rust
//! use gmusic_core::{Catalog, Track};
//!
//! let catalog = Catalog::new(vec![
//!     Track::new("1", "Intro", "Someone", "intro.mp3"),
//!     Track::new("2", "Outro", "Someone", "outro.mp3"),
//! ])
//! .unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.get(1).map(|t| t.title.as_str()), Some("Outro"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod time;
pub mod types;

pub use catalog::Catalog;
pub use error::{CoreError, Result};
pub use time::{format_timestamp, progress_fraction};
pub use types::{Track, TrackId};
