//! Domain types for catalog entries

mod ids;
mod track;

pub use ids::TrackId;
pub use track::Track;
