//! Nominatim geocoding client.
//!
//! Free-text origins and destinations are resolved through OpenStreetMap's
//! Nominatim search, restricted to the United States.

mod client;
mod types;

pub use client::{NominatimClient, NominatimConfig, in_us_bounds};
pub use types::SearchResult;
