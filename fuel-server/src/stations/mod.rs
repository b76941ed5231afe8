//! Fuel station catalog.
//!
//! Provides bounding-box lookup of priced stations, backed by the truck
//! stop price sheet loaded at startup and reloaded daily.

mod catalog;
mod error;
mod loader;

pub use catalog::{InMemoryCatalog, StationCatalog};
pub use error::StationError;
pub use loader::{FuelStop, LoadSummary, load_csv};
