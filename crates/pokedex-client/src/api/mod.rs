//! API endpoint implementations.

mod location_areas;

pub use location_areas::LocationAreasApi;
