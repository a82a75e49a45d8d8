//! Feature compositing on top of the carved island. The pipeline applies these in a
//! fixed order: mountains, erosion, valleys, lakes, rivers. Valleys and lakes are meant
//! to cut into an already-smoothed mountain field.

pub mod lakes;
pub mod mountains;
pub mod rivers;
pub mod valleys;

pub use lakes::{LAKE_FLOOR, add_lakes, carve_lake};
pub use mountains::{Peak, add_mountains, add_ridges, place_peaks, raise_peak};
pub use rivers::{carve_river, carve_rivers};
pub use valleys::{VALLEY_FLOOR, VALLEY_MIN_ELEVATION, carve_valleys};
