//! # ttt-grid
//!
//! Daily gridded fields and the climatology/anomaly machinery shared by the
//! OLR index and every reanalysis predictor.
//!
//! ## Pipeline
//!
//! ```text
//! raw TimestampedField --mask_sentinel()--> masked field
//!        masked field --Climatology::build()--> Climatology (365 slots)
//!   masked field + Climatology --anomalies()--> anomaly field
//!        anomaly field + BoundingBox --box_mean()--> Vec<f64>
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `coords` | Latitude/longitude axes with exact lookup |
//! | `field` | Timestamped `(time, lat, lon)` fields and sentinel masking |
//! | `climatology` | Day-of-year climatology builder and anomaly calculator |
//! | `region` | Named boxes, box means and cropping |
//! | `error` | Error types |

mod climatology;
mod coords;
mod error;
mod field;
mod region;

pub use climatology::{Climatology, ClimatologyBuilder};
pub use coords::CoordinateGrid;
pub use error::GridError;
pub use field::{NO_DATA_FLOOR, TimestampedField};
pub use region::{BoundingBox, box_mean, crop};
