//! Spatial value model.
//!
//! Points belong to one of four built-in coordinate reference systems. A
//! `SpaceFillingCurve` reduces a point to a single ordinate so that points
//! can be stored in a one-dimensional B+Tree and searched by envelope.

mod crs;
mod curve;
mod envelope;
mod error;
mod point;

pub use crs::{CoordinateReferenceSystem, DEFAULT_CARTESIAN_EXTENT, DEFAULT_HEIGHT_EXTENT};
pub use curve::{HilbertCurve, SpaceFillingCurve};
pub use envelope::{Envelope, MAX_DIMENSION};
pub use error::SpatialError;
pub use point::PointValue;
