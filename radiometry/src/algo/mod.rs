//! Numeric helpers shared by the photometry and hardware models
//!
//! Interpolation over tabulated curves, evenly spaced sample grids and
//! short decimal formatting.

pub mod misc;

pub use misc::{format_decimal, interp, linspace, InterpError};
