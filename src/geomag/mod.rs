//! Geomagnetic field evaluation
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{NANO_TESLA, TESLA_TO_GAUSS};

mod igrf;
pub use igrf::Igrf;

/// Geomagnetic model errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Coefficient table is not formatted as expected
    #[error("invalid coefficient table: {0}")]
    CoefficientTable(String),
    /// Coefficient table does not define any model epoch
    #[error("coefficient table does not define any epoch")]
    NoModelEpoch,
    /// Requested date is not covered by the model
    #[error("year {year:.3} is outside model validity [{first:.1}, {last:.1}]")]
    OutsideValidity { year: f64, first: f64, last: f64 },
}

/// Geomagnetic field vector, in the local North / East / Down frame.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldComponents {
    /// Northward component (nT)
    pub x_nt: f64,
    /// Eastward component (nT)
    pub y_nt: f64,
    /// Downward component (nT)
    pub z_nt: f64,
}

impl FieldComponents {
    /// Total intensity (nT)
    pub fn intensity_nt(&self) -> f64 {
        (self.x_nt.powi(2) + self.y_nt.powi(2) + self.z_nt.powi(2)).sqrt()
    }
    /// Returns absolute values of (X, Y, Z) in Gauss
    pub fn abs_gauss(&self) -> (f64, f64, f64) {
        let scaling = NANO_TESLA * TESLA_TO_GAUSS;
        (
            self.x_nt.abs() * scaling,
            self.y_nt.abs() * scaling,
            self.z_nt.abs() * scaling,
        )
    }
    /// Projects the field magnitudes onto a line of sight described by
    /// its azimuth and zenith angle (rad), returns the result in Gauss.
    pub fn line_of_sight_gauss(&self, azimuth_rad: f64, zenith_rad: f64) -> f64 {
        let (x, y, z) = self.abs_gauss();
        z * zenith_rad.cos() + y * zenith_rad.sin() * azimuth_rad.sin()
            - x * zenith_rad.sin() * azimuth_rad.cos()
    }
}

/// Geomagnetic field model, evaluated on a sphere centered on Earth's center.
pub trait FieldModel {
    /// Evaluates the field at given decimal year, at `radius_km` from
    /// the center of the Earth, at given latitude and longitude (ddeg).
    fn field(
        &self,
        decimal_year: f64,
        radius_km: f64,
        lat_ddeg: f64,
        long_ddeg: f64,
    ) -> Result<FieldComponents, Error>;
}
