//! Prediction settings
use crate::{geomag::Igrf, prelude::Error};
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn default_output() -> PathBuf {
    PathBuf::from("IonRM.csv")
}

fn default_elevation_cutoff() -> f64 {
    0.0
}

/// [Config] of a rotation measure prediction.
/// Deserializes from JSON, every field is optional:
/// ```json
/// {
///     "output": "IonRM.csv",
///     "igrf_coefficients": "igrf13coeffs.txt",
///     "elevation_cutoff_deg": 10.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// CSV output file
    #[cfg_attr(feature = "serde", serde(default = "default_output"))]
    pub output: PathBuf,
    /// IGRF coefficient table, replacing the built-in IGRF-13 model
    #[cfg_attr(feature = "serde", serde(default))]
    pub igrf_coefficients: Option<PathBuf>,
    /// Hours where the source does not rise strictly above
    /// this elevation (in degrees) are not reported
    #[cfg_attr(feature = "serde", serde(default = "default_elevation_cutoff"))]
    pub elevation_cutoff_deg: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            igrf_coefficients: None,
            elevation_cutoff_deg: default_elevation_cutoff(),
        }
    }
}

impl Config {
    /// Copies and sets the output file
    pub fn with_output(&self, output: PathBuf) -> Self {
        let mut s = self.clone();
        s.output = output;
        s
    }
    /// Copies and sets the IGRF coefficient table
    pub fn with_igrf_coefficients(&self, path: PathBuf) -> Self {
        let mut s = self.clone();
        s.igrf_coefficients = Some(path);
        s
    }
    /// Copies and sets the elevation cutoff, in degrees
    pub fn with_elevation_cutoff(&self, cutoff_deg: f64) -> Self {
        let mut s = self.clone();
        s.elevation_cutoff_deg = cutoff_deg;
        s
    }
    /// Elevation cutoff in radians
    pub fn elevation_cutoff_rad(&self) -> f64 {
        self.elevation_cutoff_deg.to_radians()
    }
    /// Builds the geomagnetic model described by this [Config]
    pub fn igrf(&self) -> Result<Igrf, Error> {
        match &self.igrf_coefficients {
            Some(path) => Igrf::from_file(path),
            None => Ok(Igrf::default()),
        }
    }
}
