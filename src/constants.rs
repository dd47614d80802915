//! Physical constants and unit conversions

/// Mean Earth radius used by the thin shell geometry, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Total Electron Content Unit, in electrons per m²
pub const TECU: f64 = 1.0E16;

/// Tesla to Gauss
pub const TESLA_TO_GAUSS: f64 = 1.0E4;

/// Nanotesla to Tesla
pub const NANO_TESLA: f64 = 1.0E-9;

/// Faraday rotation constant: RM = 2.6E-17 B[G] TEC[m^-2]
pub const FARADAY_RM_CONSTANT: f64 = 2.6E-17;

/// Hours evaluated in one day
pub const HOURS_PER_DAY: u8 = 24;
