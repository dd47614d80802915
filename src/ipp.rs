//! Ionosphere Pierce Point (IPP) geometry.
//!
//! The ionosphere is approximated by a thin shell at uniform altitude.
//! Given the azimuth and zenith angle of the line of sight at the observer,
//! we determine the latitude and longitude offsets of the intersection of
//! that line of sight with the shell, and the azimuth and zenith angles
//! of the line of sight as seen from that point.
use crate::{constants::EARTH_RADIUS_M, prelude::Error};
use std::f64::consts::{FRAC_PI_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rounding tolerance on asin arguments: values beyond ±1 by less than
/// this are clamped, anything further is a [Error::GeometryDomain].
const ASIN_TOLERANCE: f64 = 1.0E-12;

/// [PiercingPoint] describes where the line of sight pierced the
/// ionosphere shell, relative to the observer.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PiercingPoint {
    /// Latitude offset with respect to the observer (rad)
    pub offset_lat_rad: f64,
    /// Longitude offset with respect to the observer (rad)
    pub offset_long_rad: f64,
    /// Azimuth of the source, seen from the IPP (rad)
    pub azimuth_rad: f64,
    /// Zenith angle of the source, seen from the IPP (rad)
    pub zenith_rad: f64,
}

impl PiercingPoint {
    /// Elevation of the source, seen from the IPP (rad)
    pub fn elevation_rad(&self) -> f64 {
        FRAC_PI_2 - self.zenith_rad
    }
    /// Slant factor, converting vertical to line of sight content: 1/cos(z)
    pub fn slant_factor(&self) -> f64 {
        1.0 / self.zenith_rad.cos()
    }
}

fn checked_asin(x: f64) -> Result<f64, Error> {
    if x.abs() > 1.0 + ASIN_TOLERANCE || x.is_nan() {
        Err(Error::GeometryDomain(x))
    } else {
        Ok(x.clamp(-1.0, 1.0).asin())
    }
}

/// Moves the azimuth obtained by asin() (within [-π/2, π/2])
/// to the quadrant of the source azimuth.
/// Values already located in the correct quadrant are returned as is,
/// which makes this correction idempotent.
pub fn correct_azimuth_quadrant(source_az_rad: f64, azimuth_rad: f64) -> f64 {
    if source_az_rad > FRAC_PI_2 && azimuth_rad <= FRAC_PI_2 {
        azimuth_rad + 2.0 * (azimuth_rad - FRAC_PI_2).abs()
    } else if source_az_rad < -FRAC_PI_2 && azimuth_rad >= -FRAC_PI_2 {
        azimuth_rad - 2.0 * (azimuth_rad.abs() - FRAC_PI_2).abs()
    } else {
        azimuth_rad
    }
}

/// Computes the [PiercingPoint] of the line of sight.
/// ## Inputs
///   - observer_lat_rad: latitude of the antenna (rad), positive.
///   Hemisphere signs are applied to the resulting coordinates
///   at a higher level.
///   - source_az_rad: azimuth of the source from the antenna (rad),
///   from north through east
///   - source_zenith_rad: zenith angle of the source from the antenna (rad)
///   - shell_altitude_m: height of the ionosphere shell (m)
pub fn compute_ipp(
    observer_lat_rad: f64,
    source_az_rad: f64,
    source_zenith_rad: f64,
    shell_altitude_m: f64,
) -> Result<PiercingPoint, Error> {
    let mut az = source_az_rad;
    if az > PI {
        az -= 2.0 * PI;
    }

    // 2D sine rule gives the zenith angle at the IPP
    let zenith_rad = checked_asin(
        EARTH_RADIUS_M * source_zenith_rad.sin() / (EARTH_RADIUS_M + shell_altitude_m),
    )?;

    // internal angles of the triangle
    let theta = source_zenith_rad - zenith_rad;

    // spherical cosine rule: latitude at the IPP
    let lat_ipp = checked_asin(
        observer_lat_rad.sin() * theta.cos()
            + observer_lat_rad.cos() * theta.sin() * az.cos(),
    )?;

    // spherical sine rule: longitude offset
    let offset_long_rad = checked_asin(az.sin() * theta.sin() / lat_ipp.cos())?;

    // spherical sine rule: azimuth at the IPP
    let azimuth_rad = checked_asin(az.sin() * observer_lat_rad.cos() / lat_ipp.cos())?;

    Ok(PiercingPoint {
        offset_lat_rad: lat_ipp - observer_lat_rad,
        offset_long_rad,
        azimuth_rad: correct_azimuth_quadrant(az, azimuth_rad),
        zenith_rad,
    })
}
