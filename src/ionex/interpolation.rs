//! Spatial and temporal TEC interpolation
use crate::{
    ionex::{Ionex, Map},
    prelude::{Epoch, Error},
};

use std::collections::BTreeMap;

/// Interpolates the maps at `t`: bilinear interpolation on the map at
/// that exact epoch, otherwise linear interpolation between the
/// bilinear results of the two surrounding maps.
fn interpolate(
    maps: &BTreeMap<Epoch, Map>,
    t: Epoch,
    lat_ddeg: f64,
    long_ddeg: f64,
) -> Result<f64, Error> {
    let out_of_domain = || Error::OutOfDomain {
        epoch: t,
        lat_ddeg,
        long_ddeg,
    };

    if let Some(map) = maps.get(&t) {
        return map.interpolate(lat_ddeg, long_ddeg).ok_or_else(out_of_domain);
    }

    let (t0, before) = maps.range(..t).next_back().ok_or_else(out_of_domain)?;
    let (t1, after) = maps.range(t..).next().ok_or_else(out_of_domain)?;

    let v0 = before
        .interpolate(lat_ddeg, long_ddeg)
        .ok_or_else(out_of_domain)?;

    let v1 = after
        .interpolate(lat_ddeg, long_ddeg)
        .ok_or_else(out_of_domain)?;

    let ratio = (t - *t0).to_seconds() / (*t1 - *t0).to_seconds();
    Ok(v0 + (v1 - v0) * ratio)
}

impl Ionex {
    /// Interpolates the vertical TEC (in TECu) at given coordinates
    /// (decimal degrees) and instant.
    /// ```
    /// use ionfr::prelude::*;
    ///
    /// let ionex = Ionex::from_file("test_resources/IONEX/V1/REGG2930.11I")
    ///     .unwrap();
    ///
    /// let t = Epoch::from_gregorian_utc(2011, 10, 20, 12, 0, 0, 0);
    /// let tec = ionex.vtec(t, 52.9, 6.87).unwrap();
    /// assert!(tec > 0.0);
    ///
    /// // Queries outside the grid are rejected
    /// assert!(ionex.vtec(t, -20.0, 6.87).is_err());
    /// ```
    pub fn vtec(&self, t: Epoch, lat_ddeg: f64, long_ddeg: f64) -> Result<f64, Error> {
        interpolate(&self.tec_maps, t, lat_ddeg, long_ddeg)
    }

    /// Interpolates the vertical TEC RMS (in TECu) at given coordinates
    /// (decimal degrees) and instant.
    pub fn rms_vtec(&self, t: Epoch, lat_ddeg: f64, long_ddeg: f64) -> Result<f64, Error> {
        if !self.has_rms_maps() {
            return Err(Error::MissingRmsMaps);
        }
        interpolate(&self.rms_maps, t, lat_ddeg, long_ddeg)
    }
}
