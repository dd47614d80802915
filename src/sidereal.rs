//! Sidereal time and topocentric (horizontal) coordinates
use crate::{
    epoch::day_of_year,
    observer::Observer,
    prelude::Epoch,
    source::SourceDirection,
};

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of the source in the local sky of the observer
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Topocentric {
    /// Azimuth, from north through east, in [0, 2π[ (rad)
    pub azimuth_rad: f64,
    /// Altitude above the horizon (rad)
    pub altitude_rad: f64,
    /// Local hour angle (rad)
    pub hour_angle_rad: f64,
}

impl Topocentric {
    /// Zenith angle (rad)
    pub fn zenith_rad(&self) -> f64 {
        PI / 2.0 - self.altitude_rad
    }
    /// Returns true if the source is strictly above given elevation (rad)
    pub fn is_above(&self, cutoff_rad: f64) -> bool {
        self.altitude_rad > cutoff_rad
    }
}

/// Anything capable of locating a fixed source in the local sky,
/// at a given instant.
pub trait SkyPosition {
    fn topocentric(&self, t: Epoch) -> Topocentric;
}

/// Greenwich mean sidereal time at `t`, in hours within [0, 24[.
pub fn greenwich_sidereal_time_hours(t: Epoch) -> f64 {
    let (y, _, _, hh, mm, ss, ns) = t.to_gregorian_utc();

    // julian date of "January 0.0"
    let jan0 = Epoch::from_gregorian_utc_at_midnight(y, 1, 1).to_jde_utc_days() - 1.0;

    let tt = (jan0 - 2_415_020.0) / 36_525.0;
    let r = 6.6460656 + 2400.051262 * tt + 0.00002581 * tt.powi(2);
    let b = 24.0 - r + 24.0 * (y - 1900) as f64;

    let t0 = 0.0657098 * day_of_year(t) as f64 - b;

    let ut = hh as f64 + mm as f64 / 60.0 + (ss as f64 + ns as f64 * 1.0E-9) / 3600.0;

    (t0 + 1.002738 * ut).rem_euclid(24.0)
}

/// Local sidereal time, in hours within [0, 24[,
/// for given longitude (decimal degrees, positive east).
pub fn local_sidereal_time_hours(t: Epoch, long_ddeg: f64) -> f64 {
    (greenwich_sidereal_time_hours(t) + long_ddeg / 15.0).rem_euclid(24.0)
}

/// Rotates equatorial coordinates into horizontal coordinates.
/// Returns (azimuth, altitude) in radians, azimuth from north through east.
pub fn equatorial_to_horizontal(hour_angle_rad: f64, dec_rad: f64, lat_rad: f64) -> (f64, f64) {
    let sin_alt = dec_rad.sin() * lat_rad.sin()
        + dec_rad.cos() * lat_rad.cos() * hour_angle_rad.cos();

    let altitude = sin_alt.clamp(-1.0, 1.0).asin();

    let denom = lat_rad.cos() * altitude.cos();
    if denom.abs() < 1.0E-12 {
        // zenith or pole: azimuth is undefined
        return (0.0, altitude);
    }

    let cos_az = (dec_rad.sin() - lat_rad.sin() * sin_alt) / denom;
    let mut azimuth = cos_az.clamp(-1.0, 1.0).acos();

    if hour_angle_rad.sin() > 0.0 {
        azimuth = 2.0 * PI - azimuth;
    }

    (azimuth, altitude)
}

/// [SiderealConverter] locates a [SourceDirection] in the sky
/// of an [Observer], using mean sidereal time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SiderealConverter {
    observer: Observer,
    source: SourceDirection,
}

impl SiderealConverter {
    pub fn new(observer: Observer, source: SourceDirection) -> Self {
        Self { observer, source }
    }
    /// Local hour angle of the source at `t`, in hours within [0, 24[
    pub fn hour_angle_hours(&self, t: Epoch) -> f64 {
        let lst = local_sidereal_time_hours(t, self.observer.longitude_ddeg());
        (lst - self.source.ra_hours()).rem_euclid(24.0)
    }
}

impl SkyPosition for SiderealConverter {
    fn topocentric(&self, t: Epoch) -> Topocentric {
        let hour_angle_rad = (self.hour_angle_hours(t) * 15.0).to_radians();

        let (azimuth_rad, altitude_rad) = equatorial_to_horizontal(
            hour_angle_rad,
            self.source.dec_rad(),
            self.observer.latitude_rad(),
        );

        Topocentric {
            azimuth_rad,
            altitude_rad,
            hour_angle_rad,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gst() {
        // Practical astronomy with your calculator, §12
        let t = Epoch::from_gregorian_utc(1980, 4, 22, 14, 36, 51, 670_000_000);
        let gst = greenwich_sidereal_time_hours(t);
        assert!((gst - 4.668101).abs() < 1.0E-5, "gst={}", gst);

        // 64° west
        let lst = local_sidereal_time_hours(t, -64.0);
        assert!((lst - (4.668101 - 64.0 / 15.0)).abs() < 1.0E-5);

        // wraps around
        let lst = local_sidereal_time_hours(t, 330.0);
        assert!((lst - (4.668101 + 22.0 - 24.0)).abs() < 1.0E-5);
    }

    #[test]
    fn horizontal() {
        let ha = ((5.0 + 51.0 / 60.0 + 44.0 / 3600.0) * 15.0_f64).to_radians();
        let dec = (23.0 + 13.0 / 60.0 + 10.0 / 3600.0_f64).to_radians();
        let lat = 52.0_f64.to_radians();

        let (az, alt) = equatorial_to_horizontal(ha, dec, lat);
        assert!((alt.to_degrees() - 19.334345).abs() < 1.0E-5);
        assert!((az.to_degrees() - 283.271027).abs() < 1.0E-5);

        // on the meridian
        let (az, alt) = equatorial_to_horizontal(0.0, dec, lat);
        assert!((alt.to_degrees() - (90.0 - 52.0 + dec.to_degrees())).abs() < 1.0E-9);
        assert!(az.abs() < 1.0E-6 || (az - PI).abs() < 1.0E-6);
    }

    #[test]
    fn circumpolar_source() {
        // always above the horizon from 52°N
        let observer = Observer::from_ddeg(52.0, 6.0).unwrap();
        let source = SourceDirection::from_ddeg(37.95, 89.26);
        let converter = SiderealConverter::new(observer, source);

        let day = Epoch::from_gregorian_utc_at_midnight(2011, 10, 20);
        for hour in 0..24 {
            let t = crate::epoch::hour_of_day(day, hour);
            let pos = converter.topocentric(t);
            assert!(pos.is_above(0.0));
            assert!((pos.altitude_rad.to_degrees() - 52.0).abs() < 1.0);
            assert!(pos.azimuth_rad >= 0.0 && pos.azimuth_rad < 2.0 * PI);
        }
    }

    #[test]
    fn never_rises() {
        let observer = Observer::from_ddeg(52.0, 6.0).unwrap();
        let source = SourceDirection::from_ddeg(0.0, -60.0);
        let converter = SiderealConverter::new(observer, source);

        let day = Epoch::from_gregorian_utc_at_midnight(2011, 10, 20);
        for hour in 0..24 {
            let t = crate::epoch::hour_of_day(day, hour);
            assert!(!converter.topocentric(t).is_above(0.0));
        }
    }
}
