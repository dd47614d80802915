//! Celestial source (line of sight) definition
use crate::prelude::ParsingError;
use regex::Regex;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Right ascension in hours, minutes, seconds, followed by a signed
    /// declination in degrees, minutes, seconds: 08h37m05.6s+06d10m14.5s
    static ref RA_DEC: Regex = Regex::new(
        r"^(?P<h>\d+)h(?:(?P<m>\d+)m)?(?:(?P<s>\d+(?:\.\d*)?)s)?(?P<sign>[+-])(?P<d>\d+)d(?:(?P<dm>\d+)m)?(?:(?P<ds>\d+(?:\.\d*)?)s)?$"
    )
    .unwrap();
}

/// Fixed source on the celestial sphere, described by its
/// equatorial coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceDirection {
    /// Right ascension (rad)
    ra_rad: f64,
    /// Declination (rad)
    dec_rad: f64,
}

impl SourceDirection {
    /// Builds new [SourceDirection] from right ascension
    /// and declination, both in decimal degrees.
    pub fn from_ddeg(ra_ddeg: f64, dec_ddeg: f64) -> Self {
        Self {
            ra_rad: ra_ddeg.to_radians(),
            dec_rad: dec_ddeg.to_radians(),
        }
    }
    /// Right ascension in radians
    pub fn ra_rad(&self) -> f64 {
        self.ra_rad
    }
    /// Declination in radians
    pub fn dec_rad(&self) -> f64 {
        self.dec_rad
    }
    /// Right ascension in hours
    pub fn ra_hours(&self) -> f64 {
        self.ra_rad.to_degrees() / 15.0
    }
    /// Declination in decimal degrees
    pub fn dec_ddeg(&self) -> f64 {
        self.dec_rad.to_degrees()
    }
}

fn parse_field(caps: &regex::Captures, name: &str) -> Option<f64> {
    match caps.name(name) {
        Some(m) => m.as_str().parse::<f64>().ok(),
        None => Some(0.0),
    }
}

impl FromStr for SourceDirection {
    type Err = ParsingError;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let err = || ParsingError::SourceDirection(content.to_string());

        let caps = RA_DEC.captures(content.trim()).ok_or_else(err)?;

        let hh = parse_field(&caps, "h").ok_or_else(err)?;
        let mm = parse_field(&caps, "m").ok_or_else(err)?;
        let ss = parse_field(&caps, "s").ok_or_else(err)?;

        if hh >= 24.0 || mm >= 60.0 || ss >= 60.0 {
            return Err(err());
        }

        let deg = parse_field(&caps, "d").ok_or_else(err)?;
        let dm = parse_field(&caps, "dm").ok_or_else(err)?;
        let ds = parse_field(&caps, "ds").ok_or_else(err)?;

        if dm >= 60.0 || ds >= 60.0 {
            return Err(err());
        }

        let mut dec = deg + dm / 60.0 + ds / 3600.0;
        if dec > 90.0 {
            return Err(err());
        }

        if caps.name("sign").map(|s| s.as_str()) == Some("-") {
            dec = -dec;
        }

        let ra_hours = hh + mm / 60.0 + ss / 3600.0;
        Ok(Self::from_ddeg(ra_hours * 15.0, dec))
    }
}

impl std::fmt::Display for SourceDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "RA={:.6}h DEC={:+.6}°",
            self.ra_hours(),
            self.dec_ddeg()
        )
    }
}
