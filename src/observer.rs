//! Observer location on Earth
use crate::prelude::ParsingError;
use dms_coordinates::DMS;
use regex::Regex;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Degrees, minutes, seconds followed by an hemisphere letter,
    /// for example 52d54m54.6sn or 6d52m11.7se
    static ref DMS_HEMISPHERE: Regex = Regex::new(
        r"^(?P<deg>\d+(?:\.\d*)?)d(?:(?P<min>\d+(?:\.\d*)?)m)?(?:(?P<sec>\d+(?:\.\d*)?)s)?(?P<hem>[nNsSeEwW])$"
    )
    .unwrap();
}

/// North / South hemisphere
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LatitudeHemisphere {
    #[default]
    North,
    South,
}

/// East / West hemisphere
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LongitudeHemisphere {
    #[default]
    East,
    West,
}

impl LatitudeHemisphere {
    /// Sign to apply to a latitude magnitude
    pub fn sign(&self) -> f64 {
        match self {
            Self::North => 1.0,
            Self::South => -1.0,
        }
    }
}

impl LongitudeHemisphere {
    /// Sign to apply to a longitude magnitude
    pub fn sign(&self) -> f64 {
        match self {
            Self::East => 1.0,
            Self::West => -1.0,
        }
    }
}

impl std::fmt::Display for LatitudeHemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::North => write!(f, "N"),
            Self::South => write!(f, "S"),
        }
    }
}

impl std::fmt::Display for LongitudeHemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::East => write!(f, "E"),
            Self::West => write!(f, "W"),
        }
    }
}

impl FromStr for LatitudeHemisphere {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "n" => Ok(Self::North),
            "s" => Ok(Self::South),
            _ => Err(ParsingError::Latitude(s.to_string())),
        }
    }
}

impl FromStr for LongitudeHemisphere {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" => Ok(Self::East),
            "w" => Ok(Self::West),
            _ => Err(ParsingError::Longitude(s.to_string())),
        }
    }
}

/// Parses "DDdMMmSS.Ss" + hemisphere letter.
/// Returns the angle magnitude in decimal degrees and the hemisphere letter.
fn parse_dms(content: &str) -> Option<(f64, char)> {
    let caps = DMS_HEMISPHERE.captures(content.trim())?;

    let deg = caps.name("deg")?.as_str().parse::<f64>().ok()?;

    let min = match caps.name("min") {
        Some(min) => min.as_str().parse::<f64>().ok()?,
        None => 0.0,
    };

    let sec = match caps.name("sec") {
        Some(sec) => sec.as_str().parse::<f64>().ok()?,
        None => 0.0,
    };

    if min >= 60.0 || sec >= 60.0 {
        return None;
    }

    let hem = caps.name("hem")?.as_str().chars().next()?;
    Some((deg + min / 60.0 + sec / 3600.0, hem))
}

/// [Observer] location on Earth.
/// Latitude and longitude are stored as magnitudes with their hemisphere,
/// which is how the piercing point geometry needs them: offsets are always
/// computed as if the observer was in the northern and eastern hemispheres,
/// signs are applied afterwards, see [Observer::apply_hemispheres].
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observer {
    /// Latitude magnitude, in decimal degrees
    latitude_ddeg: f64,
    /// Longitude magnitude, in decimal degrees
    longitude_ddeg: f64,
    /// North / South
    pub lat_hemisphere: LatitudeHemisphere,
    /// East / West
    pub long_hemisphere: LongitudeHemisphere,
}

impl Observer {
    /// Builds new [Observer] from signed latitude and longitude in decimal degrees.
    /// Latitude must lie within [-90°, 90°], longitude within [-180°, 180°].
    pub fn from_ddeg(lat_ddeg: f64, long_ddeg: f64) -> Result<Self, ParsingError> {
        if !(-90.0..=90.0).contains(&lat_ddeg) {
            return Err(ParsingError::Latitude(lat_ddeg.to_string()));
        }
        if !(-180.0..=180.0).contains(&long_ddeg) {
            return Err(ParsingError::Longitude(long_ddeg.to_string()));
        }
        Ok(Self {
            latitude_ddeg: lat_ddeg.abs(),
            longitude_ddeg: long_ddeg.abs(),
            lat_hemisphere: if lat_ddeg < 0.0 {
                LatitudeHemisphere::South
            } else {
                LatitudeHemisphere::North
            },
            long_hemisphere: if long_ddeg < 0.0 {
                LongitudeHemisphere::West
            } else {
                LongitudeHemisphere::East
            },
        })
    }

    /// Builds new [Observer] from DMS descriptions,
    /// for example "52d54m54.6sn" and "6d52m11.7se".
    pub fn from_dms(latitude: &str, longitude: &str) -> Result<Self, ParsingError> {
        let (lat, hem) =
            parse_dms(latitude).ok_or(ParsingError::Latitude(latitude.to_string()))?;

        let lat_hemisphere = LatitudeHemisphere::from_str(&hem.to_string())
            .map_err(|_| ParsingError::Latitude(latitude.to_string()))?;

        if lat > 90.0 {
            return Err(ParsingError::Latitude(latitude.to_string()));
        }

        let (long, hem) =
            parse_dms(longitude).ok_or(ParsingError::Longitude(longitude.to_string()))?;

        let long_hemisphere = LongitudeHemisphere::from_str(&hem.to_string())
            .map_err(|_| ParsingError::Longitude(longitude.to_string()))?;

        if long > 180.0 {
            return Err(ParsingError::Longitude(longitude.to_string()));
        }

        Ok(Self {
            latitude_ddeg: lat,
            longitude_ddeg: long,
            lat_hemisphere,
            long_hemisphere,
        })
    }

    /// Returns signed latitude in decimal degrees
    pub fn latitude_ddeg(&self) -> f64 {
        self.lat_hemisphere.sign() * self.latitude_ddeg
    }

    /// Returns signed longitude in decimal degrees (positive east)
    pub fn longitude_ddeg(&self) -> f64 {
        self.long_hemisphere.sign() * self.longitude_ddeg
    }

    /// Returns signed latitude in radians
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_ddeg().to_radians()
    }

    /// Returns signed longitude in radians
    pub fn longitude_rad(&self) -> f64 {
        self.longitude_ddeg().to_radians()
    }

    /// Returns latitude magnitude in radians, as used by the
    /// piercing point geometry.
    pub fn latitude_magnitude_rad(&self) -> f64 {
        self.latitude_ddeg.to_radians()
    }

    /// Returns longitude magnitude in radians
    pub fn longitude_magnitude_rad(&self) -> f64 {
        self.longitude_ddeg.to_radians()
    }

    /// Applies our hemispheres to piercing point coordinates that were
    /// computed from latitude and longitude magnitudes.
    /// Inputs are the offset coordinates in radians, output is
    /// (latitude, longitude) in signed decimal degrees:
    /// south negates the latitude, west negates the longitude.
    pub fn apply_hemispheres(&self, offset_lat_rad: f64, offset_long_rad: f64) -> (f64, f64) {
        let lat = (self.latitude_magnitude_rad() + offset_lat_rad).to_degrees();
        let long = (self.longitude_magnitude_rad() + offset_long_rad).to_degrees();
        (
            self.lat_hemisphere.sign() * lat,
            self.long_hemisphere.sign() * long,
        )
    }
}

impl std::fmt::Display for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            DMS::from_ddeg_latitude(self.latitude_ddeg()),
            DMS::from_ddeg_longitude(self.longitude_ddeg())
        )
    }
}
