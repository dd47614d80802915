//! IONEX: global and regional ionosphere maps
use crate::prelude::{Epoch, Error};

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

#[cfg(feature = "log")]
use log::debug;

mod grid;
mod header;
mod interpolation;
mod map;
mod mapf;
mod parsing;

pub use grid::Grid;
pub use header::Header;
pub use map::Map;
pub use mapf::MappingFunction;

/// [Ionex] file content: ionosphere shell and TEC maps,
/// with optional RMS maps.
#[derive(Debug, Clone, PartialEq)]
pub struct Ionex {
    /// [Header] describing the maps
    pub header: Header,
    /// TEC maps, indexed by epoch
    tec_maps: BTreeMap<Epoch, Map>,
    /// RMS maps, indexed by epoch
    rms_maps: BTreeMap<Epoch, Map>,
}

impl Ionex {
    /// Parses [Ionex] from any [BufRead]able input
    pub fn parse<R: BufRead>(reader: &mut R) -> Result<Self, Error> {
        let mut lines = reader.lines();
        let header = Header::parse(&mut lines)?;
        let (tec_maps, rms_maps) = parsing::parse_maps(&header, &mut lines)?;
        Ok(Self {
            header,
            tec_maps,
            rms_maps,
        })
    }

    /// Parses [Ionex] from local file
    /// ```
    /// use ionfr::prelude::*;
    /// let ionex = Ionex::from_file("test_resources/IONEX/V1/REGG2930.11I")
    ///     .unwrap();
    /// assert_eq!(ionex.shell_height_km(), 450.0);
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();

        #[cfg(feature = "log")]
        debug!("ionex: reading \"{}\"", path.display());

        let fd = File::open(path)?;
        let mut reader = BufReader::new(fd);
        Self::parse(&mut reader)
    }

    /// Parses [Ionex] from local gzip compressed file
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();

        #[cfg(feature = "log")]
        debug!("ionex: reading \"{}\" (gzip)", path.display());

        let fd = File::open(path)?;
        let mut reader = BufReader::new(GzDecoder::new(fd));
        Self::parse(&mut reader)
    }

    /// Altitude of the ionosphere shell, in km
    pub fn shell_height_km(&self) -> f64 {
        self.header.shell_height_km
    }

    /// Altitude of the ionosphere shell, in meters
    pub fn shell_height_m(&self) -> f64 {
        self.header.shell_height_m()
    }

    /// Returns true if this file provides RMS maps
    pub fn has_rms_maps(&self) -> bool {
        !self.rms_maps.is_empty()
    }

    /// Iterates over TEC maps, in chronological order
    pub fn tec_maps(&self) -> impl Iterator<Item = (&Epoch, &Map)> {
        self.tec_maps.iter()
    }

    /// Iterates over RMS maps, in chronological order
    pub fn rms_maps(&self) -> impl Iterator<Item = (&Epoch, &Map)> {
        self.rms_maps.iter()
    }

    /// Returns TEC map at this exact epoch
    pub fn tec_map(&self, t: Epoch) -> Option<&Map> {
        self.tec_maps.get(&t)
    }

    /// Returns RMS map at this exact epoch
    pub fn rms_map(&self, t: Epoch) -> Option<&Map> {
        self.rms_maps.get(&t)
    }

    /// Returns (first, last) epochs covered by TEC maps
    pub fn time_span(&self) -> Option<(Epoch, Epoch)> {
        let (first, _) = self.tec_maps.first_key_value()?;
        let (last, _) = self.tec_maps.last_key_value()?;
        Some((*first, *last))
    }
}
