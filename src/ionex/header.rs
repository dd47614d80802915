//! IONEX header
use crate::{
    ionex::{parsing::parse_epoch, Grid, MappingFunction},
    linspace::Linspace,
    prelude::{Duration, Epoch, Error, ParsingError},
};

use std::str::FromStr;

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// IONEX [Header]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// IONEX revision
    pub version: f32,
    /// Program, agency and date of production
    pub program: Option<String>,
    /// Brief description of the technique and model
    pub description: Option<String>,
    /// Comments
    pub comments: Vec<String>,
    /// Epoch of first map
    pub epoch_of_first_map: Option<Epoch>,
    /// Epoch of last map
    pub epoch_of_last_map: Option<Epoch>,
    /// Time interval between maps
    pub interval: Option<Duration>,
    /// Number of maps (per kind) announced in this file
    pub number_of_maps: usize,
    /// Mapping function adopted for TEC determination,
    /// None: no mapping function (e.g altimetry)
    pub mapping: Option<MappingFunction>,
    /// Minimum elevation angle used, in degrees
    pub elevation_cutoff: f64,
    /// Observables used in the determination
    pub observables: Option<String>,
    /// Number of contributing stations
    pub nb_stations: u32,
    /// Number of contributing satellites
    pub nb_satellites: u32,
    /// Mean earth radius or bottom of height grid, in km
    pub base_radius_km: f64,
    /// Maps dimension: 2D (fixed altitude) or 3D
    pub map_dimension: u8,
    /// Map grid definition
    pub grid: Grid,
    /// Altitude of the ionosphere shell, in km
    pub shell_height_km: f64,
    /// Initial exponent to apply to map values
    pub exponent: i8,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: 1.0,
            program: None,
            description: None,
            comments: Vec::new(),
            epoch_of_first_map: None,
            epoch_of_last_map: None,
            interval: None,
            number_of_maps: 0,
            mapping: None,
            elevation_cutoff: 0.0,
            observables: None,
            nb_stations: 0,
            nb_satellites: 0,
            // standard Earth radius
            base_radius_km: 6371.0,
            map_dimension: 2,
            grid: Grid::default(),
            shell_height_km: 0.0,
            // files that omit EXPONENT are expressed in 0.1 TECu
            exponent: -1,
        }
    }
}

/// Parses the three fields of a grid definition
fn parse_linspace(content: &str) -> Result<Linspace, ParsingError> {
    let items = content.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() != 3 {
        return Err(ParsingError::IonexGridSpecs);
    }
    let mut values = [0.0_f64; 3];
    for (value, item) in values.iter_mut().zip(items.iter()) {
        *value = item
            .parse::<f64>()
            .map_err(|_| ParsingError::IonexGridSpecs)?;
    }
    Linspace::new(values[0], values[1], values[2])
}

/// Shell height is the first field of the record ending with DHGT
fn parse_shell_height(line: &str) -> Option<Result<f64, ParsingError>> {
    let mut items = line.split_ascii_whitespace();
    let first = items.next()?;
    if items.last()? != "DHGT" {
        return None;
    }
    Some(
        first
            .parse::<f64>()
            .map_err(|_| ParsingError::IonexGridSpecs),
    )
}

impl Header {
    /// Copies and sets the grid definition
    pub fn with_grid(&self, grid: Grid) -> Self {
        let mut s = self.clone();
        s.grid = grid;
        s
    }
    /// Copies and sets the shell height, in km
    pub fn with_shell_height(&self, height_km: f64) -> Self {
        let mut s = self.clone();
        s.shell_height_km = height_km;
        s
    }
    /// Copies and appends to the description
    pub fn with_description(&self, desc: &str) -> Self {
        let mut s = self.clone();
        if let Some(ref mut d) = s.description {
            d.push(' ');
            d.push_str(desc)
        } else {
            s.description = Some(desc.to_string())
        }
        s
    }
    /// Returns true if this file describes a theoretical model,
    /// rather than measurements
    pub fn is_theoretical_model(&self) -> bool {
        self.observables.is_none()
    }
    /// Altitude of the ionosphere shell, in meters
    pub fn shell_height_m(&self) -> f64 {
        self.shell_height_km * 1.0E3
    }

    /// Parses the [Header] from the first lines of the file,
    /// consumes the "END OF HEADER" record.
    pub(crate) fn parse<I: Iterator<Item = std::io::Result<String>>>(
        lines: &mut I,
    ) -> Result<Self, Error> {
        let mut header = Self::default();

        let mut shell_height = Option::<f64>::None;
        let mut latitude = Option::<Linspace>::None;
        let mut longitude = Option::<Linspace>::None;
        let mut height = Option::<Linspace>::None;

        let first = lines.next().ok_or(ParsingError::NotIonex)??;
        if first.len() < 60 || !first.is_char_boundary(60) {
            return Err(ParsingError::NotIonex.into());
        }

        let (content, marker) = first.split_at(60);
        if !marker.contains("IONEX VERSION / TYPE") {
            return Err(ParsingError::NotIonex.into());
        }

        header.version = content
            .split_ascii_whitespace()
            .next()
            .and_then(|v| v.parse::<f32>().ok())
            .ok_or(ParsingError::IonexVersion)?;

        let mut end_of_header = false;

        for line in lines.by_ref() {
            let line = line?;

            if let Some(height) = parse_shell_height(&line) {
                shell_height = Some(height?);
            }

            if line.len() < 60 || !line.is_char_boundary(60) {
                if line.trim().eq("END OF HEADER") {
                    end_of_header = true;
                    break;
                }
                continue;
            }

            let (content, marker) = line.split_at(60);
            let marker = marker.trim();

            if marker.eq("END OF HEADER") {
                end_of_header = true;
                break;
            } else if marker.eq("COMMENT") {
                header.comments.push(content.trim_end().to_string());
            } else if marker.eq("PGM / RUN BY / DATE") {
                header.program = Some(content.trim_end().to_string());
            } else if marker.eq("DESCRIPTION") {
                header = header.with_description(content.trim());
            } else if marker.eq("EPOCH OF FIRST MAP") {
                header.epoch_of_first_map = Some(parse_epoch(content)?);
            } else if marker.eq("EPOCH OF LAST MAP") {
                header.epoch_of_last_map = Some(parse_epoch(content)?);
            } else if marker.eq("INTERVAL") {
                if let Ok(seconds) = content.trim().parse::<f64>() {
                    header.interval = Some(Duration::from_seconds(seconds));
                }
            } else if marker.eq("# OF MAPS IN FILE") {
                header.number_of_maps = content
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ParsingError::IonexNumberOfMaps)?;
            } else if marker.eq("MAPPING FUNCTION") {
                let content = content.trim();
                if !content.eq("NONE") {
                    header.mapping = Some(MappingFunction::from_str(content)?);
                }
            } else if marker.eq("ELEVATION CUTOFF") {
                if let Ok(cutoff) = content.trim().parse::<f64>() {
                    header.elevation_cutoff = cutoff;
                }
            } else if marker.eq("OBSERVABLES USED") {
                let content = content.trim();
                if !content.is_empty() {
                    header.observables = Some(content.to_string());
                }
            } else if marker.eq("# OF STATIONS") {
                if let Ok(n) = content.trim().parse::<u32>() {
                    header.nb_stations = n;
                }
            } else if marker.eq("# OF SATELLITES") {
                if let Ok(n) = content.trim().parse::<u32>() {
                    header.nb_satellites = n;
                }
            } else if marker.eq("BASE RADIUS") {
                if let Ok(radius) = content.trim().parse::<f64>() {
                    header.base_radius_km = radius;
                }
            } else if marker.eq("MAP DIMENSION") {
                if let Ok(dim) = content.trim().parse::<u8>() {
                    header.map_dimension = dim;
                }
            } else if marker.eq("HGT1 / HGT2 / DHGT") {
                height = Some(parse_linspace(content)?);
            } else if marker.eq("LAT1 / LAT2 / DLAT") {
                latitude = Some(parse_linspace(content)?);
            } else if marker.eq("LON1 / LON2 / DLON") {
                longitude = Some(parse_linspace(content)?);
            } else if marker.eq("EXPONENT") {
                header.exponent = content
                    .trim()
                    .parse::<i8>()
                    .map_err(|_| ParsingError::IonexExponent)?;
            }
        }

        if !end_of_header {
            return Err(ParsingError::MissingEndOfHeader.into());
        }

        let shell_height = shell_height.ok_or(ParsingError::MissingShellHeight)?;

        let grid = Grid {
            latitude: latitude.ok_or(ParsingError::IonexGridSpecs)?,
            longitude: longitude.ok_or(ParsingError::IonexGridSpecs)?,
            height: height.unwrap_or(Linspace::new(shell_height, shell_height, 0.0)?),
        };

        #[cfg(feature = "log")]
        debug!(
            "ionex: shell height {} km, {} map(s), lat={:?} long={:?}",
            shell_height, header.number_of_maps, grid.latitude, grid.longitude
        );

        Ok(header.with_grid(grid).with_shell_height(shell_height))
    }
}
