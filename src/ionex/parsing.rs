//! IONEX maps parsing
use crate::{
    ionex::{Header, Map},
    prelude::{Epoch, Error, ParsingError},
};

use std::collections::BTreeMap;

#[cfg(feature = "log")]
use log::{debug, warn};

/// Value of a missing node
const MISSING_VALUE: i32 = 9999;

/// Kind of map being parsed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum MapKind {
    Tec,
    Rms,
    Height,
}

pub(crate) fn is_new_tec_map(marker: &str) -> bool {
    marker.contains("START OF TEC MAP")
}

pub(crate) fn is_new_rms_map(marker: &str) -> bool {
    marker.contains("START OF RMS MAP")
}

pub(crate) fn is_new_height_map(marker: &str) -> bool {
    marker.contains("START OF HEIGHT MAP")
}

fn is_end_of_map(marker: &str) -> bool {
    marker.contains("END OF") && marker.contains("MAP")
}

/// Parses "YYYY MM DD hh mm ss" (6I6)
pub(crate) fn parse_epoch(content: &str) -> Result<Epoch, ParsingError> {
    let items = content.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() != 6 {
        return Err(ParsingError::IonexMapEpoch);
    }

    let y = items[0]
        .parse::<i32>()
        .map_err(|_| ParsingError::IonexMapEpoch)?;

    let mut fields = [0_u8; 5];
    for (field, item) in fields.iter_mut().zip(items[1..].iter()) {
        *field = item
            .parse::<u8>()
            .map_err(|_| ParsingError::IonexMapEpoch)?;
    }

    let [m, d, hh, mm, ss] = fields;

    // some producers describe midnight as hour 24
    if hh == 24 && mm == 0 && ss == 0 {
        let midnight = Epoch::maybe_from_gregorian_utc(y, m, d, 0, 0, 0, 0)
            .map_err(|_| ParsingError::IonexMapEpoch)?;
        return Ok(midnight + hifitime::Unit::Day * 1);
    }

    Epoch::maybe_from_gregorian_utc(y, m, d, hh, mm, ss, 0)
        .map_err(|_| ParsingError::IonexMapEpoch)
}

/// Parses the grid specs of the latitude band to follow, returns
/// - fixed latitude (ddeg)
/// - long1 (ddeg)
/// - long2 (ddeg)
/// - longitude spacing (ddeg)
/// - fixed altitude (km)
pub(crate) fn parse_grid_specs(content: &str) -> Result<(f64, f64, f64, f64, f64), ParsingError> {
    if content.len() < 32 || !content.is_char_boundary(2) {
        return Err(ParsingError::IonexGridCoordinates);
    }

    let mut fields = [0.0_f64; 5];
    let mut rem = &content[2..];

    for field in fields.iter_mut() {
        if !rem.is_char_boundary(6) {
            return Err(ParsingError::IonexGridCoordinates);
        }
        let (value, r) = rem.split_at(6);
        *field = value
            .trim()
            .parse::<f64>()
            .map_err(|_| ParsingError::IonexGridCoordinates)?;
        rem = r;
    }

    Ok((fields[0], fields[1], fields[2], fields[3], fields[4]))
}

/// Map being parsed
struct Pending {
    kind: MapKind,
    epoch: Option<Epoch>,
    exponent: i8,
    map: Map,
    /// Latitude index and next longitude index of the current row,
    /// None when the current row is not stored.
    row: Option<(usize, usize)>,
}

impl Pending {
    fn new(kind: MapKind, header: &Header) -> Self {
        Self {
            kind,
            epoch: None,
            exponent: header.exponent,
            map: Map::new(header.grid.latitude, header.grid.longitude),
            row: None,
        }
    }

    fn start_row(&mut self, content: &str, header: &Header) -> Result<(), ParsingError> {
        let (lat, long1, _, dlon, height) = parse_grid_specs(content)?;

        if (dlon - header.grid.longitude.spacing).abs() > 1.0E-6 {
            return Err(ParsingError::IonexMapOutsideGrid);
        }

        let lat_index = header
            .grid
            .latitude
            .node_index(lat)
            .ok_or(ParsingError::IonexMapOutsideGrid)?;

        let long_index = header
            .grid
            .longitude
            .node_index(long1)
            .ok_or(ParsingError::IonexMapOutsideGrid)?;

        // 3D maps: only the shell height is retained
        if header.grid.is_3d() && (height - header.shell_height_km).abs() > 1.0E-6 {
            self.row = None;
        } else {
            self.row = Some((lat_index, long_index));
        }

        Ok(())
    }

    fn parse_values(&mut self, line: &str, nb_longitudes: usize) -> Result<(), ParsingError> {
        if self.kind == MapKind::Height {
            return Ok(());
        }

        let (lat_index, mut long_index) = match self.row {
            Some(row) => row,
            None => return Ok(()),
        };

        // quantized values are expressed in 10^exponent TECu
        let divisor = 10.0_f64.powi(-(self.exponent as i32));

        for item in line.split_ascii_whitespace() {
            let raw = item
                .parse::<i32>()
                .map_err(|_| ParsingError::IonexMapValue(item.to_string()))?;

            if long_index >= nb_longitudes {
                return Err(ParsingError::IonexMapOutsideGrid);
            }

            let value = if raw == MISSING_VALUE {
                None
            } else {
                Some(raw as f64 / divisor)
            };

            self.map.set(lat_index, long_index, value);
            long_index += 1;
        }

        self.row = Some((lat_index, long_index));
        Ok(())
    }
}

/// TEC maps and RMS maps, indexed by epoch
pub(crate) type Maps = (BTreeMap<Epoch, Map>, BTreeMap<Epoch, Map>);

/// Parses all maps following the header, up to "END OF FILE".
pub(crate) fn parse_maps<I: Iterator<Item = std::io::Result<String>>>(
    header: &Header,
    lines: &mut I,
) -> Result<Maps, Error> {
    let mut tec_maps = BTreeMap::<Epoch, Map>::new();
    let mut rms_maps = BTreeMap::<Epoch, Map>::new();

    let nb_longitudes = header.grid.longitude.length();
    let mut pending = Option::<Pending>::None;

    for line in lines {
        let line = line?;

        if line.len() > 60 && line.is_char_boundary(60) {
            let (content, marker) = line.split_at(60);

            if is_new_tec_map(marker) {
                pending = Some(Pending::new(MapKind::Tec, header));
                continue;
            } else if is_new_rms_map(marker) {
                pending = Some(Pending::new(MapKind::Rms, header));
                continue;
            } else if is_new_height_map(marker) {
                pending = Some(Pending::new(MapKind::Height, header));
                continue;
            } else if marker.contains("END OF FILE") {
                break;
            } else if is_end_of_map(marker) {
                if let Some(done) = pending.take() {
                    let epoch = done.epoch.ok_or(ParsingError::IonexMapWithoutEpoch)?;
                    match done.kind {
                        MapKind::Tec => {
                            tec_maps.insert(epoch, done.map);
                        },
                        MapKind::Rms => {
                            rms_maps.insert(epoch, done.map);
                        },
                        MapKind::Height => {},
                    }
                }
                continue;
            }

            if let Some(pending) = pending.as_mut() {
                if marker.contains("EPOCH OF CURRENT MAP") {
                    pending.epoch = Some(parse_epoch(content)?);
                    continue;
                } else if marker.contains("EXPONENT") {
                    // scaling redefinition
                    pending.exponent = content
                        .trim()
                        .parse::<i8>()
                        .map_err(|_| ParsingError::IonexExponent)?;
                    continue;
                } else if marker.contains("LAT/LON1/LON2/DLON/H") {
                    pending.start_row(content, header)?;
                    continue;
                }
            }
        }

        if let Some(pending) = pending.as_mut() {
            pending.parse_values(&line, nb_longitudes)?;
        }
    }

    #[cfg(feature = "log")]
    debug!(
        "ionex: parsed {} tec map(s), {} rms map(s)",
        tec_maps.len(),
        rms_maps.len()
    );

    #[cfg(feature = "log")]
    if header.number_of_maps > 0 && header.number_of_maps != tec_maps.len() {
        warn!(
            "ionex: {} map(s) announced, {} tec map(s) found",
            header.number_of_maps,
            tec_maps.len()
        );
    }

    Ok((tec_maps, rms_maps))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ionex::Grid, linspace::Linspace};
    use std::io::{BufRead, Cursor};

    fn header() -> Header {
        Header::default()
            .with_grid(Grid {
                latitude: Linspace::new(60.0, 50.0, -5.0).unwrap(),
                longitude: Linspace::new(0.0, 10.0, 5.0).unwrap(),
                height: Linspace::new(450.0, 450.0, 0.0).unwrap(),
            })
            .with_shell_height(450.0)
    }

    fn parse(content: &str) -> Result<Maps, Error> {
        let mut lines = Cursor::new(content).lines();
        parse_maps(&header(), &mut lines)
    }

    #[test]
    fn new_ionex_map() {
        assert!(is_new_tec_map("START OF TEC MAP    "));
        assert!(is_new_rms_map("START OF RMS MAP    "));
        assert!(is_new_height_map("START OF HEIGHT MAP "));
        assert!(is_end_of_map("END OF TEC MAP      "));
        assert!(!is_end_of_map("END OF FILE         "));
    }

    #[test]
    fn grid_specs_parsing() {
        let content = "    87.5-180.0 180.0   5.0 450.0                            ";
        let (lat, long1, long2, dlon, height) = parse_grid_specs(content).unwrap();
        assert_eq!(lat, 87.5);
        assert_eq!(long1, -180.0);
        assert_eq!(long2, 180.0);
        assert_eq!(dlon, 5.0);
        assert_eq!(height, 450.0);

        assert!(parse_grid_specs("    87.5-180.0").is_err());
    }

    #[test]
    fn epoch_parsing() {
        assert_eq!(
            parse_epoch("  2011    10    20    14     0     0").unwrap(),
            Epoch::from_gregorian_utc(2011, 10, 20, 14, 0, 0, 0)
        );
        assert_eq!(
            parse_epoch("  2011    10    20    24     0     0").unwrap(),
            Epoch::from_gregorian_utc_at_midnight(2011, 10, 21)
        );
        assert!(parse_epoch("  2011    10    20    14     0").is_err());
        assert!(parse_epoch("  2011    13    20    14     0     0").is_err());
    }

    #[test]
    fn tec_and_rms_maps() {
        let (tec, rms) = parse(
            "     1                                                      START OF TEC MAP
  2011    10    20     0     0     0                        EPOCH OF CURRENT MAP
    60.0   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H
  100  110 9999
    55.0   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H
  120  130  140
    -2                                                      EXPONENT
    50.0   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H
 1500 1600 1700
     1                                                      END OF TEC MAP
     1                                                      START OF RMS MAP
  2011    10    20     0     0     0                        EPOCH OF CURRENT MAP
    60.0   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H
   10   10   10
     1                                                      END OF RMS MAP
                                                            END OF FILE         ",
        )
        .unwrap();

        let t0 = Epoch::from_gregorian_utc_at_midnight(2011, 10, 20);

        assert_eq!(tec.len(), 1);
        let map = tec.get(&t0).unwrap();
        assert_eq!(map.value(60.0, 0.0), Some(10.0));
        assert_eq!(map.value(60.0, 10.0), None);
        assert_eq!(map.value(55.0, 10.0), Some(14.0));
        // in-map exponent redefinition
        assert_eq!(map.value(50.0, 5.0), Some(16.0));
        assert_eq!(map.missing_nodes(), 1);

        assert_eq!(rms.len(), 1);
        let map = rms.get(&t0).unwrap();
        assert_eq!(map.value(60.0, 5.0), Some(1.0));
        // rows that were not provided are missing
        assert_eq!(map.missing_nodes(), 6);
    }

    #[test]
    fn malformed_maps() {
        // map without epoch
        let err = parse(
            "     1                                                      START OF TEC MAP
    60.0   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H
  100  110  120
     1                                                      END OF TEC MAP      ",
        );
        assert!(matches!(
            err,
            Err(Error::FileFormat(ParsingError::IonexMapWithoutEpoch))
        ));

        // latitude outside the grid
        let err = parse(
            "     1                                                      START OF TEC MAP
  2011    10    20     0     0     0                        EPOCH OF CURRENT MAP
    62.5   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H",
        );
        assert!(matches!(
            err,
            Err(Error::FileFormat(ParsingError::IonexMapOutsideGrid))
        ));

        // too many values
        let err = parse(
            "     1                                                      START OF TEC MAP
  2011    10    20     0     0     0                        EPOCH OF CURRENT MAP
    60.0   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H
  100  110  120  130",
        );
        assert!(matches!(
            err,
            Err(Error::FileFormat(ParsingError::IonexMapOutsideGrid))
        ));

        // invalid value
        let err = parse(
            "     1                                                      START OF TEC MAP
  2011    10    20     0     0     0                        EPOCH OF CURRENT MAP
    60.0   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H
  100  1x0  120",
        );
        assert!(matches!(
            err,
            Err(Error::FileFormat(ParsingError::IonexMapValue(_)))
        ));
    }

    #[test]
    fn height_maps_are_skipped() {
        let (tec, rms) = parse(
            "     1                                                      START OF HEIGHT MAP
  2011    10    20     0     0     0                        EPOCH OF CURRENT MAP
    60.0   0.0  10.0   5.0 450.0                            LAT/LON1/LON2/DLON/H
  100  110  120
     1                                                      END OF HEIGHT MAP   ",
        )
        .unwrap();
        assert!(tec.is_empty());
        assert!(rms.is_empty());
    }
}
