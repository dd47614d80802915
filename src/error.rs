use thiserror::Error;

use crate::geomag::Error as GeomagError;

/// Errors that may rise when parsing any of our textual inputs:
/// IONEX files, sky and observer coordinates, dates, coefficient tables.
#[derive(Error, Debug)]
pub enum ParsingError {
    /// File does not start with the IONEX version marker
    #[error("not a ionex file")]
    NotIonex,
    /// Invalid IONEX version
    #[error("invalid ionex version")]
    IonexVersion,
    /// Missing "END OF HEADER" marker
    #[error("missing end of header")]
    MissingEndOfHeader,
    /// The shell height (DHGT record) is mandatory
    #[error("missing ionosphere shell height (DHGT record)")]
    MissingShellHeight,
    /// Invalid HGT / LAT / LON grid specifications
    #[error("invalid ionex grid specs")]
    IonexGridSpecs,
    /// Start, end and spacing are inconsistent
    #[error("inconsistent ionex grid definition")]
    BadIonexGridSpecs,
    /// Invalid LAT/LON1/LON2/DLON/H map row
    #[error("invalid map grid coordinates")]
    IonexGridCoordinates,
    /// Invalid EXPONENT field
    #[error("invalid exponent")]
    IonexExponent,
    /// Invalid map count
    #[error("invalid number of maps")]
    IonexNumberOfMaps,
    /// Non supported mapping function
    #[error("unknown mapping function")]
    IonexMappingFunction,
    /// Invalid EPOCH OF CURRENT MAP / EPOCH OF FIRST MAP
    #[error("invalid map epoch")]
    IonexMapEpoch,
    /// Map content came before its epoch definition
    #[error("map data without epoch definition")]
    IonexMapWithoutEpoch,
    /// Map content does not fit the header grid definition
    #[error("map content does not match the grid definition")]
    IonexMapOutsideGrid,
    /// Non integer map value
    #[error("invalid map value \"{0}\"")]
    IonexMapValue(String),
    /// Right ascension / declination description
    #[error("invalid ra/dec description \"{0}\"")]
    SourceDirection(String),
    /// Invalid DMS latitude
    #[error("invalid latitude \"{0}\"")]
    Latitude(String),
    /// Invalid DMS longitude
    #[error("invalid longitude \"{0}\"")]
    Longitude(String),
    /// Invalid result table record
    #[error("invalid result record \"{0}\"")]
    ResultRecord(String),
    /// Invalid ISO-8601 date
    #[error("invalid date \"{0}\"")]
    DateTime(String),
}

/// Errors that may rise at any point in the rotation measure prediction
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Grid file is unreadable or malformed
    #[error("file format error: {0}")]
    FileFormat(#[from] ParsingError),
    /// Interpolation query outside the grid coverage
    #[error("lat={lat_ddeg:.4}°, lon={long_ddeg:.4}° ({epoch}) is not covered by this grid")]
    OutOfDomain {
        epoch: hifitime::Epoch,
        lat_ddeg: f64,
        long_ddeg: f64,
    },
    /// Piercing point geometry failure (asin argument out of [-1, 1])
    #[error("piercing point geometry: asin({0}) is not defined")]
    GeometryDomain(f64),
    /// RMS-TEC requested but the file does not provide RMS maps
    #[error("ionex file does not provide rms maps")]
    MissingRmsMaps,
    /// Geomagnetic field model error
    #[error("geomagnetic model: {0}")]
    Geomagnetic(#[from] GeomagError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
