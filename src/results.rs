//! Hourly rotation measure predictions and their CSV representation
use crate::prelude::{Error, ParsingError};

use std::{
    io::{Read, Write},
    path::Path,
};

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// CSV columns
const COLUMNS: [&str; 5] = ["hour", "tec_path", "tot_field", "ifr", "rms_ifr"];

/// Ionospheric Faraday rotation predicted for one hour of the day
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HourlyResult {
    /// Hour of the day (0..23)
    pub hour: u8,
    /// Slant TEC along the line of sight (m^-2)
    pub tec_path: f64,
    /// Geomagnetic field along the line of sight (Gauss)
    pub tot_field: f64,
    /// Ionospheric rotation measure (rad/m²)
    pub ifr: f64,
    /// Rotation measure uncertainty (rad/m²)
    pub rms_ifr: f64,
}

impl HourlyResult {
    fn to_record(&self) -> [String; 5] {
        [
            self.hour.to_string(),
            format!("{:e}", self.tec_path),
            format!("{:e}", self.tot_field),
            format!("{:e}", self.ifr),
            format!("{:e}", self.rms_ifr),
        ]
    }

    fn from_record(record: &csv::StringRecord) -> Result<Self, ParsingError> {
        let err = || ParsingError::ResultRecord(record.iter().collect::<Vec<_>>().join(","));

        if record.len() != COLUMNS.len() {
            return Err(err());
        }

        let hour = record[0].trim().parse::<u8>().map_err(|_| err())?;

        let mut values = [0.0_f64; 4];
        for (value, field) in values.iter_mut().zip(record.iter().skip(1)) {
            *value = field.trim().parse::<f64>().map_err(|_| err())?;
        }

        Ok(Self {
            hour,
            tec_path: values[0],
            tot_field: values[1],
            ifr: values[2],
            rms_ifr: values[3],
        })
    }
}

/// [ResultTable]: predictions for the hours where the source was visible,
/// in increasing hour order.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResultTable {
    rows: Vec<HourlyResult>,
}

impl FromIterator<HourlyResult> for ResultTable {
    fn from_iter<I: IntoIterator<Item = HourlyResult>>(iter: I) -> Self {
        let mut rows = iter.into_iter().collect::<Vec<_>>();
        rows.sort_by_key(|row| row.hour);
        Self { rows }
    }
}

impl ResultTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    /// Returns true if the source was never visible
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    /// Iterates rows, in increasing hour order
    pub fn iter(&self) -> impl Iterator<Item = &HourlyResult> {
        self.rows.iter()
    }
    /// Hours present in this table
    pub fn hours(&self) -> Vec<u8> {
        self.rows.iter().map(|row| row.hour).collect()
    }
    /// Returns row for this hour, if any
    pub fn get(&self, hour: u8) -> Option<&HourlyResult> {
        self.rows.iter().find(|row| row.hour == hour)
    }

    /// Writes this table as CSV
    pub fn to_csv_writer<W: Write>(&self, w: W) -> Result<(), Error> {
        let mut writer = csv::Writer::from_writer(w);
        writer.write_record(COLUMNS)?;
        for row in self.rows.iter() {
            writer.write_record(row.to_record())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes this table as CSV into a local file.
    /// Content is entirely serialized before it is written to a sibling
    /// temporary file, which then replaces the destination: the
    /// destination is never partially written.
    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();

        let mut content = Vec::<u8>::new();
        self.to_csv_writer(&mut content)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");

        std::fs::write(&tmp, &content)?;

        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        #[cfg(feature = "log")]
        debug!("results: {} row(s) written to \"{}\"", self.len(), path.display());

        Ok(())
    }

    /// Parses a table previously generated by [Self::to_csv_writer]
    pub fn from_csv_reader<R: Read>(r: R) -> Result<Self, Error> {
        let mut reader = csv::Reader::from_reader(r);

        let headers = reader.headers()?;
        if headers.iter().map(str::trim).ne(COLUMNS) {
            let headers = headers.iter().collect::<Vec<_>>().join(",");
            return Err(ParsingError::ResultRecord(headers).into());
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(HourlyResult::from_record(&record?)?);
        }

        Ok(Self::from_iter(rows))
    }

    /// Parses a table from a local CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let fd = std::fs::File::open(path)?;
        Self::from_csv_reader(std::io::BufReader::new(fd))
    }
}
