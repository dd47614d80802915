use clap::{Arg, ArgMatches, ColorChoice, Command};
use std::{fs::File, io::BufReader, path::PathBuf};
use thiserror::Error;

use ionfr::prelude::{Config, Error as IonfrError, ObservationRequest, ParsingError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid observation: {0}")]
    Observation(#[from] ParsingError),
    #[error("prediction failed: {0}")]
    Prediction(#[from] IonfrError),
}

#[derive(Debug, Clone, Default)]
pub struct Cli {
    matches: ArgMatches,
}

/// ionFRM command line interface
pub fn command() -> Command {
    Command::new("ionFRM")
        .author("Guillaume W. Bres, <guillaume.bressaix@gmail.com>")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Ionospheric Faraday rotation predictions from IONEX maps")
        .arg_required_else_help(true)
        .color(ColorChoice::Always)
        .arg(
            Arg::new("radec")
                .value_name("RADEC")
                .help("Source direction, for example \"08h13m36.0s+48d13m03s\"")
                .required(true),
        )
        .arg(
            Arg::new("latitude")
                .value_name("LAT")
                .help("Observer latitude, for example \"52d54m54.6sn\"")
                .required(true),
        )
        .arg(
            Arg::new("longitude")
                .value_name("LON")
                .help("Observer longitude, for example \"6d52m11.7se\"")
                .required(true),
        )
        .arg(
            Arg::new("datetime")
                .value_name("DATETIME")
                .help("Day of observation (ISO-8601), for example \"2011-10-20T00:00:00\"")
                .required(true),
        )
        .arg(
            Arg::new("ionex")
                .value_name("IONEX")
                .help("IONEX file (possibly gzip compressed)")
                .required(true),
        )
        .next_help_heading("Configuration")
        .arg(
            Arg::new("cfg")
                .short('c')
                .long("cfg")
                .value_name("FILE")
                .help("JSON configuration file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output CSV file. Defaults to \"IonRM.csv\""),
        )
        .arg(
            Arg::new("igrf")
                .long("igrf")
                .value_name("FILE")
                .help("IGRF coefficient table, replacing the built-in model"),
        )
}

impl Cli {
    pub fn new() -> Self {
        Self {
            matches: command().get_matches(),
        }
    }
    fn positional(&self, name: &str) -> &str {
        // required arguments: presence is enforced by clap
        self.matches
            .get_one::<String>(name)
            .map(|s| s.as_str())
            .unwrap_or_default()
    }
    /// Builds the [ObservationRequest] from the positional arguments
    pub fn observation_request(&self) -> Result<ObservationRequest, ParsingError> {
        ObservationRequest::from_descriptions(
            self.positional("radec"),
            self.positional("latitude"),
            self.positional("longitude"),
            self.positional("datetime"),
        )
    }
    /// Returns ionex file path
    pub fn ionex_filepath(&self) -> PathBuf {
        PathBuf::from(self.positional("ionex"))
    }
    /// Returns [Config], loaded from the JSON file if provided,
    /// with command line overrides applied.
    pub fn config(&self) -> Result<Config, CliError> {
        let mut cfg = match self.matches.get_one::<String>("cfg") {
            Some(path) => {
                let fd = File::open(path)?;
                serde_json::from_reader(BufReader::new(fd))?
            },
            None => Config::default(),
        };
        if let Some(output) = self.matches.get_one::<String>("output") {
            cfg = cfg.with_output(PathBuf::from(output));
        }
        if let Some(igrf) = self.matches.get_one::<String>("igrf") {
            cfg = cfg.with_igrf_coefficients(PathBuf::from(igrf));
        }
        Ok(cfg)
    }
}
